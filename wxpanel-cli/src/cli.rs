use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use std::path::{Path, PathBuf};
use wxpanel_core::{
    BackendError, Config, DisplayController, HttpBackend, Panel, WeatherBackend,
    config::DEFAULT_BASE_URL,
};

use crate::terminal::{TerminalNotifier, render_panel};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxpanel", version, about = "Weather station panel")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true, env = "WXPANEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config file.
    #[arg(long, global = true, env = "WXPANEL_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds; 0 waits forever.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the current reading once and print the panel.
    Show,

    /// Ask the backend to re-acquire data, print its message, then the panel.
    Refresh,

    /// Show the panel and keep it open with a refresh prompt.
    Run,

    /// Set the backend URL and timeout interactively.
    Configure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelAction {
    Refresh,
    Quit,
}

impl std::fmt::Display for PanelAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelAction::Refresh => f.write_str("Refresh"),
            PanelAction::Quit => f.write_str("Quit"),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Command::Configure => configure(self.config.as_deref()),
            Command::Show => {
                let mut ctl = self.controller(false)?;
                ctl.load_weather().await.context("Could not load weather")?;
                print_panel(ctl.sink());
                Ok(())
            }
            Command::Refresh => {
                let mut ctl = self.controller(false)?;
                ctl.refresh_weather().await.context("Could not refresh weather")?;
                print_panel(ctl.sink());
                Ok(())
            }
            Command::Run => {
                let mut ctl = self.controller(true)?;
                let result = ctl.start().await;
                report(result, ctl.sink());
                run_prompt(&mut ctl).await
            }
        }
    }

    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut cfg = load_config(self.config.as_deref())?;

        if let Some(url) = &self.url {
            cfg.set_base_url(url).context("Invalid --url")?;
        }
        if let Some(timeout) = self.timeout {
            cfg.timeout_secs = Some(timeout);
        }

        Ok(cfg)
    }

    fn controller(
        &self,
        blocking: bool,
    ) -> anyhow::Result<DisplayController<HttpBackend, Panel, TerminalNotifier>> {
        let cfg = self.resolve_config()?;
        let backend = HttpBackend::from_config(&cfg).context("Could not set up backend client")?;
        tracing::debug!(base_url = %backend.base_url(), "using backend");

        Ok(DisplayController::new(backend, Panel::new(), TerminalNotifier::new(blocking)))
    }
}

async fn run_prompt<B: WeatherBackend>(
    ctl: &mut DisplayController<B, Panel, TerminalNotifier>,
) -> anyhow::Result<()> {
    loop {
        let choice = Select::new("Panel:", vec![PanelAction::Refresh, PanelAction::Quit]).prompt();

        match choice {
            Ok(PanelAction::Refresh) => {
                let result = ctl.refresh_weather().await;
                report(result, ctl.sink());
            }
            Ok(PanelAction::Quit)
            | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e).context("Prompt failed"),
        }
    }
}

/// Panel text after a request, plus the error chain when it failed.
///
/// A failed request keeps the previous contents and omits the "Updated" line.
fn outcome(
    result: Result<(), BackendError>,
    panel: &Panel,
    now: DateTime<Local>,
) -> (String, Option<String>) {
    match result {
        Ok(()) => (render_panel(panel, Some(now)), None),
        Err(e) => (render_panel(panel, None), Some(format!("{:#}", anyhow::Error::from(e)))),
    }
}

fn report(result: Result<(), BackendError>, panel: &Panel) {
    let (text, error) = outcome(result, panel, Local::now());
    if let Some(error) = error {
        tracing::error!("{error}");
    }
    println!("\n{text}");
}

fn print_panel(panel: &Panel) {
    println!("\n{}", render_panel(panel, Some(Local::now())));
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn configure(path: Option<&Path>) -> anyhow::Result<()> {
    let mut cfg = load_config(path)?;

    let url = Text::new("Backend URL:")
        .with_default(cfg.base_url_or_default())
        .with_help_message(&format!("Default: {DEFAULT_BASE_URL}"))
        .prompt()
        .context("Prompt failed")?;
    cfg.set_base_url(&url).context("Invalid backend URL")?;

    let current = cfg.timeout_secs.map(|t| t.to_string()).unwrap_or_default();
    let timeout = Text::new("Request timeout in seconds (empty for none):")
        .with_initial_value(&current)
        .prompt()
        .context("Prompt failed")?;
    cfg.timeout_secs = match timeout.trim() {
        "" => None,
        t => Some(t.parse().with_context(|| format!("Not a number of seconds: '{t}'"))?),
    };

    let path = match path {
        Some(path) => cfg.save_to(path).map(|()| path.to_path_buf())?,
        None => cfg.save()?,
    };
    println!("Saved configuration to {}", path.display());
    Ok(())
}

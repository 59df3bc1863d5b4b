use chrono::{DateTime, Local};
use std::io::{self, BufRead, Write};
use wxpanel_core::{Notifier, Panel};

/// Text shown for a field that has never been written.
const EMPTY_FIELD: &str = "--";

/// Render the panel as an aligned two-column block.
pub fn render_panel(panel: &Panel, updated: Option<DateTime<Local>>) -> String {
    let width = panel.rows().map(|(f, _)| f.label().len()).max().unwrap_or(0);

    let mut out = String::new();
    for (field, text) in panel.rows() {
        let text = if text.is_empty() { EMPTY_FIELD } else { text };
        out.push_str(&format!("{:>width$}  {}\n", field.label(), text, width = width));
    }
    if let Some(at) = updated {
        out.push_str(&format!("{:>width$}  {}\n", "Updated", at.format("%H:%M:%S"), width = width));
    }
    out
}

/// Prints the backend's message. When `blocking`, waits for Enter before returning.
#[derive(Debug)]
pub struct TerminalNotifier {
    blocking: bool,
}

impl TerminalNotifier {
    pub fn new(blocking: bool) -> Self {
        Self { blocking }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, message: &str) {
        println!("\nℹ️  {message}");
        if !self.blocking {
            return;
        }

        wait_for_enter(&mut io::stdout(), &mut io::stdin().lock());
    }
}

/// Prompt on `out` and block until a line arrives on `input`.
/// I/O failures are logged and do not abort the notification.
fn wait_for_enter(out: &mut impl Write, input: &mut impl BufRead) -> bool {
    let flushed = write!(out, "Press Enter to continue...").and_then(|()| out.flush());
    if let Err(e) = &flushed {
        tracing::debug!("could not show prompt: {e}");
    }

    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line) {
        tracing::debug!("could not wait for acknowledgement: {e}");
    }
    flushed.is_ok()
}

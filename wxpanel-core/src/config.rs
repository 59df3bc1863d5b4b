use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::BackendError;

/// Where the station backend listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// base_url = "http://station.local:5000"
/// timeout_secs = 10
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL; `/api/weather` and `/api/refresh` are resolved against it.
    pub base_url: Option<String>,

    /// Per-request timeout. Absent means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load the config at the platform path, or the default if there is none yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load the config at `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Save to the platform path and return it.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the config as TOML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxpanel", "wxpanel-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Parsed backend URL. Only http and https are accepted.
    pub fn backend_url(&self) -> Result<Url, BackendError> {
        parse_backend_url(self.base_url_or_default())
    }

    /// Replace the base URL after validating it.
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), BackendError> {
        let url = parse_backend_url(raw)?;
        self.base_url = Some(url.to_string());
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }
}

pub fn parse_backend_url(raw: &str) -> Result<Url, BackendError> {
    let url = Url::parse(raw.trim()).map_err(|_| BackendError::InvalidUrl(raw.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(BackendError::InvalidUrl(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_backend() {
        let cfg = Config::default();
        let url = cfg.backend_url().expect("default url must parse");

        assert_eq!(url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn set_base_url_validates_scheme() {
        let mut cfg = Config::default();

        let err = cfg.set_base_url("ftp://station.local").unwrap_err();
        assert!(err.to_string().contains("Invalid backend URL"));
        assert_eq!(cfg.base_url, None);

        cfg.set_base_url("https://station.local:8443").expect("https is accepted");
        assert_eq!(cfg.base_url.as_deref(), Some("https://station.local:8443/"));
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg = Config { base_url: None, timeout_secs: Some(0) };
        assert_eq!(cfg.timeout(), None);

        let cfg = Config { base_url: None, timeout_secs: Some(7) };
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let cfg = Config {
            base_url: Some("http://station.local:5000/".into()),
            timeout_secs: Some(10),
        };

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back, cfg);
    }

    #[test]
    fn load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_to_creates_dirs_and_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config { timeout_secs: Some(5), ..Default::default() };
        cfg.set_base_url("http://station.local:5000").expect("valid url");
        cfg.save_to(&path).expect("save");

        assert_eq!(Config::load_from(&path).expect("load"), cfg);
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg: Config = toml::from_str("").expect("parse");
        assert_eq!(cfg, Config::default());
    }
}

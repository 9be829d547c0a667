use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tab_stop: usize,
    pub quit_times: u8,
    pub message_timeout_secs: u64,
    pub escape_timeout_ms: u64,
    pub search_case_sensitive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_stop: 4,
            quit_times: 3,
            message_timeout_secs: 5,
            escape_timeout_ms: 100,
            search_case_sensitive: false,
        }
    }
}

impl Config {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    fn sanitized(mut self) -> Self {
        self.tab_stop = self.tab_stop.max(1);
        self.escape_timeout_ms = self.escape_timeout_ms.max(1);
        self
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("quill").join("config.toml"))
}

/// Reads settings from `explicit`, else from the default location when that
/// file exists. The file is never created or rewritten.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_config(raw: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(raw)?;
    Ok(cfg.sanitized())
}

#[cfg(test)]
mod tests {
    use super::{load_config, parse_config, Config};
    use std::fs;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = parse_config("tab_stop = 8\n").expect("parse");
        assert_eq!(
            cfg,
            Config {
                tab_stop: 8,
                ..Config::default()
            }
        );
    }

    #[test]
    fn zero_tab_stop_is_raised_to_one() {
        let cfg = parse_config("tab_stop = 0\nescape_timeout_ms = 0\n").expect("parse");
        assert_eq!(cfg.tab_stop, 1);
        assert_eq!(cfg.escape_timeout_ms, 1);
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "quit_times = 1\nsearch_case_sensitive = true\n").expect("write");
        let cfg = load_config(Some(&path)).expect("load");
        assert_eq!(cfg.quit_times, 1);
        assert!(cfg.search_case_sensitive);
    }

    #[test]
    fn unreadable_or_invalid_files_are_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "tab_stop = \"wide\"").expect("write");
        let err = load_config(Some(&bad)).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));
    }
}

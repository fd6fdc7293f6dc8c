use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analytics::timeline::DEFAULT_PAGE_SIZE;

const SETTINGS_DIR: &str = ".portfolio";
const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database file.
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Full `host:port` the API binds to. Takes precedence over `port`.
    #[serde(default)]
    pub listen: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// Records per timeline page.
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl Settings {
    /// Reads `.portfolio/settings.json` from `std::env::current_dir()`, then
    /// applies `PORTFOLIO_DB` and `PORT` from the environment.
    /// A missing or malformed file yields defaults.
    pub fn load() -> Self {
        Self::load_from(std::env::current_dir().ok()).with_env(|key| std::env::var(key).ok())
    }

    fn load_from(cwd: Option<PathBuf>) -> Self {
        let Some(cwd) = cwd else {
            return Self::default();
        };
        Self::read_file(&Self::path_in(&cwd)).unwrap_or_default()
    }

    fn read_file(path: &Path) -> Option<Self> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
                None
            }
        }
    }

    fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(db) = lookup("PORTFOLIO_DB").filter(|v| !v.is_empty()) {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(port) = lookup("PORT").and_then(|v| v.parse().ok()) {
            self.port = Some(port);
        }
        self
    }

    /// Returns the path to the settings file relative to a given directory.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    /// Configured database path, or `~/.portfolio/portfolio.db`.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(SETTINGS_DIR).join("portfolio.db"))
    }

    pub fn listen_addr(&self) -> String {
        match &self.listen {
            Some(addr) => addr.clone(),
            None => format!("{DEFAULT_HOST}:{}", self.port.unwrap_or(DEFAULT_PORT)),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir, body: &str) {
        let settings_dir = dir.path().join(".portfolio");
        fs::create_dir_all(&settings_dir).unwrap();
        fs::write(settings_dir.join("settings.json"), body).unwrap();
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.listen_addr(), "127.0.0.1:5000");
        assert_eq!(settings.page_size(), 5);
    }

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        write_settings(
            &dir,
            r#"{"database": "/tmp/p.db", "port": 8080, "page_size": 10}"#,
        );

        let settings = Settings::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(settings.database_path().unwrap(), PathBuf::from("/tmp/p.db"));
        assert_eq!(settings.listen_addr(), "127.0.0.1:8080");
        assert_eq!(settings.page_size(), 10);
    }

    #[test]
    fn test_load_malformed_file_returns_default() {
        let dir = TempDir::new().unwrap();
        write_settings(&dir, "not json");

        let settings = Settings::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_explicit_listen_wins_over_port() {
        let settings = Settings {
            listen: Some("0.0.0.0:9000".to_string()),
            port: Some(1234),
            ..Default::default()
        };
        assert_eq!(settings.listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_env_overrides_file() {
        let settings = Settings {
            database: Some(PathBuf::from("/from/file.db")),
            port: Some(1),
            ..Default::default()
        }
        .with_env(|key| match key {
            "PORTFOLIO_DB" => Some("/from/env.db".to_string()),
            "PORT" => Some("7000".to_string()),
            _ => None,
        });
        assert_eq!(settings.database, Some(PathBuf::from("/from/env.db")));
        assert_eq!(settings.listen_addr(), "127.0.0.1:7000");
    }

    #[test]
    fn test_env_ignores_unparseable_port() {
        let settings = Settings::default().with_env(|key| match key {
            "PORT" => Some("eighty".to_string()),
            _ => None,
        });
        assert_eq!(settings.port, None);
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let settings = Settings {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(settings.page_size(), DEFAULT_PAGE_SIZE);
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, net::SocketAddr, path::Path, path::PathBuf, str::FromStr};

use crate::search::{SearchSettings, DEFAULT_TEMPLATE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub search_dir: PathBuf,
    pub search_extensions: Vec<String>,
    pub default_template: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            search_dir: PathBuf::from(".."),
            search_extensions: vec!["html".to_string(), "htm".to_string()],
            default_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the JSON config file (when there is one) and then applies
    /// `SITE_SEARCH_*` environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        let config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Some(host) = var("SITE_SEARCH_HOST") {
            self.host = host;
        }
        if let Some(port) = parse_var("SITE_SEARCH_PORT") {
            self.port = port;
        }
        if let Some(dir) = var("SITE_SEARCH_DIR") {
            self.search_dir = PathBuf::from(dir);
        }
        if let Some(list) = var("SITE_SEARCH_EXTENSIONS") {
            self.search_extensions = list
                .split(',')
                .map(|ext| ext.trim().trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty())
                .collect();
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            root: self.search_dir.clone(),
            extensions: self.search_extensions.clone(),
            default_template: self.default_template.clone(),
        }
    }

    fn config_file_path() -> Result<PathBuf> {
        if let Some(path) = var("SITE_SEARCH_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?;

        Ok(config_dir.join("site-search").join("config.json"))
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let raw = var(key)?;
    raw.parse()
        .map_err(|e| tracing::warn!("Invalid {key} value '{raw}': {e}, keeping configured value"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.search_extensions, vec!["html", "htm"]);
        assert_eq!(config.default_template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "search_dir": "/srv/www", "port": 9000 }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        let settings = config.search_settings();

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(settings.root, PathBuf::from("/srv/www"));
        assert_eq!(settings.extensions, vec!["html", "htm"]);
        assert_eq!(config.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}

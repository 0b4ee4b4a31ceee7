use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ops::filter::{DateWindow, SortMode};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Client configuration, read from a toml file.
///
/// Everything has a default so an absent or empty file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub defaults: ViewDefaults,
}

/// Where the remote store lives. The transport layer consumes this; the
/// engine itself never dials out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

/// Initial filter criteria for a fresh board.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ViewDefaults {
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub date_window: DateWindow,
}

impl ClientConfig {
    /// Load configuration from a toml file.
    pub fn load(path: &Path) -> Result<ClientConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<ClientConfig, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config.gateway.base_url, "http://localhost:5000/api");
        assert_eq!(config.defaults.sort, SortMode::Newest);
        assert_eq!(config.defaults.date_window, DateWindow::AllTime);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config = ClientConfig::from_toml(
            r#"
[gateway]
base_url = "https://tasks.example.com/api"

[defaults]
sort = "Manual"
"#,
        )
        .unwrap();
        assert_eq!(config.gateway.base_url, "https://tasks.example.com/api");
        assert_eq!(config.defaults.sort, SortMode::Manual);
        assert_eq!(config.defaults.date_window, DateWindow::AllTime);
    }

    #[test]
    fn date_window_values_use_display_names() {
        let config = ClientConfig::from_toml(
            r#"
[defaults]
date_window = "Last 7 Days"
"#,
        )
        .unwrap();
        assert_eq!(config.defaults.date_window, DateWindow::Last7Days);
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nbase_url = \"http://127.0.0.1:9000/api\"").unwrap();
        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.gateway.base_url, "http://127.0.0.1:9000/api");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ClientConfig::load(Path::new("/nonexistent/taskdeck.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}

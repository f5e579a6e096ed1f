//! QLM configuration.
//!
//! Config file: ~/.config/qlm/config.toml or /etc/qlm/config.toml.
//! Every section is optional; missing files mean defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bearer-token gate for the completion endpoints. Off by default: the
/// service is a novelty and accepts anonymous callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub require_api_key: bool,
}

/// Selection tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Recently emitted texts suppressed from the weighted draw.
    #[serde(default = "default_recency_window")]
    pub recency_window: usize,

    /// Probability of the independent rare override. Zero disables it.
    #[serde(default = "default_rare_probability")]
    pub rare_override_probability: f64,
}

fn default_recency_window() -> usize {
    5
}

fn default_rare_probability() -> f64 {
    0.0001
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            recency_window: default_recency_window(),
            rare_override_probability: default_rare_probability(),
        }
    }
}

/// Main QLM configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QlmConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub selector: SelectorConfig,
}

impl QlmConfig {
    /// Default user config path: ~/.config/qlm/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("XDG_CONFIG_HOME"))
            .context("Cannot determine home directory")?;

        let config_dir = if home.contains("/.config") {
            PathBuf::from(home)
        } else {
            Path::new(&home).join(".config")
        };

        Ok(config_dir.join("qlm").join("config.toml"))
    }

    /// System config path: /etc/qlm/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/qlm/config.toml")
    }

    /// Load configuration.
    ///
    /// Priority:
    /// 1. User config (~/.config/qlm/config.toml)
    /// 2. System config (/etc/qlm/config.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: QlmConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QlmConfig::default();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8000");
        assert!(!config.auth.require_api_key);
        assert_eq!(config.selector.recency_window, 5);
        assert!(config.selector.rare_override_probability > 0.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: QlmConfig = toml::from_str(
            r#"
            [server]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.selector.recency_window, 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [auth]
            require_api_key = true

            [selector]
            recency_window = 3
            rare_override_probability = 0.0
            "#,
        )
        .unwrap();

        let config = QlmConfig::load_from(&path).unwrap();
        assert!(config.auth.require_api_key);
        assert_eq!(config.selector.recency_window, 3);
        assert_eq!(config.selector.rare_override_probability, 0.0);
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(QlmConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let config = QlmConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: QlmConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.selector.recency_window, config.selector.recency_window);
    }
}

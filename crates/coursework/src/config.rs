/// Server configuration
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_PATH_VAR: &str = "COURSEWORK_CONFIG";
/// Environment variable overriding the bind address.
pub const ADDRESS_VAR: &str = "COURSEWORK_ADDRESS";
/// Environment variable overriding the port.
pub const PORT_VAR: &str = "COURSEWORK_PORT";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid port `{value}`")]
    InvalidPort { value: String },
}

/// Top-level server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub address: String,
    pub port: u16,
    /// Default `tracing` filter, used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: "0.0.0.0".to_string(),
            port: 8000,
            log_filter: "coursework=info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from a JSON file. Missing keys fall back to
    /// their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the configuration from an optional file plus environment
    /// overrides.
    ///
    /// # Arguments
    /// * `config_path` - JSON file to load; if `None`, `COURSEWORK_CONFIG` is
    ///   consulted, then the built-in defaults are used
    pub fn from_env(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let base = match config_path.or(env_path.as_deref()) {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `COURSEWORK_ADDRESS` and `COURSEWORK_PORT` from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(ADDRESS_VAR) {
            self.address = address;
        }

        if let Some(port) = lookup(PORT_VAR) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value: port })?;
        }

        Ok(self)
    }

    /// Returns the `address:port` pair to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "coursework-config-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_file("partial", r#"{ "port": 9100 }"#);
        let config = ServerConfig::load_from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.bind_address(), "0.0.0.0:9100");
    }

    #[test]
    fn test_bad_file_is_reported() {
        let path = temp_file("bad", "{ not json");
        let err = ServerConfig::load_from_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(matches!(
            ServerConfig::load_from_file(Path::new("/nonexistent/coursework.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ADDRESS_VAR, "127.0.0.1"), (PORT_VAR, "8080")]);
        let config = ServerConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");

        let err = ServerConfig::default()
            .with_overrides(|key| (key == PORT_VAR).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }
}

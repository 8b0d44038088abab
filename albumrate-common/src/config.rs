//! Configuration model and loading
//!
//! Resolution priority (highest first):
//! 1. Command-line argument / environment variable (applied by the binary via [`ConfigOverrides`])
//! 2. TOML config file (explicit path, or `<config_dir>/albumrate/config.toml`)
//! 3. Compiled defaults

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default Spotify Web API base URL
pub const DEFAULT_CATALOG_API_URL: &str = "https://api.spotify.com/v1";
/// Default Spotify accounts token endpoint
pub const DEFAULT_CATALOG_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Connection pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://albumrate.db`
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Requests queue for a connection this long before failing
    pub acquire_timeout_secs: u64,
    /// Idle connections above `min_connections` are closed after this long
    pub idle_timeout_secs: u64,
    /// SQLite busy handler timeout for competing writers
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://albumrate.db".to_string(),
            max_connections: 5,
            min_connections: 0,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 10,
            busy_timeout_ms: 5000,
        }
    }
}

/// Music catalog (Spotify Web API) client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base_url: String,
    pub token_url: String,
    /// Page size for album search
    pub search_limit: u32,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: DEFAULT_CATALOG_API_URL.to_string(),
            token_url: DEFAULT_CATALOG_TOKEN_URL.to_string(),
            search_limit: 12,
            timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    /// Both client id and secret are present and non-empty
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.client_id) && present(&self.client_secret)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line or through environment variables
///
/// Every field left as `None` keeps the value from the file/defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// An explicit `path` must exist. Without one, the platform config file is
    /// used when present, otherwise compiled defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text; missing sections and keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Apply command-line/environment overrides on top of file values
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(bind_addr) = &overrides.bind_addr {
            self.server.bind_addr = bind_addr.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(url) = &overrides.database_url {
            self.database.url = url.clone();
        }
        if let Some(client_id) = &overrides.client_id {
            self.catalog.client_id = Some(client_id.clone());
        }
        if let Some(client_secret) = &overrides.client_secret {
            self.catalog.client_secret = Some(client_secret.clone());
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }
        if self.database.url.trim().is_empty() {
            return Err(Error::Config("database.url must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(Error::Config(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        if self.catalog.search_limit == 0 {
            return Err(Error::Config(
                "catalog.search_limit must be at least 1".to_string(),
            ));
        }
        if self.catalog.api_base_url.trim().is_empty() || self.catalog.token_url.trim().is_empty()
        {
            return Err(Error::Config(
                "catalog.api_base_url and catalog.token_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform config file location (`~/.config/albumrate/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("albumrate").join("config.toml"))
}

//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `PRICECAST_CONFIG` environment variable
//! 3. `./pricecast.toml` in the working directory
//! 4. `<user config dir>/pricecast/config.toml`
//! 5. Compiled defaults (fallback)
//!
//! A file named explicitly (1 or 2) must exist. Discovered locations (3, 4)
//! are used only when present, and having no file at all is not an error.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::MalformedPricePolicy;
use crate::error::ConfigError;
use crate::model::ModelPaths;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "PRICECAST_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "pricecast.toml";

/// Complete service configuration as read from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub models: ModelPaths,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub on_malformed_price: MalformedPricePolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/products.csv"),
            on_malformed_price: MalformedPricePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default tracing directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse TOML text without touching the filesystem
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read a config file and resolve its relative paths against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text, path)?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.resolve_relative_paths(base);
        }
        Ok(config)
    }

    /// Make dataset and model paths absolute relative to `base`
    pub fn resolve_relative_paths(&mut self, base: &Path) {
        if self.dataset.path.is_relative() {
            self.dataset.path = base.join(&self.dataset.path);
        }
        self.models.resolve_against(base);
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "server.bind {:?} is not a socket address",
                self.server.bind
            ))
        })
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level is empty".to_string()));
        }
        Ok(())
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    WorkingDirectory(PathBuf),
    UserConfigDir(PathBuf),
    CompiledDefaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::WorkingDirectory(p)
            | ConfigSource::UserConfigDir(p) => Some(p),
            ConfigSource::CompiledDefaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::CommandLine(p) => write!(f, "{} (command line)", p.display()),
            ConfigSource::Environment(p) => write!(f, "{} (${})", p.display(), CONFIG_ENV_VAR),
            ConfigSource::WorkingDirectory(p) => write!(f, "{} (working directory)", p.display()),
            ConfigSource::UserConfigDir(p) => write!(f, "{} (user config dir)", p.display()),
            ConfigSource::CompiledDefaults => f.write_str("compiled defaults"),
        }
    }
}

/// Effective configuration plus its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Locates and loads the config file following the priority order above
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    user_config_dir: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self {
            cli_path,
            working_dir: std::env::current_dir().ok(),
            user_config_dir: dirs::config_dir().map(|d| d.join("pricecast")),
        }
    }

    /// Override the discovered directories (tests use temp dirs)
    pub fn with_search_dirs(mut self, working_dir: Option<PathBuf>, user_config_dir: Option<PathBuf>) -> Self {
        self.working_dir = working_dir;
        self.user_config_dir = user_config_dir;
        self
    }

    /// Pick the config file to use, without reading it
    pub fn locate(&self) -> ConfigSource {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return ConfigSource::CommandLine(path.clone());
        }

        // Priority 2: Environment variable
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return ConfigSource::Environment(PathBuf::from(path));
        }

        // Priority 3: Working directory
        if let Some(path) = self
            .working_dir
            .as_ref()
            .map(|d| d.join(LOCAL_CONFIG_FILE))
            .filter(|p| p.is_file())
        {
            return ConfigSource::WorkingDirectory(path);
        }

        // Priority 4: User config directory
        if let Some(path) = self
            .user_config_dir
            .as_ref()
            .map(|d| d.join("config.toml"))
            .filter(|p| p.is_file())
        {
            return ConfigSource::UserConfigDir(path);
        }

        // Priority 5: Compiled defaults
        ConfigSource::CompiledDefaults
    }

    /// Locate, read and validate the configuration.
    ///
    /// Runs before logging is set up, so callers report `source` themselves.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let source = self.locate();

        let config = match source.path() {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        config.validate()?;
        Ok(LoadedConfig { config, source })
    }
}

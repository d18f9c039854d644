use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::finalize::FinalizeConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "ferrous-finalize.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-finalize/config.toml";

/// Main configuration structure for Ferrous Finalize
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (ports, bind address, identity)
    #[serde(default)]
    pub server: ServerConfig,

    /// Servers the forwarder and the chain lookups talk to
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// CNAME finalization policy
    #[serde(default)]
    pub finalize: FinalizeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-finalize.toml in current directory
    /// 3. /etc/ferrous-finalize/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides)?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) -> Result<(), ConfigError> {
        if let Some(directive) = overrides.directive {
            self.finalize = FinalizeConfig::from_directive(&directive)?;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.metrics_port {
            self.server.metrics_port = Some(port);
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(depth) = overrides.max_depth {
            if depth == 0 {
                return Err(ConfigError::NonPositiveDepth);
            }
            self.finalize.max_depth = depth;
        }
        if overrides.force_resolve {
            self.finalize.force_resolve = true;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.metrics_port == Some(0) {
            return Err(ConfigError::Validation(
                "Metrics port cannot be 0".to_string(),
            ));
        }

        if self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        if self.upstream.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "Upstream query timeout cannot be 0".to_string(),
            ));
        }

        self.upstream.socket_addrs()?;

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub directive: Option<String>,
    pub max_depth: Option<usize>,
    pub force_resolve: bool,
}

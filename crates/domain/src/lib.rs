//! Ferrous Finalize Domain Layer
pub mod config;
pub mod errors;
pub mod finalize_outcome;

pub use config::{
    CliOverrides, Config, ConfigError, FinalizeConfig, LoggingConfig, ServerConfig,
    UpstreamConfig,
};
pub use errors::DomainError;
pub use finalize_outcome::FinalizeOutcome;

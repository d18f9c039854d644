#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Wrong argument count or unexpected line ending after '{0}'")]
    ArgCount(String),

    #[error("Unsupported parameter {0} for finalize setting")]
    UnsupportedParameter(String),

    #[error("max_depth parameter must be greater than 0")]
    NonPositiveDepth,

    #[error("Invalid max_depth value '{0}': {1}")]
    InvalidDepth(String, String),
}

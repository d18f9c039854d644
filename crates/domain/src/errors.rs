use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No upstream servers configured")]
    TransportNoUpstreamServers,

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,
}

impl DomainError {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DomainError::QueryTimeout | DomainError::TransportTimeout { .. }
        )
    }
}

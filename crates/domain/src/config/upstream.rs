use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout)
    }

    /// Parses `host:port` entries; a bare IP gets port 53.
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.servers
            .iter()
            .map(|s| parse_server(s))
            .collect()
    }
}

fn parse_server(server: &str) -> Result<SocketAddr, ConfigError> {
    let trimmed = server
        .trim()
        .trim_start_matches("udp://")
        .trim_start_matches("dns://");

    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }

    trimmed
        .parse::<std::net::IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|e| ConfigError::Validation(format!("Invalid upstream server '{}': {}", server, e)))
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_query_timeout() -> u64 {
    2000
}

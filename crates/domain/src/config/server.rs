use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// Port of the `/metrics` endpoint; `None` disables it.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: Option<u16>,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Label attached to every metric sample, e.g. `dns://:53`.
    #[serde(default)]
    pub identity: Option<String>,
}

impl ServerConfig {
    pub fn identity(&self) -> String {
        self.identity
            .clone()
            .unwrap_or_else(|| format!("dns://{}:{}", self.bind_address, self.dns_port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            metrics_port: default_metrics_port(),
            bind_address: default_bind_address(),
            identity: None,
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_metrics_port() -> Option<u16> {
    Some(9153)
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

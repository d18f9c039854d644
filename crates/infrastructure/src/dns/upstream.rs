use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::{self, Transport};
use async_trait::async_trait;
use ferrous_finalize_application::ports::{DnsHandler, LookupRequest, UpstreamLookup};
use ferrous_finalize_domain::{DomainError, UpstreamConfig};
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

/// Plain forwarder to an ordered list of upstream servers.
///
/// Serves both as the pipeline stage in front of finalization and as the
/// lookup capability used to follow alias targets. Servers are tried in
/// order; a truncated UDP answer is retried once over TCP against the same
/// server.
pub struct UpstreamForwarder {
    servers: Vec<SocketAddr>,
    timeout: Duration,
}

impl UpstreamForwarder {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self { servers, timeout }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, DomainError> {
        let servers = config
            .socket_addrs()
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;
        Ok(Self::new(servers, config.timeout()))
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    /// Sends `message` to each server until one answers.
    pub async fn exchange(&self, message: &Message) -> Result<Message, DomainError> {
        if self.servers.is_empty() {
            return Err(DomainError::TransportNoUpstreamServers);
        }

        let bytes = MessageBuilder::serialize_message(message)?;
        let mut last_error = DomainError::TransportAllServersUnreachable;

        for server in &self.servers {
            match self.exchange_with(*server, &bytes, message.id()).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(server = %server, error = %e, "Upstream query failed, trying next server");
                    last_error = e;
                }
            }
        }

        if self.servers.len() > 1 {
            Err(DomainError::TransportAllServersUnreachable)
        } else {
            Err(last_error)
        }
    }

    async fn exchange_with(
        &self,
        server: SocketAddr,
        bytes: &[u8],
        id: u16,
    ) -> Result<Message, DomainError> {
        let response = self.send_over(&transport::udp(server), bytes, id).await?;
        if !response.truncated() {
            return Ok(response);
        }

        debug!(server = %server, "Truncated UDP response, retrying over TCP");
        self.send_over(&transport::tcp(server), bytes, id).await
    }

    async fn send_over(
        &self,
        transport: &Transport,
        bytes: &[u8],
        id: u16,
    ) -> Result<Message, DomainError> {
        let response = transport.send(bytes, self.timeout).await?;
        debug!(
            protocol = response.protocol_used,
            bytes = response.bytes.len(),
            "Upstream response received"
        );
        ResponseParser::parse_for(&response.bytes, id)
    }
}

#[async_trait]
impl DnsHandler for UpstreamForwarder {
    async fn handle(&self, request: &Message) -> Result<Option<Message>, DomainError> {
        self.exchange(request).await.map(Some)
    }
}

#[async_trait]
impl UpstreamLookup for UpstreamForwarder {
    async fn lookup(
        &self,
        request: &LookupRequest,
        target: &Name,
        record_type: RecordType,
    ) -> Result<Message, DomainError> {
        debug!(
            server = %request.server,
            target = %target,
            record_type = ?record_type,
            "Upstream lookup"
        );
        let query = MessageBuilder::build_query(target, record_type);
        let response = self.exchange(&query).await?;
        debug!(
            target = %target,
            rcode = ResponseParser::rcode_to_status(response.response_code()),
            answers = response.answers().len(),
            "Upstream lookup answered"
        );
        Ok(response)
    }
}

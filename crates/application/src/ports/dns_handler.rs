use async_trait::async_trait;
use ferrous_finalize_domain::DomainError;
use hickory_proto::op::Message;

/// The pipeline stage that runs before finalization.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    /// Produce a response for `request`. `Ok(None)` means the stage wrote
    /// nothing back.
    async fn handle(&self, request: &Message) -> Result<Option<Message>, DomainError>;
}

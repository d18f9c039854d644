use async_trait::async_trait;
use ferrous_finalize_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use std::sync::Arc;

/// Metadata of the request being finalized.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    /// Original question name; `None` when the request carried no question.
    pub query_name: Option<Name>,
    pub query_type: RecordType,
    /// Server identity used as the metrics label.
    pub server: Arc<str>,
}

impl LookupRequest {
    pub fn new(query_name: Name, query_type: RecordType, server: impl Into<Arc<str>>) -> Self {
        Self {
            query_name: Some(query_name),
            query_type,
            server: server.into(),
        }
    }

    /// Takes the first question of `request`, falling back to `response`.
    pub fn from_messages(request: &Message, response: &Message, server: Arc<str>) -> Self {
        let query = request
            .queries()
            .first()
            .or_else(|| response.queries().first());

        Self {
            query_name: query.map(|q| q.name().clone()),
            query_type: query.map_or(RecordType::A, |q| q.query_type()),
            server,
        }
    }
}

/// Resolves a single alias target.
///
/// Implementations own their retry and timeout policy; a timeout surfaces as
/// an `Err` like any other transport failure.
#[async_trait]
pub trait UpstreamLookup: Send + Sync {
    async fn lookup(
        &self,
        request: &LookupRequest,
        target: &Name,
        record_type: RecordType,
    ) -> Result<Message, DomainError>;
}

use super::error::FinalizeError;
use super::finalize_cname::FinalizeCnameUseCase;
use crate::ports::{DnsHandler, LookupRequest, ResponseWriter};
use ferrous_finalize_domain::FinalizeOutcome;
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::debug;

/// Runs the next handler, finalizes its response and writes the result.
pub struct ServeFinalizedUseCase {
    next: Arc<dyn DnsHandler>,
    finalizer: Arc<FinalizeCnameUseCase>,
    server: Arc<str>,
}

impl ServeFinalizedUseCase {
    pub fn new(
        next: Arc<dyn DnsHandler>,
        finalizer: Arc<FinalizeCnameUseCase>,
        server: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            next,
            finalizer,
            server: server.into(),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub async fn execute<W>(
        &self,
        request: &Message,
        writer: &mut W,
    ) -> Result<FinalizeOutcome, FinalizeError>
    where
        W: ResponseWriter + ?Sized,
    {
        let config = self.finalizer.config();
        debug!(
            id = request.id(),
            query = ?request.queries().first(),
            force_resolve = config.force_resolve,
            max_depth = config.max_depth,
            "Serving query"
        );

        let mut response = self
            .next
            .handle(request)
            .await?
            .ok_or(FinalizeError::NoResponse)?;

        debug!(
            rcode = ?response.response_code(),
            answers = response.answers().len(),
            "Upstream response"
        );

        let lookup_request = LookupRequest::from_messages(request, &response, Arc::clone(&self.server));
        let outcome = self.finalizer.execute(&lookup_request, &mut response).await;

        writer
            .write_message(&response)
            .await
            .map_err(FinalizeError::Write)?;

        Ok(outcome)
    }
}

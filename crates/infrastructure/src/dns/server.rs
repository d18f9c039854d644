use super::forwarding::MessageBuilder;
use ferrous_finalize_application::ports::ResponseWriter;
use ferrous_finalize_application::use_cases::{FinalizeError, ServeFinalizedUseCase};
use hickory_proto::op::{Message, MessageType};
use std::io;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Decodes raw queries and drives them through the finalize pipeline.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<ServeFinalizedUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ServeFinalizedUseCase>) -> Self {
        Self { use_case }
    }

    /// Handles one wire-format query. Only a failure to write the response
    /// is returned as an error.
    pub async fn handle_bytes<W>(&self, query: &[u8], writer: &mut W) -> io::Result<()>
    where
        W: ResponseWriter + ?Sized,
    {
        let request = match Message::from_vec(query) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, bytes = query.len(), "Dropping undecodable query");
                return Ok(());
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(id = request.id(), "Ignoring non-query message");
            return Ok(());
        }

        match self.use_case.execute(&request, writer).await {
            Ok(outcome) => {
                debug!(
                    server = self.use_case.server(),
                    id = request.id(),
                    outcome = %outcome,
                    "Query served"
                );
                Ok(())
            }
            Err(FinalizeError::Write(e)) => {
                error!(id = request.id(), error = %e, "Failed to write response");
                Err(e)
            }
            Err(e) => {
                error!(id = request.id(), error = %e, "Query failed");
                match e.response_code() {
                    Some(code) => {
                        let reply = MessageBuilder::build_error_response(&request, code);
                        writer.write_message(&reply).await
                    }
                    None => Ok(()),
                }
            }
        }
    }
}

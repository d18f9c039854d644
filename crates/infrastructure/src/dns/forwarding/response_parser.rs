use ferrous_finalize_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<Message, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        debug!(
            id = message.id(),
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            truncated = message.truncated(),
            "DNS response parsed"
        );

        Ok(message)
    }

    /// Parses a response and checks it answers the query with `expected_id`.
    pub fn parse_for(response_bytes: &[u8], expected_id: u16) -> Result<Message, DomainError> {
        let message = Self::parse(response_bytes)?;
        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID {} does not match query ID {}",
                message.id(),
                expected_id
            )));
        }
        Ok(message)
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

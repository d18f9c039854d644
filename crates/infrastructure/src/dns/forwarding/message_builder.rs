//! DNS Message Builder
//!
//! Constructs DNS query messages in wire format using `hickory-proto`.

use ferrous_finalize_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `name`/`record_type` with a random ID.
    pub fn build_query(name: &Name, record_type: RecordType) -> Message {
        let mut query = Query::query(name.clone(), record_type);
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new();
        message.set_id(fastrand::u16(..));
        message.set_message_type(MessageType::Query);
        message.set_op_code(OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);
        message
    }

    /// Build an empty reply to `request` carrying `code`.
    pub fn build_error_response(request: &Message, code: ResponseCode) -> Message {
        let mut response = Message::new();
        response.set_id(request.id());
        response.set_message_type(MessageType::Response);
        response.set_op_code(request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        response.set_response_code(code);
        response.add_queries(request.queries().to_vec());
        response
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

use async_trait::async_trait;
use hickory_proto::op::Message;
use std::io;

#[async_trait]
pub trait ResponseWriter: Send {
    async fn write_message(&mut self, message: &Message) -> io::Result<()>;
}

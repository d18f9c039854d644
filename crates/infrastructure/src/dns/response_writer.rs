use super::forwarding::MessageBuilder;
use super::transport::tcp::send_with_length_prefix;
use async_trait::async_trait;
use ferrous_finalize_application::ports::ResponseWriter;
use hickory_proto::op::Message;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::UdpSocket;
use tracing::debug;

fn encode(message: &Message) -> io::Result<Vec<u8>> {
    MessageBuilder::serialize_message(message).map_err(|e| io::Error::other(e.to_string()))
}

/// Sends the response back to the UDP peer the query came from.
pub struct UdpResponseWriter {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
}

impl UdpResponseWriter {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr) -> Self {
        Self { socket, peer }
    }
}

#[async_trait]
impl ResponseWriter for UdpResponseWriter {
    async fn write_message(&mut self, message: &Message) -> io::Result<()> {
        let bytes = encode(message)?;
        let sent = self.socket.send_to(&bytes, self.peer).await?;
        debug!(peer = %self.peer, bytes = sent, "UDP response sent");
        Ok(())
    }
}

/// Writes length-prefixed responses onto a TCP stream.
pub struct TcpResponseWriter<'a, S> {
    stream: &'a mut S,
}

impl<'a, S> TcpResponseWriter<'a, S>
where
    S: AsyncWriteExt + Unpin + Send,
{
    pub fn new(stream: &'a mut S) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl<S> ResponseWriter for TcpResponseWriter<'_, S>
where
    S: AsyncWriteExt + Unpin + Send,
{
    async fn write_message(&mut self, message: &Message) -> io::Result<()> {
        let bytes = encode(message)?;
        send_with_length_prefix(&mut *self.stream, &bytes)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e.to_string()))
    }
}

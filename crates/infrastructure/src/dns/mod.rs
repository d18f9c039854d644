pub mod forwarding;
pub mod response_writer;
pub mod server;
pub mod transport;
pub mod upstream;

pub use forwarding::{MessageBuilder, ResponseParser};
pub use response_writer::{TcpResponseWriter, UdpResponseWriter};
pub use server::DnsServerHandler;
pub use upstream::UpstreamForwarder;

use ferrous_finalize_infrastructure::dns::transport::tcp::read_with_length_prefix;
use ferrous_finalize_infrastructure::dns::{DnsServerHandler, TcpResponseWriter, UdpResponseWriter};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// UDP and TCP listeners for one address, bound before they are run.
pub struct DnsServer {
    socket_addr: SocketAddr,
    udp_socket: Arc<UdpSocket>,
    tcp_listener: TcpListener,
    handler: Arc<DnsServerHandler>,
}

impl DnsServer {
    pub fn bind(socket_addr: SocketAddr, handler: DnsServerHandler) -> anyhow::Result<Self> {
        let domain = if socket_addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let tcp_listener = create_tcp_listener(domain, socket_addr)?;

        info!(bind_address = %socket_addr, "DNS server bound");

        Ok(Self {
            socket_addr,
            udp_socket,
            tcp_listener,
            handler: Arc::new(handler),
        })
    }

    /// Serves until a worker exits, which only happens on failure.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut join_set: JoinSet<()> = JoinSet::new();
        join_set.spawn(run_udp_worker(self.udp_socket, self.handler.clone()));
        join_set.spawn(run_tcp_acceptor(self.tcp_listener, self.handler));

        info!("DNS server ready on {} (UDP/TCP)", self.socket_addr);

        match join_set.join_next().await {
            Some(Err(e)) => Err(anyhow::anyhow!("DNS worker failed: {}", e)),
            _ => Err(anyhow::anyhow!("DNS worker exited")),
        }
    }
}

async fn run_udp_worker(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>) {
    let mut recv_buf = [0u8; 4096];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!(error = %e, "UDP recv error");
                continue;
            }
        };

        let handler = handler.clone();
        let socket = socket.clone();
        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        tokio::spawn(async move {
            let mut writer = UdpResponseWriter::new(socket, from);
            if let Err(e) = handler.handle_bytes(&query, &mut writer).await {
                debug!(peer = %from, error = %e, "UDP response not delivered");
            }
        });
    }
}

async fn run_tcp_acceptor(listener: TcpListener, handler: Arc<DnsServerHandler>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let handler = handler.clone();
                tokio::spawn(serve_tcp_connection(stream, peer, handler));
            }
            Err(e) => error!(error = %e, "TCP accept error"),
        }
    }
}

/// Serves queries on one connection until the peer closes it or goes idle.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<DnsServerHandler>,
) {
    loop {
        let query =
            match tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream))
                .await
            {
                Ok(Ok(query)) => query,
                Ok(Err(_)) | Err(_) => break,
            };

        let mut writer = TcpResponseWriter::new(&mut stream);
        if let Err(e) = handler.handle_bytes(&query, &mut writer).await {
            debug!(peer = %peer, error = %e, "TCP response not delivered");
            break;
        }
    }

    debug!(peer = %peer, "TCP connection closed");
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}

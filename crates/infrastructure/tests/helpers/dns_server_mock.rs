#![allow(dead_code)]
use ferrous_finalize_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use ferrous_finalize_infrastructure::dns::MessageBuilder;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record, RecordType};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::watch;

/// Static answers keyed by lowercase owner name.
#[derive(Default, Clone)]
pub struct Zone {
    records: HashMap<String, Vec<Record>>,
}

impl Zone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, record: Record) -> Self {
        let key = record.name().to_lowercase().to_ascii();
        self.records.entry(key).or_default().push(record);
        self
    }

    /// Records at `owner` matching `record_type`, or its CNAME if it has one.
    fn answers(&self, owner: &str, record_type: RecordType) -> Option<Vec<Record>> {
        self.records.get(owner).map(|records| {
            records
                .iter()
                .filter(|r| r.record_type() == record_type || r.record_type() == RecordType::CNAME)
                .cloned()
                .collect()
        })
    }
}

/// How the UDP side of the mock answers.
#[derive(Clone, Copy, PartialEq, Eq)]
enum UdpMode {
    Answer,
    Silent,
    /// Empty reply with the TC bit set; the full answer is only on TCP.
    Truncate,
    /// A forged reply from another local port precedes the real one.
    Decoy,
}

/// Loopback DNS responder serving a fixed [`Zone`] over UDP and TCP on the
/// same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: watch::Sender<bool>,
}

impl MockDnsServer {
    pub async fn start(zone: Zone) -> Result<Self, std::io::Error> {
        Self::spawn(zone, UdpMode::Answer).await
    }

    /// Accepts queries but never answers them.
    pub async fn start_silent() -> Result<Self, std::io::Error> {
        Self::spawn(Zone::new(), UdpMode::Silent).await
    }

    /// Answers UDP with truncated replies and TCP with the zone.
    pub async fn start_truncating(zone: Zone) -> Result<Self, std::io::Error> {
        Self::spawn(zone, UdpMode::Truncate).await
    }

    /// Sends a forged `6.6.6.6` answer from a second socket before each
    /// genuine UDP reply.
    pub async fn start_with_decoy(zone: Zone) -> Result<Self, std::io::Error> {
        Self::spawn(zone, UdpMode::Decoy).await
    }

    async fn bind_pair() -> Result<(UdpSocket, TcpListener), std::io::Error> {
        let mut last_error = None;
        for _ in 0..16 {
            let udp = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let port = udp.local_addr()?.port();
            match TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port))).await {
                Ok(tcp) => return Ok((udp, tcp)),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| std::io::Error::other("no free port")))
    }

    async fn spawn(zone: Zone, mode: UdpMode) -> Result<Self, std::io::Error> {
        let (socket, listener) = Self::bind_pair().await?;
        let addr = socket.local_addr()?;
        let decoy = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let zone = Arc::new(zone);

        {
            let zone = Arc::clone(&zone);
            let counter = Arc::clone(&udp_queries);
            let mut shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];

                loop {
                    tokio::select! {
                        _ = shutdown_rx.changed() => {
                            break;
                        }
                        result = socket.recv_from(&mut buf) => {
                            let Ok((len, peer)) = result else { continue };
                            counter.fetch_add(1, Ordering::SeqCst);
                            Self::answer_udp(&zone, mode, &socket, &decoy, &buf[..len], peer).await;
                        }
                    }
                }
            });
        }

        {
            let counter = Arc::clone(&tcp_queries);
            let mut shutdown_rx = shutdown_rx;
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown_rx.changed() => {
                            break;
                        }
                        result = listener.accept() => {
                            let Ok((stream, _)) = result else { continue };
                            let zone = Arc::clone(&zone);
                            let counter = Arc::clone(&counter);
                            tokio::spawn(Self::serve_tcp(stream, zone, counter));
                        }
                    }
                }
            });
        }

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx,
        })
    }

    async fn answer_udp(
        zone: &Zone,
        mode: UdpMode,
        socket: &UdpSocket,
        decoy: &UdpSocket,
        query: &[u8],
        peer: SocketAddr,
    ) {
        let Some(request) = Message::from_vec(query).ok() else {
            return;
        };

        match mode {
            UdpMode::Silent => {}
            UdpMode::Answer => {
                if let Some(bytes) = Self::encode(Self::build_response(zone, &request)) {
                    let _ = socket.send_to(&bytes, peer).await;
                }
            }
            UdpMode::Truncate => {
                if let Some(mut response) = Self::build_response(zone, &request) {
                    response.take_answers();
                    response.set_truncated(true);
                    if let Some(bytes) = Self::encode(Some(response)) {
                        let _ = socket.send_to(&bytes, peer).await;
                    }
                }
            }
            UdpMode::Decoy => {
                if let Some(response) = Self::build_response(zone, &request) {
                    let mut forged = response.clone();
                    let forged_answers = forged
                        .take_answers()
                        .into_iter()
                        .map(|r| {
                            Record::from_rdata(
                                r.name().clone(),
                                r.ttl(),
                                RData::A(A(Ipv4Addr::new(6, 6, 6, 6))),
                            )
                        })
                        .collect();
                    forged.insert_answers(forged_answers);
                    if let Some(bytes) = Self::encode(Some(forged)) {
                        let _ = decoy.send_to(&bytes, peer).await;
                    }
                    if let Some(bytes) = Self::encode(Some(response)) {
                        let _ = socket.send_to(&bytes, peer).await;
                    }
                }
            }
        }
    }

    async fn serve_tcp(mut stream: TcpStream, zone: Arc<Zone>, counter: Arc<AtomicUsize>) {
        while let Ok(query) = read_with_length_prefix(&mut stream).await {
            counter.fetch_add(1, Ordering::SeqCst);
            let Some(request) = Message::from_vec(&query).ok() else {
                break;
            };
            let Some(bytes) = Self::encode(Self::build_response(&zone, &request)) else {
                break;
            };
            if send_with_length_prefix(&mut stream, &bytes).await.is_err() {
                break;
            }
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Total queries received over both transports.
    pub fn queries(&self) -> usize {
        self.udp_queries() + self.tcp_queries()
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    fn build_response(zone: &Zone, request: &Message) -> Option<Message> {
        let question = request.queries().first()?.clone();
        let owner = question.name().to_lowercase().to_ascii();

        let mut response = Message::new();
        response.set_id(request.id());
        response.set_message_type(MessageType::Response);
        response.set_op_code(request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        response.add_query(question.clone());

        match zone.answers(&owner, question.query_type()) {
            Some(answers) => {
                response.set_response_code(ResponseCode::NoError);
                response.insert_answers(answers);
            }
            None => {
                response.set_response_code(ResponseCode::NXDomain);
            }
        }

        Some(response)
    }

    fn encode(response: Option<Message>) -> Option<Vec<u8>> {
        MessageBuilder::serialize_message(&response?).ok()
    }

    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

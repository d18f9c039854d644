#![allow(dead_code)]
use async_trait::async_trait;
use ferrous_finalize_application::ports::{
    DnsHandler, FinalizeMetrics, LookupRequest, ResponseWriter, UpstreamLookup,
};
use ferrous_finalize_domain::DomainError;
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::{Name, Record, RecordType};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum MockAnswer {
    Records(Vec<Record>),
    Error(DomainError),
}

/// Answers lookups from a fixed table; unknown names get an empty answer.
#[derive(Clone, Default)]
pub struct MockUpstream {
    answers: Arc<Mutex<HashMap<String, MockAnswer>>>,
    calls: Arc<Mutex<Vec<(Name, RecordType)>>>,
}

fn key(name: &Name) -> String {
    let mut n = name.to_lowercase();
    n.set_fqdn(true);
    n.to_ascii()
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_records(&self, target: &str, records: Vec<Record>) {
        self.answers
            .lock()
            .unwrap()
            .insert(key(&super::name(target)), MockAnswer::Records(records));
    }

    pub fn set_error(&self, target: &str, error: DomainError) {
        self.answers
            .lock()
            .unwrap()
            .insert(key(&super::name(target)), MockAnswer::Error(error));
    }

    pub fn calls(&self) -> Vec<(Name, RecordType)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UpstreamLookup for MockUpstream {
    async fn lookup(
        &self,
        _request: &LookupRequest,
        target: &Name,
        record_type: RecordType,
    ) -> Result<Message, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.clone(), record_type));

        let mut message = Message::new();
        message.set_message_type(MessageType::Response);

        match self.answers.lock().unwrap().get(&key(target)) {
            Some(MockAnswer::Records(records)) => {
                message.insert_answers(records.clone());
                Ok(message)
            }
            Some(MockAnswer::Error(e)) => Err(e.clone()),
            None => Ok(message),
        }
    }
}

#[derive(Default)]
pub struct MockMetrics {
    pub requests: AtomicU64,
    pub circular_references: AtomicU64,
    pub dangling_aliases: AtomicU64,
    pub max_depth_reached: AtomicU64,
    pub upstream_errors: AtomicU64,
    pub durations: AtomicU64,
    servers: Mutex<Vec<String>>,
}

impl MockMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn circular_references(&self) -> u64 {
        self.circular_references.load(Ordering::Relaxed)
    }

    pub fn dangling_aliases(&self) -> u64 {
        self.dangling_aliases.load(Ordering::Relaxed)
    }

    pub fn max_depth_reached(&self) -> u64 {
        self.max_depth_reached.load(Ordering::Relaxed)
    }

    pub fn upstream_errors(&self) -> u64 {
        self.upstream_errors.load(Ordering::Relaxed)
    }

    pub fn durations(&self) -> u64 {
        self.durations.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.requests()
            + self.circular_references()
            + self.dangling_aliases()
            + self.max_depth_reached()
            + self.upstream_errors()
            + self.durations()
    }

    pub fn servers(&self) -> Vec<String> {
        self.servers.lock().unwrap().clone()
    }

    fn label(&self, server: &str) {
        self.servers.lock().unwrap().push(server.to_string());
    }
}

impl FinalizeMetrics for MockMetrics {
    fn inc_requests(&self, server: &str) {
        self.label(server);
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_circular_references(&self, server: &str) {
        self.label(server);
        self.circular_references.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_dangling_aliases(&self, server: &str) {
        self.label(server);
        self.dangling_aliases.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_max_depth_reached(&self, server: &str) {
        self.label(server);
        self.max_depth_reached.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_upstream_errors(&self, server: &str) {
        self.label(server);
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn observe_duration(&self, server: &str, _elapsed: Duration) {
        self.label(server);
        self.durations.fetch_add(1, Ordering::Relaxed);
    }
}

/// Next-handler stand-in returning a canned response.
pub struct MockNextHandler {
    response: Mutex<Option<Result<Option<Message>, DomainError>>>,
    seen: Mutex<Vec<Message>>,
}

impl MockNextHandler {
    pub fn responding(message: Message) -> Self {
        Self {
            response: Mutex::new(Some(Ok(Some(message)))),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn silent() -> Self {
        Self {
            response: Mutex::new(Some(Ok(None))),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            response: Mutex::new(Some(Err(error))),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsHandler for MockNextHandler {
    async fn handle(&self, request: &Message) -> Result<Option<Message>, DomainError> {
        self.seen.lock().unwrap().push(request.clone());
        self.response.lock().unwrap().take().unwrap_or(Ok(None))
    }
}

#[derive(Default)]
pub struct RecordingWriter {
    pub written: Vec<Message>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &Message {
        self.written.last().expect("no message written")
    }
}

#[async_trait]
impl ResponseWriter for RecordingWriter {
    async fn write_message(&mut self, message: &Message) -> io::Result<()> {
        self.written.push(message.clone());
        Ok(())
    }
}

pub struct FailingWriter;

#[async_trait]
impl ResponseWriter for FailingWriter {
    async fn write_message(&mut self, _message: &Message) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
    }
}

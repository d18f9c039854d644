#![allow(dead_code)]
use ferrous_finalize_application::ports::FinalizeMetrics;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory finalize metrics; records the server label of every call.
#[derive(Default)]
pub struct CountingMetrics {
    pub requests: AtomicU64,
    pub circular_references: AtomicU64,
    pub dangling_aliases: AtomicU64,
    pub max_depth_reached: AtomicU64,
    pub upstream_errors: AtomicU64,
    pub durations: AtomicU64,
    servers: Mutex<Vec<String>>,
}

impl CountingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::SeqCst)
    }

    pub fn servers(&self) -> Vec<String> {
        self.servers.lock().unwrap().clone()
    }

    fn bump(&self, counter: &AtomicU64, server: &str) {
        counter.fetch_add(1, Ordering::SeqCst);
        self.servers.lock().unwrap().push(server.to_string());
    }
}

impl FinalizeMetrics for CountingMetrics {
    fn inc_requests(&self, server: &str) {
        self.bump(&self.requests, server);
    }

    fn inc_circular_references(&self, server: &str) {
        self.bump(&self.circular_references, server);
    }

    fn inc_dangling_aliases(&self, server: &str) {
        self.bump(&self.dangling_aliases, server);
    }

    fn inc_max_depth_reached(&self, server: &str) {
        self.bump(&self.max_depth_reached, server);
    }

    fn inc_upstream_errors(&self, server: &str) {
        self.bump(&self.upstream_errors, server);
    }

    fn observe_duration(&self, server: &str, _elapsed: Duration) {
        self.bump(&self.durations, server);
    }
}

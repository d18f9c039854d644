pub mod dns;
pub mod web;

pub use dns::DnsServer;
pub use web::MetricsServer;

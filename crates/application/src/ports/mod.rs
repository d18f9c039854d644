mod dns_handler;
mod finalize_metrics;
mod response_writer;
mod upstream_lookup;

pub use dns_handler::DnsHandler;
pub use finalize_metrics::FinalizeMetrics;
pub use response_writer::ResponseWriter;
pub use upstream_lookup::{LookupRequest, UpstreamLookup};

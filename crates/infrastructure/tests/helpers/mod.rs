mod counting_metrics;
mod dns_server_mock;

pub use builders::*;
pub use counting_metrics::*;
pub use dns_server_mock::*;

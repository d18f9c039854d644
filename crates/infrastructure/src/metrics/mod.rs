mod registry;

pub use registry::FinalizeMetricsRegistry;

use std::time::Duration;

/// Write-only sink for finalization counters, labelled by server identity.
///
/// Implementations are shared across concurrent requests and must be safe
/// for concurrent increments.
pub trait FinalizeMetrics: Send + Sync {
    fn inc_requests(&self, server: &str);

    fn inc_circular_references(&self, server: &str);

    fn inc_dangling_aliases(&self, server: &str);

    fn inc_max_depth_reached(&self, server: &str);

    fn inc_upstream_errors(&self, server: &str);

    fn observe_duration(&self, server: &str, elapsed: Duration);
}

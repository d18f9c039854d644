use ferrous_finalize_application::ports::FinalizeMetrics;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

const REQUEST_COUNT: &str = "ferrous_finalize_request_count_total";
const CIRCULAR_REFERENCE_COUNT: &str = "ferrous_finalize_circular_reference_count_total";
const DANGLING_CNAME_COUNT: &str = "ferrous_finalize_dangling_cname_count_total";
const MAXDEPTH_REACHED_COUNT: &str = "ferrous_finalize_maxdepth_reached_count_total";
const UPSTREAM_ERROR_COUNT: &str = "ferrous_finalize_upstream_error_count_total";
const REQUEST_DURATION: &str = "ferrous_finalize_request_duration_seconds";

/// Upper bounds in seconds: 0.25ms doubling sixteen times, up to ~8.2s.
const TIME_BUCKETS: [f64; 16] = [
    0.00025, 0.0005, 0.001, 0.002, 0.004, 0.008, 0.016, 0.032, 0.064, 0.128, 0.256, 0.512, 1.024,
    2.048, 4.096, 8.192,
];

const SERVER_LABEL: &str = "server";

/// Finalize metrics recorded through the `metrics` facade and exposed by a
/// Prometheus recorder.
#[derive(Clone)]
pub struct FinalizeMetricsRegistry {
    handle: PrometheusHandle,
}

impl FinalizeMetricsRegistry {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Prometheus builder with the request duration buckets configured.
    pub fn builder() -> Result<PrometheusBuilder, BuildError> {
        PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), &TIME_BUCKETS)
    }

    /// Installs the process-wide recorder. Can succeed once per process.
    pub fn install() -> Result<Self, BuildError> {
        let handle = Self::builder()?.install_recorder()?;
        Self::describe();
        Ok(Self::new(handle))
    }

    /// Registers help text for every family on the current recorder.
    pub fn describe() {
        describe_counter!(REQUEST_COUNT, Unit::Count, "Counter of requests processed.");
        describe_counter!(
            CIRCULAR_REFERENCE_COUNT,
            Unit::Count,
            "Counter of detected circular references."
        );
        describe_counter!(
            DANGLING_CNAME_COUNT,
            Unit::Count,
            "Counter of CNAMES that couldn't be resolved."
        );
        describe_counter!(
            MAXDEPTH_REACHED_COUNT,
            Unit::Count,
            "Counter of incidents when max depth is reached while trying to resolve a CNAME."
        );
        describe_counter!(
            UPSTREAM_ERROR_COUNT,
            Unit::Count,
            "Counter of upstream errors received."
        );
        describe_histogram!(
            REQUEST_DURATION,
            Unit::Seconds,
            "Histogram of the time each request took."
        );
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl FinalizeMetrics for FinalizeMetricsRegistry {
    fn inc_requests(&self, server: &str) {
        counter!(REQUEST_COUNT, SERVER_LABEL => server.to_owned()).increment(1);
    }

    fn inc_circular_references(&self, server: &str) {
        counter!(CIRCULAR_REFERENCE_COUNT, SERVER_LABEL => server.to_owned()).increment(1);
    }

    fn inc_dangling_aliases(&self, server: &str) {
        counter!(DANGLING_CNAME_COUNT, SERVER_LABEL => server.to_owned()).increment(1);
    }

    fn inc_max_depth_reached(&self, server: &str) {
        counter!(MAXDEPTH_REACHED_COUNT, SERVER_LABEL => server.to_owned()).increment(1);
    }

    fn inc_upstream_errors(&self, server: &str) {
        counter!(UPSTREAM_ERROR_COUNT, SERVER_LABEL => server.to_owned()).increment(1);
    }

    fn observe_duration(&self, server: &str, elapsed: Duration) {
        histogram!(REQUEST_DURATION, SERVER_LABEL => server.to_owned())
            .record(elapsed.as_secs_f64());
    }
}

use ferrous_finalize_application::use_cases::{FinalizeCnameUseCase, ServeFinalizedUseCase};
use ferrous_finalize_domain::Config;
use ferrous_finalize_infrastructure::dns::{DnsServerHandler, UpstreamForwarder};
use ferrous_finalize_infrastructure::metrics::FinalizeMetricsRegistry;
use std::sync::Arc;
use tracing::info;

/// Everything the listeners need, wired once at startup.
pub struct FinalizeServices {
    pub handler: DnsServerHandler,
    pub metrics: Arc<FinalizeMetricsRegistry>,
}

impl FinalizeServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let forwarder = Arc::new(UpstreamForwarder::from_config(&config.upstream)?);
        info!(
            servers = ?forwarder.servers(),
            timeout_ms = config.upstream.query_timeout,
            "Upstream forwarder ready"
        );

        let metrics = Arc::new(FinalizeMetricsRegistry::install()?);
        let finalizer = Arc::new(FinalizeCnameUseCase::new(
            forwarder.clone(),
            metrics.clone(),
            config.finalize,
        ));

        let identity = config.server.identity();
        info!(server = %identity, "Finalize stage registered");

        let use_case = Arc::new(ServeFinalizedUseCase::new(forwarder, finalizer, identity));

        Ok(Self {
            handler: DnsServerHandler::new(use_case),
            metrics,
        })
    }
}

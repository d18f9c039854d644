use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use ferrous_finalize_infrastructure::metrics::FinalizeMetricsRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// HTTP server exposing `/metrics`, bound before it is run.
pub struct MetricsServer {
    listener: TcpListener,
    metrics: Arc<FinalizeMetricsRegistry>,
}

impl MetricsServer {
    pub async fn bind(
        bind_addr: SocketAddr,
        metrics: Arc<FinalizeMetricsRegistry>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            bind_address = %bind_addr,
            metrics_url = format!("http://{}/metrics", bind_addr),
            "Metrics server bound"
        );
        Ok(Self { listener, metrics })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        axum::serve(self.listener, create_app(self.metrics)).await?;
        Ok(())
    }
}

fn create_app(metrics: Arc<FinalizeMetricsRegistry>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<Arc<FinalizeMetricsRegistry>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], metrics.render())
}

async fn health_handler() -> &'static str {
    "OK"
}

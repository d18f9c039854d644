use anyhow::Context;
use clap::Parser;
use ferrous_finalize_domain::CliOverrides;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-finalize")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Finalize - DNS forwarder that flattens CNAME chains")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Metrics server port
    #[arg(short = 'm', long)]
    metrics_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Maximum alias hops to follow
    #[arg(long)]
    max_depth: Option<usize>,

    /// Always query upstream for the last alias target
    #[arg(long)]
    force_resolve: bool,

    /// Finalize settings in directive form, e.g. "finalize max_depth 5"
    #[arg(long, value_name = "DIRECTIVE")]
    directive: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        metrics_port: cli.metrics_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        directive: cli.directive.clone(),
        max_depth: cli.max_depth,
        force_resolve: cli.force_resolve,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Finalize v{}", env!("CARGO_PKG_VERSION"));
    info!(
        max_depth = config.finalize.max_depth,
        force_resolve = config.finalize.force_resolve,
        upstreams = ?config.upstream.servers,
        "Finalize settings loaded"
    );

    let services = di::FinalizeServices::new(&config)?;

    let bind_ip: IpAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address))?;

    let dns_addr = SocketAddr::new(bind_ip, config.server.dns_port);
    let dns_server = server::DnsServer::bind(dns_addr, services.handler)
        .with_context(|| format!("Failed to bind DNS server on {}", dns_addr))?;

    let metrics_server = match config.server.metrics_port {
        Some(port) => {
            let metrics_addr = SocketAddr::new(bind_ip, port);
            let bound = server::MetricsServer::bind(metrics_addr, services.metrics)
                .await
                .with_context(|| format!("Failed to bind metrics server on {}", metrics_addr))?;
            Some(bound)
        }
        None => None,
    };

    let metrics_task = async move {
        match metrics_server {
            Some(metrics_server) => metrics_server.run().await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        result = dns_server.run() => {
            result.context("DNS server stopped")?;
            anyhow::bail!("DNS server stopped unexpectedly");
        }
        result = metrics_task => {
            result.context("Metrics server stopped")?;
            anyhow::bail!("Metrics server stopped unexpectedly");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use proxy_admin::config::{loader::read_config, validate_config, AdminServiceConfig, ConfigError};
use proxy_admin::lifecycle::{signals, Shutdown};
use proxy_admin::observability::{logging, metrics};
use proxy_admin::HttpServer;

#[derive(Parser)]
#[command(name = "proxy-admin")]
#[command(about = "Admin API for reverse-proxy configuration files", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "PROXY_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Override `sites.root`.
    #[arg(long, env = "PROXY_ADMIN_ROOT")]
    root: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long, env = "PROXY_ADMIN_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => AdminServiceConfig::default(),
    };
    if let Some(root) = args.root {
        config.sites.root = root;
    }
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("proxy-admin v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        root = %config.sites.root.display(),
        reload_program = %config.reload.program,
        reload_timeout_secs = config.reload.timeout_secs,
        auth = config.admin.api_key.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

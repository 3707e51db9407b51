use anyhow::Result;
use clap::Parser;
use rackipam_api::ApiServer;
use rackipam_core::config::Config;
use rackipam_core::db::Db;
use rackipam_provision::ProvisioningService;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "rackipam", about = "RackIPAM - subnet, VLAN and IP address management")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/rackipam/rackipam.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_file(&cli.config)?;

    init_logging(&config.logging);

    info!(instance_id = %config.instance.id, "starting rackipam");

    let db = Db::open(&config.database.path)?;
    info!(path = %config.database.path.display(), "database opened");

    let service = Arc::new(ProvisioningService::new(
        db,
        config.provisioning.clone(),
    ));
    info!(
        batch_size = config.provisioning.batch_size,
        reserve_gateway = config.provisioning.reserve_gateway,
        "provisioning service ready"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::new();

    if config.api.enabled {
        let addr: SocketAddr = config.api.listen.parse()?;
        let api = ApiServer::new(addr, service.clone(), config.api.api_key.clone())
            .with_instance_id(&config.instance.id);

        let rx = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = api.run(rx).await {
                error!("REST API error: {e}");
            }
        }));
    } else {
        warn!("REST API disabled, nothing to serve");
    }

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, stopping services...");
    let _ = shutdown_tx.send(true);

    for task in tasks {
        let _ = task.await;
    }

    info!("rackipam stopped");
    Ok(())
}

fn init_logging(config: &rackipam_core::config::LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .init();
        }
    }
}

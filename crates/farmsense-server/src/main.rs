use anyhow::Result;
use farmsense_storage::{AnimalRepository, AnimalStore};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use farmsense_server::app;
use farmsense_server::config::{self, ServerConfig};
use farmsense_server::seed;
use farmsense_server::simulation::SimulationScheduler;
use farmsense_server::state::AppState;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  farmsense-server [config.toml]                              Start the server");
    eprintln!("  farmsense-server init-animals <config.toml> <seed.json>     Import animals from a seed file");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("farmsense=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("init-animals") => {
            let config_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("init-animals requires <config.toml> and <seed.json> arguments")
            })?;
            let seed_path = args.get(3).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("init-animals requires <seed.json> argument")
            })?;
            run_init_animals(config_path, seed_path).await
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args
                .get(1)
                .map(|s| s.as_str())
                .unwrap_or("config/server.toml");
            run_server(config_path).await
        }
    }
}

async fn open_store(config: &ServerConfig) -> Result<AnimalStore> {
    let db_url = config.database.connection_url();
    let store = AnimalStore::new(&db_url, Path::new(&config.database.data_dir)).await?;
    Ok(store)
}

async fn run_init_animals(config_path: &str, seed_path: &str) -> Result<()> {
    let config = config::ServerConfig::load(config_path)?;
    let store = open_store(&config).await?;
    let seed = seed::load_seed_file(seed_path)?;
    seed::init_animals(&store, &seed).await?;
    Ok(())
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = config::ServerConfig::load(config_path)?;

    tracing::info!(
        http_port = config.http_port,
        data_dir = %config.database.data_dir,
        simulation = config.simulation.enabled,
        hold_secs = config.critical.hold_secs,
        "farmsense-server starting"
    );

    let store: Arc<dyn AnimalRepository> = Arc::new(open_store(&config).await?);
    match store.count_animals().await {
        Ok(0) => tracing::warn!("No animals in the store; use init-animals to import a herd"),
        Ok(count) => tracing::info!(count, "Animals loaded"),
        Err(e) => tracing::error!(error = %e, "Failed to count animals"),
    }

    let http_port = config.http_port;
    let simulation = config.simulation.clone();
    let state = AppState::new(store, config);

    let simulation_handle = if simulation.enabled {
        let scheduler =
            SimulationScheduler::new(state.clone(), simulation.params(), simulation.tick_secs);
        Some(tokio::spawn(async move {
            scheduler.run().await;
        }))
    } else {
        tracing::info!("Simulation scheduler disabled");
        None
    };

    let http_addr: SocketAddr = ([0, 0, 0, 0], http_port).into();
    let http_listener = tokio::net::TcpListener::bind(http_addr).await?;
    let http_server = axum::serve(http_listener, app::build_http_app(state));

    tracing::info!(http = %http_addr, "Server started");

    if let Err(e) = http_server
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await
    {
        tracing::error!(error = %e, "HTTP server error");
    }

    if let Some(h) = simulation_handle {
        h.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

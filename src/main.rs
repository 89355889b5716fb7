//! travel-search: federated substring search over travel records
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use travel_search::{
    config,
    store::{load_backend, Backend},
    web::{create_router, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    let Some(config_path) = parse_args()? else {
        return Ok(());
    };

    // Load configuration
    let settings_path = config::settings_path(config_path.as_deref());
    let settings = config::load(settings_path.as_deref())?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting travel-search v{}", travel_search::VERSION);
    match &settings_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!("Execution mode: {:?}", settings.general.mode);

    // Select the backend, failing before any request is served
    let backend = load_backend(&settings)?;
    info!("Serving searches from the {} backend", backend.name());

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    let state = AppState::new(settings, backend);
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Parse command line arguments
///
/// Returns `None` when the process should exit after printing help or
/// version, otherwise the optional config file path.
fn parse_args() -> Result<Option<Option<PathBuf>>> {
    let mut config_path = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("{arg} requires a file path"),
            },
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("travel-search {}", travel_search::VERSION);
                return Ok(None);
            }
            other => bail!("unknown argument: {other} (see --help)"),
        }
    }

    Ok(Some(config_path))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
travel-search v{}
Federated substring search over accommodations, cities and countries

USAGE:
    travel-search [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    TRAVEL_SEARCH_SETTINGS_PATH    Path to settings.yml
    DATABASE_URL                   PostgreSQL URL; unset selects the in-memory store
    TRAVEL_SEARCH_MODE, APP_ENV    production or development
    TRAVEL_SEARCH_PORT, PORT       Server port
    TRAVEL_SEARCH_BIND_ADDRESS     Bind address
    TRAVEL_SEARCH_TIMEOUT          Lookup timeout in seconds (0 disables)
    TRAVEL_SEARCH_CONNECT_TIMEOUT  Database connect timeout in seconds
    TRAVEL_SEARCH_DEBUG            Enable debug logging (true/false)
    RUST_LOG                       Log filter, overrides the default level
"#,
        travel_search::VERSION
    );
}

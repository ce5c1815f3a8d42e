//! Lap event relay server.
//!
//! Clients connect to `/ws`; every event posted to `/lap/{id}` is broadcast
//! to all of them as `Car <id> crossed at <time>`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lapcast-server
//! cargo run --bin lapcast-server -- --host 0.0.0.0 --port 8080 --asset-dir ./laps
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use lapcast_server::{
    config::{
        DEFAULT_ASSET_DIR, DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
        DEFAULT_SHUTDOWN_GRACE_MS, DEFAULT_WRITE_TIMEOUT_MS, ServerConfig,
    },
    infrastructure::{BroadcastEngine, ConnectionRegistry, FileSystemAssetStore},
    ui::Server,
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetConnectionsUseCase, SubmitEventUseCase,
    },
};
use lapcast_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "lapcast-server")]
#[command(about = "Relays lap events to every connected WebSocket client", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory where uploaded images are stored
    #[arg(long, default_value = DEFAULT_ASSET_DIR)]
    asset_dir: PathBuf,

    /// Per-connection write timeout during broadcast in milliseconds (0 disables it)
    #[arg(long, default_value_t = DEFAULT_WRITE_TIMEOUT_MS)]
    write_timeout_ms: u64,

    /// Maximum request body size for event submissions in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// How long to wait for open connections to close on shutdown in milliseconds
    #[arg(long, default_value_t = DEFAULT_SHUTDOWN_GRACE_MS)]
    shutdown_grace_ms: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            asset_dir: args.asset_dir,
            write_timeout: ServerConfig::write_timeout_from_millis(args.write_timeout_ms),
            max_upload_bytes: args.max_upload_bytes,
            shutdown_grace: Duration::from_millis(args.shutdown_grace_ms),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());
    tracing::debug!("Configuration: {:?}", config);

    // Initialize dependencies in order:
    // 1. Registry, clock and asset store
    // 2. BroadcastEngine
    // 3. UseCases
    // 4. Server

    // 1. Create the connection registry (the only shared mutable state)
    let registry = Arc::new(ConnectionRegistry::new());
    let clock = Arc::new(SystemClock);
    let asset_store = Arc::new(FileSystemAssetStore::new(
        config.asset_dir.clone(),
        clock.clone(),
    ));

    // 2. Create BroadcastEngine
    let broadcast_engine = Arc::new(BroadcastEngine::new(
        registry.clone(),
        config.write_timeout,
    ));

    // 3. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(registry.clone()));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(registry.clone()));
    let submit_event_usecase = Arc::new(SubmitEventUseCase::new(
        asset_store,
        broadcast_engine,
        clock,
    ));
    let get_connections_usecase = Arc::new(GetConnectionsUseCase::new(registry));

    // 4. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        submit_event_usecase,
        get_connections_usecase,
    );
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

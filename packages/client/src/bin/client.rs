//! Lapcast command-line client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lapcast-client -- watch
//! cargo run --bin lapcast-client -- submit --id 42 --time 2024-01-01T00:00:00Z --image frame.jpg
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lapcast_client::{SubmitRequest, run_watch, submit_event};
use lapcast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "lapcast-client")]
#[command(about = "Watch live lap crossings or submit lap events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every crossing broadcast by the server (reconnects up to 5 times)
    Watch {
        /// WebSocket endpoint
        #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
        url: String,
    },
    /// Submit a lap event with optional images
    Submit {
        /// Server base URL
        #[arg(short = 's', long, default_value = "http://127.0.0.1:8080")]
        server: String,

        /// Event (car) identifier
        #[arg(short = 'i', long)]
        id: String,

        /// Display timestamp; the server's clock is used when omitted
        #[arg(short = 't', long)]
        time: Option<String>,

        /// Image file to attach (repeatable)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Watch { url } => run_watch(url).await,
        Command::Submit {
            server,
            id,
            time,
            images,
        } => {
            let request = SubmitRequest {
                server,
                event_id: id,
                time,
                images,
            };
            submit_event(&request).await.map(|body| println!("{}", body))
        }
    };

    if let Err(e) = result {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

//! ChittyChat CLI client.
//!
//! Joins the shared chat room, sends messages typed at the prompt and prints
//! every room notification together with the local Lamport clock.
//! Joining is retried on connection failures (max 5 attempts with 5 second
//! interval). A name already held by an active participant is rejected.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chittychat-client -- --name Alice
//! cargo run --bin chittychat-client -- -n Bob -s 127.0.0.1 -P 8080
//! ```

use chittychat_client::{ClientConfig, run_client};
use chittychat_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chittychat-client")]
#[command(about = "Chat client with Lamport-clocked messages", long_about = None)]
struct Args {
    /// Name shown to the other participants (must be unique in the room)
    #[arg(short = 'n', long, default_value = "Unknown")]
    name: String,

    /// IP address of the chat server
    #[arg(short = 's', long, default_value = "127.0.0.1")]
    server_ip: String,

    /// Port of the chat server
    #[arg(short = 'P', long, default_value = "8080")]
    server_port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        name: args.name,
        server_ip: args.server_ip,
        server_port: args.server_port,
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

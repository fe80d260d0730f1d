//! ChittyChat room server.
//!
//! Clients join a single shared room over WebSocket, broadcast messages and
//! leave over HTTP. Every event is merged into the server's Lamport clock.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chittychat-server
//! cargo run --bin chittychat-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use chittychat_server::{
    domain::LamportClock,
    infrastructure::{message_pusher::MailboxMessagePusher, registry::InMemoryParticipantRegistry},
    ui::Server,
    usecase::{BroadcastMessageUseCase, GetRoomStateUseCase, JoinRoomUseCase, LeaveRoomUseCase},
};
use chittychat_shared::{logger::setup_logger, time::SystemWallClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chittychat-server")]
#[command(about = "Chat room server with Lamport-clocked broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Clock and registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server
    let clock = Arc::new(LamportClock::new());
    let registry = Arc::new(InMemoryParticipantRegistry::new());
    tracing::info!("Room created, server clock at {}", clock.current());

    let message_pusher = Arc::new(MailboxMessagePusher::new());

    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        clock.clone(),
        registry.clone(),
        message_pusher.clone(),
        Arc::new(SystemWallClock),
    ));
    let broadcast_message_usecase = Arc::new(BroadcastMessageUseCase::new(
        clock.clone(),
        registry.clone(),
        message_pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        clock.clone(),
        registry.clone(),
        message_pusher,
    ));
    let get_room_state_usecase = Arc::new(GetRoomStateUseCase::new(clock, registry));

    let server = Server::new(
        join_room_usecase,
        broadcast_message_usecase,
        leave_room_usecase,
        get_room_state_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

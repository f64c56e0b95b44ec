//! Sketchpad game server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sketchpad-server
//! cargo run --bin sketchpad-server -- --host 0.0.0.0 --port 8004
//! cargo run --bin sketchpad-server -- --debug
//! ```

use std::sync::Arc;

use clap::Parser;
use sketchpad_server::{
    domain::GameConfig,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
};
use sketchpad_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "sketchpad-server")]
#[command(about = "Drawing-and-guessing party game server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8004")]
    port: u16,

    /// Length of a drawing round in seconds
    #[arg(long, default_value = "120")]
    round_seconds: u32,

    /// Players required before the host can start a game
    #[arg(long, default_value = "2")]
    min_players: usize,

    /// Allow a single player to start a game
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let mut config = if args.debug {
        GameConfig::debug()
    } else {
        GameConfig::default()
    };
    config.round_seconds = args.round_seconds;
    if !args.debug {
        config.min_players = args.min_players;
    }
    tracing::info!("Game config: {:?}", config);

    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let server = Server::new(repository, message_pusher, Arc::new(SystemClock), config);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

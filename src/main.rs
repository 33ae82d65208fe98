use std::net::{IpAddr, SocketAddr};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ticket_board::{Matchmaker, Server, ServerConfig, TicketBoard};

/// Which application the server hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Ticket board
    Board,
    /// One-to-one anonymous chat
    Matchmaking,
}

#[derive(Debug, Parser)]
#[command(name = "ticket-board", version, about = "Ephemeral real-time ticket board")]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Application to serve
    #[arg(long, value_enum, default_value_t = Mode::Board)]
    mode: Mode,

    /// Maximum concurrent connections (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_connections: usize,
}

#[tokio::main]
async fn main() -> ticket_board::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = ServerConfig::with_addr(SocketAddr::new(args.bind, args.port))
        .max_connections(args.max_connections);

    tracing::info!(mode = ?args.mode, addr = %config.bind_addr, "Starting server");

    match args.mode {
        Mode::Board => {
            let server = Server::new(config, TicketBoard::new());
            server.run_until(shutdown_signal()).await
        }
        Mode::Matchmaking => {
            let server = Server::new(config.service_name("matchmaking"), Matchmaker::new());
            server.run_until(shutdown_signal()).await
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

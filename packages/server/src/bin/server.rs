//! Venuecast realtime server.
//!
//! Clients connect over WebSocket with a session credential, join rooms, and
//! receive broadcast events addressed to those rooms.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin venuecast-server
//! cargo run --bin venuecast-server -- --host 0.0.0.0 --port 3000 --durable-rooms main-stage,hall-1
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use venuecast_server::{
    bootstrap::build_app_state,
    config::{
        DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SESSION_COOKIE, DEFAULT_SESSION_TTL, ServerConfig,
    },
    ui::Server,
};
use venuecast_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "venuecast-server")]
#[command(about = "Realtime room broadcast server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "VENUECAST_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Name of the cookie carrying the session token
    #[arg(long, env = "VENUECAST_SESSION_COOKIE", default_value = DEFAULT_SESSION_COOKIE)]
    session_cookie: String,

    /// Lifetime of issued sessions, in seconds
    #[arg(long, env = "VENUECAST_SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL.as_secs())]
    session_ttl_secs: u64,

    /// Rooms kept alive while empty (comma separated)
    #[arg(long, env = "VENUECAST_DURABLE_ROOMS", value_delimiter = ',')]
    durable_rooms: Vec<String>,

    /// Origin allowed by CORS; any origin when unset
    #[arg(long, env = "VENUECAST_ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,

    /// Mount POST /api/sessions for development
    #[arg(long, env = "VENUECAST_ISSUE_SESSIONS")]
    issue_sessions: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            session_cookie: args.session_cookie,
            session_ttl: Duration::from_secs(args.session_ttl_secs),
            durable_rooms: args.durable_rooms,
            allowed_origin: args.allowed_origin,
            issue_sessions: args.issue_sessions,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies: Hub → Repository → MessagePusher → SessionStore → UseCases
    let state = build_app_state(&config, Arc::new(SystemClock));

    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

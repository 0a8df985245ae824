//! Server execution logic.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::{
    handler::{
        broadcast_to_all, broadcast_to_room, get_connections, get_room_detail, get_rooms,
        health_check, issue_session, revoke_session, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Interval of the expired-session sweep.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Build the router for the given state.
///
/// Must be served with `into_make_service_with_connect_info::<SocketAddr>()`,
/// the WebSocket handler reads the peer address.
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .route("/api/rooms/{room_id}/events", post(broadcast_to_room))
        .route("/api/connections", get(get_connections))
        .route("/api/events", post(broadcast_to_all));

    if config.issue_sessions {
        tracing::warn!("Session endpoints enabled under /api/sessions");
        app = app
            .route("/api/sessions", post(issue_session))
            .route("/api/sessions/{token}", delete(revoke_session));
    }

    app.layer(cors_layer(config.allowed_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::DELETE]);
    match allowed_origin.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => base
            .allow_origin(origin)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Some(Err(e)) => {
            tracing::warn!("Invalid allowed origin, falling back to any origin: {}", e);
            base.allow_origin(Any).allow_headers(Any)
        }
        None => base.allow_origin(Any).allow_headers(Any),
    }
}

/// Venuecast realtime server
///
/// # Example
///
/// ```ignore
/// let state = build_app_state(&config, Arc::new(SystemClock));
/// Server::new(config, state).run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Run the server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state.clone(), &self.config);

        let bind_addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Venuecast realtime server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let purge_task = spawn_session_purge(self.state);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        purge_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn spawn_session_purge(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            state.manage_sessions_usecase.purge_expired().await;
        }
    })
}

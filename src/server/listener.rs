//! Server listener
//!
//! Serves the WebSocket endpoint and the health endpoint on one port,
//! enforces the connection limit and drives the handler's periodic tick
//! (the board's cleanup sweep).

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;

use crate::board::now_ms;
use crate::error::Result;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::handler::ConnectionHandler;
use crate::server::health;

/// State shared by every request
struct AppState<H: ConnectionHandler> {
    handler: Arc<Mutex<H>>,
    next_conn_id: Arc<AtomicU64>,
    connection_semaphore: Option<Arc<Semaphore>>,
    service_name: Arc<str>,
}

impl<H: ConnectionHandler> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            next_conn_id: Arc::clone(&self.next_conn_id),
            connection_semaphore: self.connection_semaphore.clone(),
            service_name: Arc::clone(&self.service_name),
        }
    }
}

/// WebSocket server around a single shared handler
pub struct Server<H: ConnectionHandler> {
    config: ServerConfig,
    state: AppState<H>,
    tick_interval: Option<Duration>,
}

impl<H: ConnectionHandler> Server<H> {
    /// Create a new server with the given configuration and handler
    pub fn new(config: ServerConfig, handler: H) -> Self {
        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        // Read while the handler is still exclusively ours
        let tick_interval = handler.tick_interval();

        let state = AppState {
            handler: Arc::new(Mutex::new(handler)),
            next_conn_id: Arc::new(AtomicU64::new(1)),
            connection_semaphore,
            service_name: Arc::from(config.service_name.as_str()),
        };

        Self {
            config,
            state,
            tick_interval,
        }
    }

    /// Get a reference to the shared handler
    pub fn handler(&self) -> &Arc<Mutex<H>> {
        &self.state.handler
    }

    /// Run the server
    ///
    /// This method blocks until the listener fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Server listening");

        let tick_handle = self.spawn_tick_task();
        let app = self.router();

        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            res = axum::serve(listener, app).into_future() => res,
        };

        // Stop the tick task on shutdown
        if let Some(handle) = tick_handle {
            handle.abort();
        }

        Ok(result?)
    }

    /// Build the request router
    ///
    /// Upgrade requests on any path open a WebSocket; everything else is
    /// answered by the health endpoint.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(handle_request::<H>)
            .with_state(self.state.clone())
    }

    /// Spawn the periodic tick task if the handler wants one
    fn spawn_tick_task(&self) -> Option<JoinHandle<()>> {
        let Some(interval) = self.tick_interval else {
            tracing::debug!("Handler has no tick interval");
            return None;
        };

        let handler = Arc::clone(&self.state.handler);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                handler.lock().await.on_tick(now_ms());
            }
        }))
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}

async fn handle_request<H: ConnectionHandler>(
    State(state): State<AppState<H>>,
    upgrade: Option<WebSocketUpgrade>,
) -> Response {
    let Some(upgrade) = upgrade else {
        return health::health_response(&state.service_name);
    };

    // Check connection limit
    let permit = match state.connection_semaphore {
        Some(ref sem) => match Arc::clone(sem).try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(_) => {
                tracing::warn!("Connection rejected: limit reached");
                return (StatusCode::SERVICE_UNAVAILABLE, "Too many connections").into_response();
            }
        },
        None => None,
    };

    let conn_id = state.next_conn_id.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(conn = conn_id, "New connection");

    let handler = Arc::clone(&state.handler);

    upgrade.on_upgrade(move |socket| async move {
        // Held until the connection ends
        let _permit = permit;

        if let Err(e) = Connection::new(conn_id, handler).run(socket).await {
            tracing::debug!(conn = conn_id, error = %e, "Connection error");
        }

        tracing::debug!(conn = conn_id, "Connection finished");
    })
}

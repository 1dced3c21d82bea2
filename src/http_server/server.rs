//! # HTTP Server
//!
//! Combines the slot, committee and observability routers behind one CORS
//! layer.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use super::committee_routes::committee_routes;
use super::config::HttpServerConfig;
use super::observability_routes::{health_routes, observability_routes};
use super::slot_routes::slot_routes;
use super::state::AppState;
use crate::observability::{log_event, log_event_with_fields, Event};

/// HTTP server for the committee API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn with_config(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
        Router::new()
            .merge(health_routes())
            .merge(slot_routes(state.clone()))
            .merge(committee_routes(state.clone()))
            .nest("/observability", observability_routes(state))
            .layer(config.cors_layer())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}", e)))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = addr.to_string();
        log_event_with_fields(Event::Serving, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // A failed handler install means no signal will ever arrive; keep serving.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

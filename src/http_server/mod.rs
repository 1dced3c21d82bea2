//! # Committee API HTTP Server
//!
//! Axum routers over the slot accounting layer and the committee catalog.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/committee-slots/*` - Slot create, read, update, delete
//! - `/committees/*`, `/senate-divisions` - Parent rows
//! - `/observability/*` - Health and counters

pub mod committee_routes;
pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod server;
pub mod slot_routes;
pub mod state;
mod validation;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
pub use state::AppState;

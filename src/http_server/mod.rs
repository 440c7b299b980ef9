//! # HTTP Server Module
//!
//! JSON API for the dashboard. It combines all endpoint routers into a
//! unified Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/data/*` - Records: listing, filtering, paging and authenticated edits
//! - `/stats/*` - Summary statistics and trend reports
//! - `/data-sources/*` - Raw per-source output
//! - `/auth/*` - Signup, login and account endpoints

pub mod auth_routes;
pub mod config;
pub mod data_routes;
pub mod errors;
pub mod health_routes;
pub mod server;
pub mod source_routes;
pub mod state;
pub mod stats_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use state::{open_store, AppState};

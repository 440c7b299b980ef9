//! agridash - Agricultural statistics dashboard backend
//!
//! Ingests records from pluggable sources, deduplicates them, keeps them in
//! a record store and serves aggregations over an HTTP JSON API.

pub mod aggregation;
pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod records;
pub mod sources;

// src/lib.rs

use std::sync::Arc;

pub mod blockchain;
pub mod config;
pub mod error;
pub mod mcp;
pub mod network;
pub mod tools;

/// Application state shared across all tool handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, loaded once at startup
    pub config: Arc<config::Config>,
    /// Resolved endpoints for the active network
    pub endpoints: Arc<network::Endpoints>,
}

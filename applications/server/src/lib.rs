//! Top 100 Server Library
//!
//! HTTP API for the Top 100 app: provider sign-in, track search, saving
//! the caller's playlist, the public playlist view, and votes.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::SessionService;
pub use state::AppState;

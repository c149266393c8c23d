//! Axum web adapter for Agora.
//!
//! Exposes the core services as a JSON API under `/api`, with a `/health`
//! check at the root and optional static asset serving for the frontend.
//! [`bootstrap`] is the composition root: it opens the database, builds the
//! third-party clients from the environment and assembles the `AppCore`.

#![deny(unsafe_code)]

pub mod auth;
pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export primary types
pub use auth::AuthUser;
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::{create_router, create_spa_router};
pub use state::AppState;

//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers that translate DTOs and delegate to `AppCore`.

pub mod accounts;
pub mod assistant;
pub mod bounties;
pub mod datasets;
pub mod events;
pub mod payouts;
pub mod projects;

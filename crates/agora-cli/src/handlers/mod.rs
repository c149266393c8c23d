//! Command handlers. Each delegates to the core or the axum adapter.

pub mod identify;
pub mod paths;
pub mod reset;
pub mod serve;

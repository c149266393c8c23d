//! Shared helpers for services.

pub mod validation;

//! `agora` command-line interface.
//!
//! Runs the HTTP server and a few maintenance commands. `main.rs` wires
//! logging and `.env` loading, then dispatches to [`handlers`].

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;

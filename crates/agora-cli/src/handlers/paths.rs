//! Paths command handler.
//!
//! Prints the data directory and database path every adapter resolves.

use anyhow::Result;

use agora_core::ResolvedPaths;

pub fn execute() -> Result<()> {
    let paths = ResolvedPaths::resolve()?;
    println!("{paths}");
    Ok(())
}

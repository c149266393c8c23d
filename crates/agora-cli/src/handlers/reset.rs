//! Reset-bounties command handler.
//!
//! Deletes every bounty and submission. User earnings are left untouched.

use std::io::{self, BufRead, Write};

use agora_core::AppCore;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, force: bool) -> Result<(), CliError> {
    if !force {
        let prompt = format!(
            "Delete ALL bounties and submissions in {}? Type 'yes' to continue: ",
            ctx.paths.database_path.display()
        );
        if !confirm(&prompt, &mut io::stdin().lock())? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let removed = reset(ctx.app()).await?;
    println!("Deleted {removed} bounties.");
    Ok(())
}

async fn reset(app: &AppCore) -> Result<u64, CliError> {
    Ok(app.bounties().reset().await?)
}

fn confirm(prompt: &str, input: &mut impl BufRead) -> Result<bool, CliError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

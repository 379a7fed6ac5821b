//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(global: &GlobalArgs, _args: WhoamiArgs) -> Result<()> {
    let credential = global
        .session_store()?
        .get()
        .await
        .context("No active session. Run 'runique login' first.")?;

    output::credential(&credential);
    Ok(())
}

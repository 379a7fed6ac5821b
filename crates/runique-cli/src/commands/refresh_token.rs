//! Refresh token command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(global: &GlobalArgs, _args: RefreshTokenArgs) -> Result<()> {
    let store = global.session_store()?;
    let current = store
        .get()
        .await
        .context("No active session. Run 'runique login' first.")?;

    let client = global.client(&store)?;
    let authenticator = client
        .authenticator()
        .context("Client has no authenticator")?;

    output::progress("Refreshing session...");

    // Refresh as if the current token had just been rejected.
    let Some(renewed) = authenticator.refresh(Some(current.access_token())).await else {
        bail!("Failed to refresh session. Log in again.");
    };

    output::success("Session refreshed successfully");
    output::credential(&renewed);

    Ok(())
}

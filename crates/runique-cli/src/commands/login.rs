//! Login command implementation.

use anyhow::{Result, bail};
use clap::Args;

use runique_core::{DataError, NetworkError};
use runique_http::AuthRepository;

use crate::cli::GlobalArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let store = global.session_store()?;
    let client = global.client(&store)?;
    let auth = AuthRepository::new(&client, store.clone());

    output::progress("Logging in...");

    match auth.login(args.email.trim(), &args.password).await {
        Ok(()) => {}
        Err(DataError::Network(NetworkError::Unauthorized)) => {
            bail!("Invalid email or password.")
        }
        Err(e) => bail!(e.user_message()),
    }

    output::success("Logged in successfully");
    if let Some(credential) = store.get().await {
        println!();
        output::credential(&credential);
    }

    Ok(())
}

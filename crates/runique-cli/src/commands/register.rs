//! Register command implementation.

use anyhow::{Result, bail};
use clap::Args;

use runique_core::validation::MIN_PASSWORD_LENGTH;
use runique_core::{DataError, NetworkError, UserDataValidator};
use runique_http::AuthRepository;

use crate::cli::GlobalArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Email address for the new account
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(global: &GlobalArgs, args: RegisterArgs) -> Result<()> {
    let validator: UserDataValidator = UserDataValidator::default();
    if !validator.is_valid_email(&args.email) {
        bail!("'{}' is not a valid email address", args.email.trim());
    }

    let password = validator.validate_password(&args.password);
    if !password.is_valid() {
        let mut missing = Vec::new();
        if !password.has_min_length {
            missing.push(format!("at least {MIN_PASSWORD_LENGTH} characters"));
        }
        if !password.has_upper_case {
            missing.push("an uppercase letter".to_string());
        }
        if !password.has_lower_case {
            missing.push("a lowercase letter".to_string());
        }
        if !password.has_digit {
            missing.push("a digit".to_string());
        }
        bail!("Password needs {}", missing.join(", "));
    }

    let store = global.session_store()?;
    let client = global.client(&store)?;
    let auth = AuthRepository::new(&client, store);

    output::progress("Registering...");

    match auth.register(args.email.trim(), &args.password).await {
        Ok(()) => {
            output::success("Account created. Log in to start a session.");
            Ok(())
        }
        Err(NetworkError::Conflict) => bail!("An account with this email already exists."),
        Err(e) => bail!(DataError::from(e).user_message()),
    }
}

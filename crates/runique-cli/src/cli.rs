//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use runique_core::BaseUrl;

use crate::commands::{login, logout, refresh_token, register, request, whoami};

/// Runique API client CLI.
#[derive(Parser, Debug)]
#[command(name = "runique")]
#[command(author, version = env!("RUNIQUE_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API base URL
    #[arg(long, env = "RUNIQUE_BASE_URL", global = true)]
    pub base_url: Option<BaseUrl>,

    /// API key sent with every request
    #[arg(long, env = "RUNIQUE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Directory holding the stored session (defaults to the platform data dir)
    #[arg(long, env = "RUNIQUE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account
    Register(register::RegisterArgs),

    /// Log in and store the session
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Exchange the refresh token for a new access token
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Send an authenticated GET request
    Get(request::RequestArgs),

    /// Send an authenticated DELETE request
    Delete(request::RequestArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "runique",
            "get",
            "/runs",
            "--base-url",
            "https://api.runique.dev",
            "-vv",
        ])
        .unwrap();

        assert_eq!(
            cli.global.base_url.map(|b| b.to_string()).as_deref(),
            Some("https://api.runique.dev")
        );
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.timeout_secs, 30);
        assert!(matches!(cli.command, Commands::Get(_)));
    }

    #[test]
    fn rejects_plain_http_base_url() {
        let err = Cli::try_parse_from([
            "runique",
            "--base-url",
            "http://api.runique.dev",
            "whoami",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("must use HTTPS"));
    }
}

//! Terminal output.
//!
//! Command results go to stdout; progress notes and errors go to stderr.

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;

use runique_core::Credential;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn progress(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print the session a credential represents. Token values are never shown.
pub fn credential(credential: &Credential) {
    field("User", credential.user_id());
    field("Access token", &expiry_line(credential, Utc::now()));
}

/// Describe the access token's expiry relative to `now`.
fn expiry_line(credential: &Credential, now: DateTime<Utc>) -> String {
    match credential.access_token_expires_at() {
        Some(expires_at) => {
            let when = expires_at.to_rfc3339_opts(SecondsFormat::Secs, true);
            if credential.is_access_token_expired(now) {
                format!("expired at {when}")
            } else {
                format!("valid until {when}")
            }
        }
        None => "expiry unknown".to_string(),
    }
}

/// Print a response body as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

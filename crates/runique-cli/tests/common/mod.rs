#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

pub const API_KEY: &str = "test-api-key";

/// Run the CLI binary with an isolated data directory.
///
/// Inherited `RUNIQUE_*` variables are removed so the caller controls all
/// configuration.
pub fn run_cli(args: &[&str], data_dir: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_runique"));
    cmd.args(args);
    cmd.env_remove("RUNIQUE_BASE_URL");
    cmd.env_remove("RUNIQUE_API_KEY");
    cmd.env("RUNIQUE_DATA_DIR", data_dir);
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI against `base_url` with the test API key.
pub fn run_cli_against(args: &[&str], data_dir: &Path, base_url: &str) -> Output {
    let mut full = vec!["--base-url", base_url, "--api-key", API_KEY];
    full.extend_from_slice(args);
    run_cli(&full, data_dir)
}

/// Run the CLI against `base_url` on a blocking thread, for use inside
/// async tests that host a mock server.
pub async fn run_cli_against_async(args: &[&str], data_dir: &Path, base_url: &str) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let data_dir = data_dir.to_path_buf();
    let base_url = base_url.to_string();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli_against(&args, &data_dir, &base_url)
    })
    .await
    .expect("CLI task panicked")
}

/// Assert the command succeeded and return its stdout.
pub fn expect_success(output: &Output) -> String {
    if !output.status.success() {
        panic!(
            "CLI command failed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Assert the command failed and return its stderr.
pub fn expect_failure(output: &Output) -> String {
    assert!(
        !output.status.success(),
        "CLI command unexpectedly succeeded\nstdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

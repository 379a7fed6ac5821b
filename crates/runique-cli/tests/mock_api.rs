//! CLI tests against a wiremock server.

mod common;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{API_KEY, expect_failure, expect_success, run_cli_against_async};

fn base_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("x-api-key", API_KEY))
        .and(body_json(json!({
            "email": "runner@runique.dev",
            "password": "Secret12345"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "accessTokenExpirationTimestamp": 4102444800000i64,
            "userId": "u1"
        })))
        .mount(server)
        .await;
}

const LOGIN: [&str; 5] = [
    "login",
    "--email",
    "runner@runique.dev",
    "--password",
    "Secret12345",
];

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_whoami_logout() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let data = TempDir::new().unwrap();
    let url = base_url(&server);

    let stdout = expect_success(&run_cli_against_async(&LOGIN, data.path(), &url).await);
    assert!(stdout.contains("Logged in successfully"));
    assert!(stdout.contains("u1"));

    let stdout = expect_success(&run_cli_against_async(&["whoami"], data.path(), &url).await);
    assert!(stdout.contains("u1"));
    assert!(stdout.contains("valid until 2100-01-01T00:00:00Z"));

    expect_success(&run_cli_against_async(&["logout"], data.path(), &url).await);

    let stderr = expect_failure(&run_cli_against_async(&["whoami"], data.path(), &url).await);
    assert!(stderr.contains("No active session"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_with_wrong_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let data = TempDir::new().unwrap();
    let stderr = expect_failure(
        &run_cli_against_async(&LOGIN, data.path(), &base_url(&server)).await,
    );
    assert!(stderr.contains("Invalid email or password"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_register_existing_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;

    let data = TempDir::new().unwrap();
    let stderr = expect_failure(
        &run_cli_against_async(
            &["register", "--email", "runner@runique.dev", "--password", "Secret12345"],
            data.path(),
            &base_url(&server),
        )
        .await,
    );
    assert!(stderr.contains("already exists"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_get_refreshes_expired_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/runs"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/accessToken"))
        .and(body_json(json!({"refreshToken": "r1", "userId": "u1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "a2", "expirationTimestamp": 4102444800000i64})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/runs"))
        .and(header("authorization", "Bearer a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 42}])))
        .expect(2)
        .mount(&server)
        .await;

    let data = TempDir::new().unwrap();
    let url = base_url(&server);

    expect_success(&run_cli_against_async(&LOGIN, data.path(), &url).await);

    let stdout = expect_success(&run_cli_against_async(&["get", "/runs"], data.path(), &url).await);
    assert!(stdout.contains("42"));

    // The renewed token was persisted, so no second refresh happens.
    let stdout = expect_success(&run_cli_against_async(&["get", "/runs"], data.path(), &url).await);
    assert!(stdout.contains("42"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_get_reports_expired_session_when_refresh_fails() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/accessToken"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let data = TempDir::new().unwrap();
    let url = base_url(&server);

    expect_success(&run_cli_against_async(&LOGIN, data.path(), &url).await);

    let stderr =
        expect_failure(&run_cli_against_async(&["get", "/runs"], data.path(), &url).await);
    assert!(stderr.contains("session has expired"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_with_no_content() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/runs/42"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let data = TempDir::new().unwrap();
    let url = base_url(&server);

    expect_success(&run_cli_against_async(&LOGIN, data.path(), &url).await);

    let stdout =
        expect_success(&run_cli_against_async(&["delete", "runs/42"], data.path(), &url).await);
    assert!(stdout.contains("Deleted"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_refresh_token_command() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/accessToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "a2",
            "expirationTimestamp": 4102444800000i64
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/runs"))
        .and(header("authorization", "Bearer a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let data = TempDir::new().unwrap();
    let url = base_url(&server);

    expect_success(&run_cli_against_async(&LOGIN, data.path(), &url).await);

    let stdout = expect_success(&run_cli_against_async(&["refresh-token"], data.path(), &url).await);
    assert!(stdout.contains("Session refreshed successfully"));

    expect_success(&run_cli_against_async(&["get", "/runs"], data.path(), &url).await);
}

//! Endpoint routes and request/response bodies.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Routes
// ============================================================================

pub const REGISTER_ROUTE: &str = "/register";

pub const LOGIN_ROUTE: &str = "/login";

/// Token exchange: refresh token in, access token out.
pub const ACCESS_TOKEN_ROUTE: &str = "/accessToken";

/// Header carrying the application API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for register and login.
#[derive(Serialize)]
pub struct EmailPasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for EmailPasswordRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailPasswordRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response from login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expiration_timestamp: i64,
    pub user_id: String,
}

/// Request body for the token exchange.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest<'a> {
    pub refresh_token: &'a str,
    pub user_id: &'a str,
}

/// Response from the token exchange.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expiration_timestamp: i64,
    /// Present only when the server rotates refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

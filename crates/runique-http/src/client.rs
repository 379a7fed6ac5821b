//! HTTP request execution.
//!
//! [`ApiClient`] runs exactly one request per call and never lets a
//! transport failure escape as anything other than a [`NetworkError`]. When a
//! [`TokenAuthenticator`] is attached, requests carry a bearer token and a
//! 401 triggers one refresh-and-retry cycle.
//!
//! Cancellation is not an error: dropping the future returned by any request
//! method abandons the request, and no value is produced for it.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use runique_core::{AccessToken, BaseUrl, NetworkError, SessionStore};

use crate::authenticator::TokenAuthenticator;
use crate::config::ClientConfig;
use crate::endpoints::API_KEY_HEADER;
use crate::error::{ClientError, classify_transport_error, serialization_error};

/// Query parameters as key/value pairs.
pub type Query<'a> = &'a [(&'a str, &'a str)];

/// The request pipeline.
///
/// Clone is cheap: the reqwest client and the authenticator are shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: BaseUrl,
    authenticator: Option<Arc<TokenAuthenticator>>,
}

impl ApiClient {
    /// Create a client that sends no bearer credentials.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ClientError::InvalidApiKey)?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url,
            authenticator: None,
        })
    }

    /// Create a client whose requests are authenticated from `store`.
    pub fn authenticated(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        let client = Self::new(config)?;
        let authenticator = Arc::new(TokenAuthenticator::new(client.clone(), store));
        Ok(client.with_authenticator(authenticator))
    }

    /// Returns a client sharing this one's connection pool that authenticates
    /// through `authenticator`.
    pub fn with_authenticator(&self, authenticator: Arc<TokenAuthenticator>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            authenticator: Some(authenticator),
        }
    }

    /// Returns a client sharing this one's connection pool that sends no
    /// bearer credentials.
    pub fn without_authenticator(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            authenticator: None,
        }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn authenticator(&self) -> Option<&Arc<TokenAuthenticator>> {
        self.authenticator.as_ref()
    }

    /// GET `route` and decode the response body as `R`.
    #[instrument(skip(self, query), fields(base = %self.base_url))]
    pub async fn get<R>(&self, route: &str, query: Query<'_>) -> Result<R, NetworkError>
    where
        R: DeserializeOwned,
    {
        trace!(?query, "query parameters");
        self.execute(Method::GET, route, query, None).await
    }

    /// POST `body` as JSON to `route` and decode the response body as `R`.
    #[instrument(skip(self, body), fields(base = %self.base_url))]
    pub async fn post<B, R>(&self, route: &str, body: &B) -> Result<R, NetworkError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(serialization_error)?;
        self.execute(Method::POST, route, &[], Some(&body)).await
    }

    /// DELETE `route` and decode the response body as `R`.
    #[instrument(skip(self, query), fields(base = %self.base_url))]
    pub async fn delete<R>(&self, route: &str, query: Query<'_>) -> Result<R, NetworkError>
    where
        R: DeserializeOwned,
    {
        trace!(?query, "query parameters");
        self.execute(Method::DELETE, route, query, None).await
    }

    /// Send a request, refreshing and retrying once on 401 when an
    /// authenticator is attached.
    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        route: &str,
        query: Query<'_>,
        body: Option<&[u8]>,
    ) -> Result<R, NetworkError> {
        let url = self.base_url.route(route);

        let Some(authenticator) = &self.authenticator else {
            return self.safe_call(&method, &url, query, body, None).await;
        };

        let sent = authenticator.supply().await;
        let sent_token = sent.as_ref().map(|c| c.access_token());

        match self.safe_call(&method, &url, query, body, sent_token).await {
            Err(NetworkError::Unauthorized) => {
                let Some(renewed) = authenticator.refresh(sent_token).await else {
                    debug!("No renewed credential; request stays unauthorized");
                    return Err(NetworkError::Unauthorized);
                };
                debug!("Retrying request with renewed access token");
                self.safe_call(&method, &url, query, body, Some(renewed.access_token()))
                    .await
            }
            outcome => outcome,
        }
    }

    /// Execute exactly one request and map its outcome.
    async fn safe_call<R: DeserializeOwned>(
        &self,
        method: &Method,
        url: &str,
        query: Query<'_>,
        body: Option<&[u8]>,
        token: Option<&AccessToken>,
    ) -> Result<R, NetworkError> {
        debug!(%method, %url, authenticated = token.is_some(), "Sending request");

        let mut request = self.http.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        trace!(status = %status, "Response received");

        if let Some(error) = NetworkError::from_status(status.as_u16()) {
            debug!(status = %status, ?error, "Request rejected");
            return Err(error);
        }

        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        decode_body(&bytes)
    }
}

/// Decode a success body. An empty body decodes as JSON `null`, so unit and
/// `Option` targets accept `204 No Content`.
fn decode_body<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, NetworkError> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(body).map_err(serialization_error)
}

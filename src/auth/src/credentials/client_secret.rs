// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Client-secret [Credentials] for daemon applications.
//!
//! The [client credentials grant] authenticates an application with only
//! its tenant, client id, and client secret. No end-user is involved: the
//! application exchanges the secret for a bearer token scoped to
//! `https://graph.microsoft.com/.default` (or an override) and attaches
//! that token to subsequent API calls.
//!
//! Refresh is explicit. [ClientSecretCredentials::exchange_token] performs
//! one exchange; the derived headers stay valid until the token's declared
//! lifetime elapses, after which header derivation fails and the caller
//! decides when to exchange again.
//!
//! Example usage:
//!
//! ```no_run
//! # use graphsync_auth::credentials::client_secret::Builder;
//! # use graphsync_auth::credentials::HeaderSource;
//! # tokio_test::block_on(async {
//! let credentials = Builder::new("my-tenant", "my-client", "my-secret").build()?;
//! credentials.exchange_token().await?;
//! let headers = credentials.binary_headers()?;
//! // attach `headers` to a drive-items request.
//! # Ok::<(), anyhow::Error>(())
//! # });
//! ```
//!
//! [client credentials grant]: https://learn.microsoft.com/entra/identity-platform/v2-oauth2-client-creds-grant-flow
//! [Credentials]: crate::credentials

use crate::credentials::HeaderSource;
use crate::errors::{AuthenticationError, ConfigurationError, NotAuthenticatedError};
use crate::headers_util;
use crate::token::Token;
use http::{HeaderMap, HeaderValue, StatusCode};
use reqwest::Client;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// A builder for [ClientSecretCredentials].
///
/// # Example
/// ```
/// # use graphsync_auth::credentials::client_secret::Builder;
/// let credentials = Builder::new("my-tenant", "my-client", "my-secret").build();
/// ```
pub struct Builder {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    token_uri: Option<String>,
    scope: Option<String>,
}

impl Builder {
    /// Creates a new builder from the application's registration values.
    ///
    /// `client_secret` is the secret *value*, not the secret id shown next
    /// to it in the portal.
    pub fn new<T, C, S>(tenant_id: T, client_id: C, client_secret: S) -> Self
    where
        T: Into<String>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_uri: None,
            scope: None,
        }
    }

    /// Sets the URI for the token endpoint used in the exchange.
    ///
    /// Defaults to
    /// `https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token`.
    /// Override it to exchange against a sovereign-cloud authority, or a
    /// local endpoint in tests.
    pub fn with_token_uri<S: Into<String>>(mut self, token_uri: S) -> Self {
        self.token_uri = Some(token_uri.into());
        self
    }

    /// Sets the scope requested for the access token.
    ///
    /// Defaults to `https://graph.microsoft.com/.default`, the resource-wide
    /// scope the client credentials grant expects.
    pub fn with_scope<S: Into<String>>(mut self, scope: S) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Returns a [ClientSecretCredentials] instance with the configured
    /// settings.
    ///
    /// Construction validates the configuration and prepares an HTTP client;
    /// it never contacts the network. The first exchange happens on an
    /// explicit [ClientSecretCredentials::exchange_token] call.
    ///
    /// # Errors
    ///
    /// Returns a [ConfigurationError] naming the first of `tenant_id`,
    /// `client_id`, or `client_secret` that is empty.
    pub fn build(self) -> Result<ClientSecretCredentials, ConfigurationError> {
        for (field, value) in [
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ] {
            if value.is_empty() {
                return Err(ConfigurationError::empty_field(field));
            }
        }
        let endpoint = self.token_uri.unwrap_or_else(|| {
            format!("{DEFAULT_AUTHORITY}/{}/oauth2/v2.0/token", self.tenant_id)
        });
        Ok(ClientSecretCredentials {
            client: Client::new(),
            tenant_id: self.tenant_id,
            client_id: self.client_id,
            client_secret: self.client_secret,
            scope: self.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            endpoint,
            state: Mutex::new(None),
        })
    }
}

// The stored token and the Authorization value derived from it. Both are
// replaced together, on successful exchange only.
struct TokenState {
    token: Token,
    authorization: HeaderValue,
}

/// Credentials backed by the OAuth2 client credentials grant.
///
/// The token is shared mutable state guarded by a single lock, so one
/// instance can serve concurrent callers. A failed exchange never disturbs
/// a previously stored token.
pub struct ClientSecretCredentials {
    client: Client,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    endpoint: String,
    state: Mutex<Option<TokenState>>,
}

impl std::fmt::Debug for ClientSecretCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[censored]")
            .field("scope", &self.scope)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ClientSecretCredentials {
    /// Exchanges the client secret for a fresh access token.
    ///
    /// Issues a form-encoded `POST` to the token endpoint. On success the
    /// stored token is replaced and a copy returned. On failure the stored
    /// token is left exactly as it was, so callers holding an unexpired
    /// token keep working through a failed refresh attempt.
    ///
    /// Each call may return a different token value; calling repeatedly is
    /// safe.
    pub async fn exchange_token(&self) -> Result<Token, AuthenticationError> {
        let request = ExchangeRequest {
            grant_type: GrantType::ClientCredentials,
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scope: self.scope.clone(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .form(&request)
            .send()
            .await
            .map_err(AuthenticationError::transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(AuthenticationError::transport)?;
        if !matches!(status, StatusCode::OK | StatusCode::NO_CONTENT) {
            return Err(AuthenticationError::rejected(status, body));
        }
        let response = serde_json::from_str::<ExchangeResponse>(&body)
            .map_err(|e| AuthenticationError::malformed(status, body.clone(), e))?;

        let now = Instant::now();
        let expires_at = match response.expires_in {
            Some(secs) => Some(now + Duration::from_secs(secs)),
            None => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    "token endpoint declared no lifetime, treating the token as non-expiring"
                );
                None
            }
        };
        let token = Token {
            token: response.access_token,
            token_type: response.token_type,
            obtained_at: now,
            expires_at,
        };
        let authorization = headers_util::authorization_value(&token)
            .map_err(|e| AuthenticationError::malformed(status, body, e))?;

        *self.lock_state() = Some(TokenState {
            token: token.clone(),
            authorization,
        });
        Ok(token)
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<TokenState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn headers(&self, content_type: &'static str) -> Result<HeaderMap, NotAuthenticatedError> {
        let state = self.lock_state();
        match state.as_ref() {
            None => Err(NotAuthenticatedError::missing()),
            Some(s) if s.token.is_expired() => Err(NotAuthenticatedError::expired()),
            Some(s) => Ok(headers_util::build_headers(&s.authorization, content_type)),
        }
    }
}

impl HeaderSource for ClientSecretCredentials {
    fn binary_headers(&self) -> Result<HeaderMap, NotAuthenticatedError> {
        self.headers(headers_util::OCTET_STREAM)
    }

    fn json_headers(&self) -> Result<HeaderMap, NotAuthenticatedError> {
        self.headers(headers_util::JSON)
    }
}

#[derive(Clone, PartialEq, serde::Deserialize, serde::Serialize)]
enum GrantType {
    #[serde(rename = "client_credentials")]
    ClientCredentials,
}

#[derive(Clone, PartialEq, serde::Deserialize, serde::Serialize)]
struct ExchangeRequest {
    grant_type: GrantType,
    client_id: String,
    client_secret: String,
    scope: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
struct ExchangeResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Form;
    use http::header::{AUTHORIZATION, CONTENT_TYPE};
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use test_case::test_case;
    use tokio::task::JoinHandle;

    type TestResult = anyhow::Result<()>;

    fn test_builder() -> Builder {
        Builder::new("test-tenant", "test-client-id", "test-client-secret")
    }

    // Starts a server running locally. Returns an (endpoint, handler) pair.
    // Each request takes the next (status, body) response; the last one
    // repeats.
    async fn start(
        responses: Vec<(StatusCode, serde_json::Value)>,
        call_count: Arc<StdMutex<usize>>,
    ) -> (String, JoinHandle<()>) {
        let responses = Arc::new(responses);
        let handler = move |req: Form<ExchangeRequest>| {
            let responses = responses.clone();
            let call_count = call_count.clone();
            async move { handle_token(&responses, &call_count, req) }
        };
        let app = axum::Router::new().route("/token", axum::routing::post(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async {
            axum::serve(listener, app).await.unwrap();
        });

        (
            format!("http://{}:{}/token", addr.ip(), addr.port()),
            server,
        )
    }

    // Verifies the fields of the form-encoded exchange request and returns
    // the next pre-canned HTTP response.
    fn handle_token(
        responses: &[(StatusCode, serde_json::Value)],
        call_count: &StdMutex<usize>,
        request: Form<ExchangeRequest>,
    ) -> (StatusCode, String) {
        let mut count = call_count.lock().unwrap();
        let index = std::cmp::min(*count, responses.len() - 1);
        *count += 1;
        assert!(request.grant_type == GrantType::ClientCredentials);
        assert_eq!(request.client_id, "test-client-id");
        assert_eq!(request.client_secret, "test-client-secret");
        assert_eq!(request.scope, DEFAULT_SCOPE);

        let (status, body) = &responses[index];
        let body = if *status == StatusCode::NO_CONTENT {
            String::new()
        } else {
            body.to_string()
        };
        (*status, body)
    }

    #[test_case("", "client", "secret", "tenant_id")]
    #[test_case("tenant", "", "secret", "client_id")]
    #[test_case("tenant", "client", "", "client_secret")]
    fn empty_field_fails_construction(tenant: &str, client: &str, secret: &str, field: &str) {
        let e = Builder::new(tenant, client, secret).build().unwrap_err();
        assert_eq!(e.field(), field);
    }

    #[test]
    fn default_endpoint_and_scope() -> TestResult {
        let credentials = test_builder().build()?;
        assert_eq!(
            credentials.endpoint,
            "https://login.microsoftonline.com/test-tenant/oauth2/v2.0/token"
        );
        assert_eq!(credentials.scope, DEFAULT_SCOPE);
        Ok(())
    }

    #[test]
    fn debug_censors_secret() -> TestResult {
        let credentials = test_builder().build()?;
        let got = format!("{credentials:?}");
        assert!(got.contains("test-tenant"), "{got}");
        assert!(got.contains("test-client-id"), "{got}");
        assert!(!got.contains("test-client-secret"), "{got}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn construction_is_lazy() -> TestResult {
        let call_count = Arc::new(StdMutex::new(0));
        let ok = serde_json::json!({"access_token": "abc", "expires_in": 3600});
        let (endpoint, _server) =
            start(vec![(StatusCode::OK, ok)], call_count.clone()).await;

        let _credentials = test_builder().with_token_uri(endpoint).build()?;
        assert_eq!(*call_count.lock().unwrap(), 0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn exchange_success_and_headers() -> TestResult {
        let ok = serde_json::json!({"access_token": "abc", "expires_in": 3600});
        let (endpoint, _server) =
            start(vec![(StatusCode::OK, ok)], Arc::new(StdMutex::new(0))).await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        let token = credentials.exchange_token().await?;
        assert_eq!(token.token, "abc");
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expires_at.is_some());

        let binary = credentials.binary_headers()?;
        assert_eq!(binary.len(), 2, "{binary:?}");
        assert_eq!(binary.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(binary.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(
            binary.get(CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );

        let json = credentials.json_headers()?;
        assert_eq!(json.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(json.get(CONTENT_TYPE).unwrap(), "application/json");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_lifetime_is_non_expiring() -> TestResult {
        let ok = serde_json::json!({"access_token": "abc"});
        let (endpoint, _server) =
            start(vec![(StatusCode::OK, ok)], Arc::new(StdMutex::new(0))).await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        let token = credentials.exchange_token().await?;
        assert_eq!(token.expires_at, None);
        assert!(credentials.json_headers().is_ok());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rejection_carries_status_and_body() -> TestResult {
        let (endpoint, _server) = start(
            vec![(StatusCode::UNAUTHORIZED, serde_json::json!("bad secret"))],
            Arc::new(StdMutex::new(0)),
        )
        .await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        let e = credentials.exchange_token().await.unwrap_err();
        assert_eq!(e.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(e.body().unwrap().contains("bad secret"), "{e}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_refresh_keeps_prior_token() -> TestResult {
        let ok = serde_json::json!({"access_token": "first", "expires_in": 3600});
        let (endpoint, _server) = start(
            vec![
                (StatusCode::OK, ok),
                (StatusCode::UNAUTHORIZED, serde_json::json!("revoked")),
            ],
            Arc::new(StdMutex::new(0)),
        )
        .await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        credentials.exchange_token().await?;
        let e = credentials.exchange_token().await.unwrap_err();
        assert_eq!(e.status(), Some(StatusCode::UNAUTHORIZED));

        // The first token survives the failed refresh.
        let headers = credentials.binary_headers()?;
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer first");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn repeated_exchange_exposes_latest_token() -> TestResult {
        let first = serde_json::json!({"access_token": "first", "expires_in": 3600});
        let second = serde_json::json!({"access_token": "second", "expires_in": 3600});
        let (endpoint, _server) = start(
            vec![(StatusCode::OK, first), (StatusCode::OK, second)],
            Arc::new(StdMutex::new(0)),
        )
        .await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        credentials.exchange_token().await?;
        credentials.exchange_token().await?;

        let headers = credentials.json_headers()?;
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer second");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn malformed_body_fails_exchange() -> TestResult {
        let (endpoint, _server) = start(
            vec![(StatusCode::OK, serde_json::json!("not a token response"))],
            Arc::new(StdMutex::new(0)),
        )
        .await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        let e = credentials.exchange_token().await.unwrap_err();
        assert_eq!(e.status(), Some(StatusCode::OK));
        assert!(e.body().unwrap().contains("not a token response"), "{e}");
        assert!(credentials.binary_headers().is_err());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_access_token_field_fails_exchange() -> TestResult {
        let (endpoint, _server) = start(
            vec![(StatusCode::OK, serde_json::json!({"expires_in": 3600}))],
            Arc::new(StdMutex::new(0)),
        )
        .await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        let e = credentials.exchange_token().await.unwrap_err();
        assert_eq!(e.status(), Some(StatusCode::OK));
        assert!(std::error::Error::source(&e).is_some());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn no_content_success_status_has_no_token() -> TestResult {
        // 204 counts as a success status, but an empty body cannot carry an
        // access token, so the exchange still fails as malformed.
        let (endpoint, _server) = start(
            vec![(StatusCode::NO_CONTENT, serde_json::json!(null))],
            Arc::new(StdMutex::new(0)),
        )
        .await;

        let credentials = test_builder().with_token_uri(endpoint).build()?;
        let e = credentials.exchange_token().await.unwrap_err();
        assert_eq!(e.status(), Some(StatusCode::NO_CONTENT));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn unreachable_endpoint_is_transport_error() -> TestResult {
        let credentials = test_builder()
            .with_token_uri("http://127.0.0.1:9/token")
            .build()?;
        let e = credentials.exchange_token().await.unwrap_err();
        assert_eq!(e.status(), None);
        assert!(std::error::Error::source(&e).is_some());
        Ok(())
    }

    #[test]
    fn headers_before_exchange_fail() -> TestResult {
        let credentials = test_builder().build()?;
        let e = credentials.binary_headers().unwrap_err();
        assert!(!e.is_expired());
        let e = credentials.json_headers().unwrap_err();
        assert!(!e.is_expired());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn headers_after_expiry_fail() -> TestResult {
        let credentials = test_builder().build()?;
        let token = Token {
            token: "abc".into(),
            token_type: "Bearer".into(),
            obtained_at: Instant::now(),
            expires_at: Some(Instant::now() + Duration::from_secs(3600)),
        };
        let authorization = headers_util::authorization_value(&token)?;
        *credentials.lock_state() = Some(TokenState {
            token,
            authorization,
        });

        assert!(credentials.json_headers().is_ok());
        tokio::time::advance(Duration::from_secs(3600)).await;
        let e = credentials.json_headers().unwrap_err();
        assert!(e.is_expired());
        let e = credentials.binary_headers().unwrap_err();
        assert!(e.is_expired());
        Ok(())
    }

    #[test]
    fn exchange_request_form_serde() -> TestResult {
        let request = ExchangeRequest {
            grant_type: GrantType::ClientCredentials,
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        };
        let encoded = serde_urlencoded_roundtrip(&request)?;
        assert!(
            encoded.contains("grant_type=client_credentials"),
            "{encoded}"
        );
        assert!(encoded.contains("client_id=test-client-id"), "{encoded}");
        Ok(())
    }

    fn serde_urlencoded_roundtrip(request: &ExchangeRequest) -> anyhow::Result<String> {
        let encoded = serde_urlencoded::to_string(request)?;
        let decoded: ExchangeRequest = serde_urlencoded::from_str(&encoded)?;
        assert!(decoded == *request);
        Ok(encoded)
    }

    #[test]
    fn exchange_response_serde() -> TestResult {
        let full = serde_json::json!({
            "access_token": "abc",
            "token_type": "Bearer",
            "expires_in": 3600,
        });
        let got = serde_json::from_value::<ExchangeResponse>(full)?;
        assert_eq!(got.access_token, "abc");
        assert_eq!(got.expires_in, Some(3600));

        let partial = serde_json::json!({"access_token": "abc"});
        let got = serde_json::from_value::<ExchangeResponse>(partial)?;
        assert_eq!(got.token_type, "Bearer");
        assert_eq!(got.expires_in, None);
        Ok(())
    }
}

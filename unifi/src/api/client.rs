use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};
use url::Url;

use super::error::ApiError;
use super::pool::{ConnectionPoolConfig, ConnectionPoolManager, ConnectionStats};

const CSRF_HEADER: &str = "X-CSRF-Token";
const UPDATED_CSRF_HEADER: &str = "X-Updated-CSRF-Token";
const NOT_FOUND_MESSAGE: &str = "api.err.NotFound";

/// UniFi controller API client.
///
/// Cheap to clone; clones share the HTTP connection pool and login session.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    retry_config: RetryConfig,
    pool_manager: ConnectionPoolManager,
    session: RwLock<Session>,
}

#[derive(Default)]
struct Session {
    platform: Option<Platform>,
    csrf_token: Option<String>,
}

/// Controller flavour, detected at login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// UniFi OS consoles (UDM, Cloud Key Gen2+) proxy the network app
    UnifiOs,
    /// Standalone network application
    Classic,
}

impl Platform {
    fn login_path(self) -> &'static str {
        match self {
            Platform::UnifiOs => "/api/auth/login",
            Platform::Classic => "/api/login",
        }
    }

    fn api_prefix(self) -> &'static str {
        match self {
            Platform::UnifiOs => "/proxy/network",
            Platform::Classic => "",
        }
    }
}

#[derive(Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Meta {
    pub(crate) fn into_result(self) -> Result<(), ApiError> {
        if self.rc == "ok" {
            return Ok(());
        }
        let message = self.msg.unwrap_or_default();
        if message == NOT_FOUND_MESSAGE {
            return Err(ApiError::NotFound);
        }
        Err(ApiError::Controller {
            rc: self.rc,
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    meta: Meta,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    meta: Meta,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        insecure: bool,
    ) -> Result<Self, ApiError> {
        Self::with_config(endpoint, username, password, insecure, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_config(
        endpoint: &str,
        username: &str,
        password: &str,
        insecure: bool,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let parsed = Url::parse(endpoint).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let pool_config = ConnectionPoolConfig {
            request_timeout: std::time::Duration::from_secs(retry_config.timeout_seconds),
            ..Default::default()
        };
        let pool_manager = ConnectionPoolManager::new(pool_config);
        let http_client = pool_manager.build_client(insecure)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: endpoint.trim_end_matches('/').to_string(),
                username: username.to_string(),
                password: password.to_string(),
                retry_config,
                pool_manager,
                session: RwLock::new(Session::default()),
            }),
        })
    }

    /// The detected platform, once logged in
    pub async fn platform(&self) -> Option<Platform> {
        self.inner.session.read().await.platform
    }

    pub async fn connection_stats(&self) -> ConnectionStats {
        self.inner.pool_manager.get_stats().await
    }

    pub fn devices<'a>(&'a self, site: &'a str) -> super::devices::DevicesApi<'a> {
        super::devices::DevicesApi::new(self, site)
    }

    pub fn users<'a>(&'a self, site: &'a str) -> super::users::UsersApi<'a> {
        super::users::UsersApi::new(self, site)
    }

    /// Probe the controller to find its platform. A UniFi OS console serves its
    /// landing page directly; a classic controller redirects.
    async fn detect_platform(&self) -> Result<Platform, ApiError> {
        let url = format!("{}/", self.inner.base_url);
        debug!(url = %url, "probing controller platform");

        let response = self.inner.http_client.get(&url).send().await?;
        let platform = if response.status() == StatusCode::OK {
            Platform::UnifiOs
        } else {
            Platform::Classic
        };

        debug!(?platform, status = %response.status(), "detected controller platform");
        Ok(platform)
    }

    /// Authenticate and store the session cookie
    pub async fn login(&self) -> Result<(), ApiError> {
        let known = self.inner.session.read().await.platform;
        let platform = match known {
            Some(platform) => platform,
            None => self.detect_platform().await?,
        };

        let url = format!("{}{}", self.inner.base_url, platform.login_path());
        debug!(url = %url, username = %self.inner.username, "logging in");

        let response = self
            .inner
            .http_client
            .post(&url)
            .json(&LoginRequest {
                username: &self.inner.username,
                password: &self.inner.password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "login rejected");
            return Err(ApiError::AuthError(format!(
                "login failed (HTTP {}): {}",
                status, body
            )));
        }

        let csrf_token = csrf_from_headers(response.headers(), CSRF_HEADER);
        {
            let mut session = self.inner.session.write().await;
            session.platform = Some(platform);
            if csrf_token.is_some() {
                session.csrf_token = csrf_token;
            }
        }
        self.inner.pool_manager.record_login().await;

        debug!("login successful");
        Ok(())
    }

    async fn site_url(&self, site: &str, path: &str) -> String {
        let prefix = self
            .inner
            .session
            .read()
            .await
            .platform
            .map(Platform::api_prefix)
            .unwrap_or("");
        format!("{}{}/api/s/{}/{}", self.inner.base_url, prefix, site, path)
    }

    /// GET a site-scoped endpoint and unwrap the envelope
    pub async fn get<T: DeserializeOwned>(&self, site: &str, path: &str) -> Result<Vec<T>, ApiError> {
        self.execute_with_retry(Method::GET, site, path, None).await
    }

    /// POST to a site-scoped endpoint and unwrap the envelope
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        site: &str,
        path: &str,
        body: &B,
    ) -> Result<Vec<T>, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::ParseError(format!("Failed to encode request: {}", e)))?;
        self.execute_with_retry(Method::POST, site, path, Some(&body))
            .await
    }

    /// PUT to a site-scoped endpoint and unwrap the envelope
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        site: &str,
        path: &str,
        body: &B,
    ) -> Result<Vec<T>, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::ParseError(format!("Failed to encode request: {}", e)))?;
        self.execute_with_retry(Method::PUT, site, path, Some(&body))
            .await
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut builder = self.inner.http_client.request(method.clone(), url);
        if let Some(token) = self.inner.session.read().await.csrf_token.as_deref() {
            builder = builder.header(CSRF_HEADER, token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.send().await
    }

    /// Execute request with retry logic.
    ///
    /// Rate limiting, 5xx and connection failures back off exponentially. A 401
    /// logs in again once and repeats the request.
    async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        method: Method,
        site: &str,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Vec<T>, ApiError> {
        let mut attempt = 0;
        let mut last_error = None;
        let mut relogged = false;

        while attempt <= self.inner.retry_config.max_retries {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    self.inner.retry_config.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    self.inner.retry_config.max_backoff_ms,
                );
                debug!(path, backoff_ms = backoff, attempt, "retrying request");
                tokio::time::sleep(tokio::time::Duration::from_millis(backoff)).await;
            }

            let url = self.site_url(site, path).await;
            debug!(method = %method, url = %url, "controller request");

            match self.send(&method, &url, body).await {
                Ok(response) => {
                    self.rotate_csrf(response.headers()).await;
                    let status = response.status();

                    if status.is_success() {
                        self.inner.pool_manager.record_request(true).await;
                        return parse_envelope(response).await;
                    }

                    self.inner.pool_manager.record_request(false).await;

                    if status == StatusCode::UNAUTHORIZED {
                        if relogged {
                            return Err(ApiError::AuthError(
                                "session rejected after re-login".to_string(),
                            ));
                        }
                        debug!(path, "session expired, logging in again");
                        relogged = true;
                        self.login().await?;
                        continue;
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(ApiError::RateLimited);
                    } else if status.is_server_error() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return handle_error_response(response).await;
                    }
                }
                Err(e) => {
                    self.inner.pool_manager.record_request(false).await;

                    if e.is_timeout() {
                        last_error =
                            Some(ApiError::Timeout(self.inner.retry_config.timeout_seconds));
                    } else if e.is_connect() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::RequestError(e));
                    }
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    async fn rotate_csrf(&self, headers: &HeaderMap) {
        if let Some(token) = csrf_from_headers(headers, UPDATED_CSRF_HEADER) {
            trace!("CSRF token rotated");
            self.inner.session.write().await.csrf_token = Some(token);
        }
    }
}

fn csrf_from_headers(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn parse_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Vec<T>, ApiError> {
    let text = response.text().await?;
    trace!(body = %text, "controller response");

    let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
        tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
        ApiError::ParseError(format!("Failed to parse response: {}", e))
    })?;
    envelope.meta.into_result()?;
    Ok(envelope.data)
}

/// Controllers report most failures as 4xx with an error envelope
async fn handle_error_response<T>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
        envelope.meta.into_result()?;
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    Err(ApiError::ApiError {
        status: status.as_u16(),
        message: text,
    })
}

//! HTTP client for network-based API calls
//!
//! Every request reads the token from the [`SessionContext`] at send time and
//! attaches it as `Authorization: Bearer <token>`. A 401 from any endpoint
//! invalidates the session; listeners are told through
//! [`SessionEvent::Expired`](crate::SessionEvent::Expired).

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::session::SessionContext;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
///
/// Paths are relative to the API base URL (e.g. `tickets/3`).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    /// DELETE; the response body (usually a confirmation string) is discarded
    async fn delete(&self, path: &str) -> ClientResult<()>;
    fn session(&self) -> &SessionContext;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder, method: &Method, path: &str) -> ClientResult<String> {
        tracing::debug!(%method, path, "API request");
        let response = req.send().await.map_err(|e| {
            tracing::warn!(%method, path, "Request failed: {}", e);
            ClientError::Http(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(text);
        }

        let err = ClientError::from_status(status, &text);
        if err.is_unauthorized() && !is_public(path) {
            self.session.invalidate();
        }
        tracing::warn!(%method, path, status = status.as_u16(), "API error: {}", err);
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        method: Method,
        path: &str,
    ) -> ClientResult<T> {
        let text = self.send(req, &method, path).await?;
        decode_body(&text)
    }
}

/// Credential endpoints answer 401 for a bad password, not an expired token.
const PUBLIC_PATHS: [&str; 2] = ["users/login", "users/register"];

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path.trim_start_matches('/'))
}

/// Decode a success body; empty bodies decode as JSON `null`.
fn decode_body<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    let body = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::GET, path);
        self.send_json(req, Method::GET, path).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::POST, path).json(body);
        self.send_json(req, Method::POST, path).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::PUT, path).json(body);
        self.send_json(req, Method::PUT, path).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::PATCH, path).json(body);
        self.send_json(req, Method::PATCH, path).await
    }

    async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::PATCH, path);
        self.send_json(req, Method::PATCH, path).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let req = self.request(Method::DELETE, path);
        self.send(req, &Method::DELETE, path).await.map(|_| ())
    }

    fn session(&self) -> &SessionContext {
        &self.session
    }
}

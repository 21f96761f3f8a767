//! HTTP transport seam.
//!
//! The client never talks to the network directly. A [`Connector`] acquires a
//! [`Transport`] session on `connect`, every request goes through
//! [`Transport::send`], and `close` hands the session back through
//! [`Transport::close`]. The default implementation wraps `reqwest`; tests and
//! embedders can plug in their own.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{Error, Result};

use super::config::TransportConfig;

/// A fully built HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// UTF-8 JSON text, `None` for an empty body
    pub body: Option<String>,
}

/// A buffered HTTP response.
///
/// Status is not checked on construction; call
/// [`error_for_status`](Self::error_for_status) where a 2xx is required.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A single header as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body decoded as (lossy) UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx status into [`Error::HttpStatus`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(Error::HttpStatus {
                status: self.status.as_u16(),
                body: self.text(),
            })
        }
    }
}

/// One open HTTP session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single request/response exchange.
    async fn send(&self, request: Request) -> Result<Response>;

    /// Release the session. Called at most once, from
    /// [`KeeneticClient::close`](crate::KeeneticClient::close).
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Factory for [`Transport`] sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The session type this connector produces.
    type Transport: Transport;

    /// Acquire a new session.
    async fn connect(&self) -> Result<Self::Transport>;
}

/// Connector backed by [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestConnector {
    config: TransportConfig,
}

impl ReqwestConnector {
    /// Create a connector using the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// The configuration new sessions are built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Connector for ReqwestConnector {
    type Transport = ReqwestTransport;

    async fn connect(&self) -> Result<ReqwestTransport> {
        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .cookie_store(true)
            .build()?;

        Ok(ReqwestTransport { http })
    }
}

/// A session holding a pooled [`reqwest::Client`].
///
/// Each session owns its own cookie jar; the device's session cookie from
/// the challenge `GET /auth` is replayed on every later request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Response::new(status, headers, body.to_vec()))
    }
}

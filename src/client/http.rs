//! The Keenetic session client.

use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::api::{InterfacesService, SmsService};
use crate::auth::{AuthData, Challenge, SessionState};
use crate::models::{InterfaceName, Interfaces, MessageId};
use crate::{Error, Result};

use super::config::TransportConfig;
use super::transport::{Connector, ReqwestConnector, Request, Response, Transport};

const AUTH_PATH: &str = "/auth";

/// Client for one Keenetic device.
///
/// The client owns its transport session and its authentication state. A
/// typical lifecycle is `connect` (which logs in), any number of remote
/// calls, then `close` (which logs out and releases the session).
/// [`scoped`](Self::scoped) wraps that lifecycle around a closure.
///
/// # Example
///
/// ```no_run
/// use keenetic_rs::KeeneticClient;
///
/// # async fn example() -> keenetic_rs::Result<()> {
/// let mut client = KeeneticClient::new("http://192.168.1.1", "admin", "password")?;
/// client.connect().await?;
///
/// let modems = client.get_mobile_interfaces().await?;
/// for name in modems.keys() {
///     let messages = client.get_sms_by_interface(name).await?;
///     println!("{}: {}", name, messages);
/// }
///
/// client.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct KeeneticClient<C: Connector = ReqwestConnector> {
    base_url: Url,
    username: String,
    password: SecretString,
    connector: C,
    transport: Option<C::Transport>,
    state: SessionState,
}

impl KeeneticClient<ReqwestConnector> {
    /// Create a client using the default reqwest transport.
    ///
    /// No network traffic happens until [`connect`](Self::connect).
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(base_url, username, password, TransportConfig::default())
    }

    /// Create a client using the reqwest transport with custom configuration.
    pub fn with_config(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        config: TransportConfig,
    ) -> Result<Self> {
        Self::with_connector(base_url, username, password, ReqwestConnector::new(config))
    }
}

impl<C: Connector> KeeneticClient<C> {
    /// Create a client on top of a custom transport connector.
    pub fn with_connector(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        connector: C,
    ) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            username: username.into(),
            password: SecretString::from(password.into()),
            connector,
            transport: None,
            state: SessionState::Disconnected,
        })
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current handshake state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` once a login handshake has completed and no logout has
    /// since succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Returns `true` while a transport session is held.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Acquire a transport session and log in with the stored credentials.
    ///
    /// A failed login leaves the transport open; call [`close`](Self::close)
    /// to release it.
    pub async fn connect(&mut self) -> Result<()> {
        tracing::debug!(base_url = %self.base_url, "Connecting");
        if self.transport.is_none() {
            self.transport = Some(self.connector.connect().await?);
        }

        let username = self.username.clone();
        let password = self.password.clone();
        self.login(&username, password.expose_secret()).await
    }

    /// Run the `x-ndw2-interactive` handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if `/auth` doesn't advertise a challenge
    /// - [`Error::UnsupportedAuthMethod`] for any other auth method
    /// - [`Error::HttpStatus`] if the digest POST or the confirmation GET
    ///   is rejected
    ///
    /// On any error the client is left unauthenticated.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        match self.handshake(username, password).await {
            Ok(()) => {
                self.state = SessionState::Authenticated;
                tracing::info!(base_url = %self.base_url, username, "Authenticated");
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Disconnected;
                tracing::debug!(error = %err, "Login failed");
                Err(err)
            }
        }
    }

    async fn handshake(&mut self, username: &str, password: &str) -> Result<()> {
        self.state = SessionState::ChallengeRequested;
        let challenge_response = self.get(AUTH_PATH, None).await?;
        let challenge = Challenge::from_headers(challenge_response.headers())?;

        self.state = SessionState::Authenticating;
        let auth_data = AuthData::new(username, password, &challenge.realm, &challenge.challenge);
        self.post(AUTH_PATH, &auth_data, None)
            .await?
            .error_for_status()?;

        self.get(AUTH_PATH, None).await?.error_for_status()?;
        Ok(())
    }

    /// End the session with `DELETE /auth`.
    ///
    /// On a non-2xx status the client keeps its authenticated state.
    pub async fn logout(&mut self) -> Result<()> {
        self.delete(AUTH_PATH, None).await?.error_for_status()?;
        self.state = SessionState::Disconnected;
        tracing::info!(base_url = %self.base_url, "Logged out");
        Ok(())
    }

    /// Log out if authenticated, then release the transport session.
    ///
    /// A failing logout is returned as-is and the transport is kept, so
    /// `close` can be retried. Closing an unconnected client is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.state.is_authenticated() {
            self.logout().await?;
        }

        if let Some(mut transport) = self.transport.take() {
            transport.close().await?;
            tracing::debug!(base_url = %self.base_url, "Transport released");
        }
        Ok(())
    }

    /// Connect, run `f`, then close on every exit path.
    ///
    /// If several steps fail, the first error wins: a connect error, then the
    /// body's error, then the close error. A close error hidden this way is
    /// logged.
    ///
    /// ```no_run
    /// # async fn example() -> keenetic_rs::Result<()> {
    /// let mut client = keenetic_rs::KeeneticClient::new("http://192.168.1.1", "admin", "pw")?;
    /// let interfaces = client
    ///     .scoped(|client| Box::pin(async move { client.get_interfaces().await }))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scoped<T, F>(&mut self, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c mut Self) -> BoxFuture<'c, Result<T>>,
    {
        let outcome = match self.connect().await {
            Ok(()) => f(&mut *self).await,
            Err(err) => Err(err),
        };

        let closed = self.close().await;
        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(error = %close_err, "Close failed after an earlier error");
                Err(err)
            }
        }
    }

    // Request helpers

    /// Resolve `path` against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// `Content-Type: application/json`, overridden by `extra_headers`.
    pub fn headers(&self, extra_headers: Option<&HeaderMap>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(extra) = extra_headers {
            headers.extend(extra.clone());
        }
        headers
    }

    /// Send a GET. The status is not checked.
    pub async fn get(&self, path: &str, extra_headers: Option<&HeaderMap>) -> Result<Response> {
        self.send(Method::GET, path, None, extra_headers).await
    }

    /// Send `data` as JSON in a POST. The status is not checked.
    ///
    /// Empty data (`null`, `false`, `0`, `""`, `[]`, `{}`) is sent as an
    /// empty body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<Response> {
        let value = serde_json::to_value(data)?;
        let body = if is_empty_json(&value) {
            None
        } else {
            Some(serde_json::to_string(&value)?)
        };
        self.send(Method::POST, path, body, extra_headers).await
    }

    /// Send a DELETE. The status is not checked.
    pub async fn delete(&self, path: &str, extra_headers: Option<&HeaderMap>) -> Result<Response> {
        self.send(Method::DELETE, path, None, extra_headers).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<Response> {
        let transport = self.transport.as_ref().ok_or(Error::NotConnected)?;
        let url = self.url(path)?;
        tracing::debug!(
            %method,
            %url,
            body_len = body.as_ref().map_or(0, String::len),
            "Sending request"
        );

        let request = Request {
            method,
            url,
            headers: self.headers(extra_headers),
            body,
        };
        transport.send(request).await
    }

    // Remote calls

    /// Get the interfaces service.
    pub fn interfaces(&self) -> InterfacesService<'_, C> {
        InterfacesService::new(self)
    }

    /// Get the SMS service.
    pub fn sms(&self) -> SmsService<'_, C> {
        SmsService::new(self)
    }

    /// `GET /rci/interface`.
    pub async fn rci_interface(&self) -> Result<Value> {
        self.interfaces().rci_interface().await
    }

    /// `show interface` through `POST /rci/`.
    pub async fn get_interfaces(&self) -> Result<Value> {
        self.interfaces().list().await
    }

    /// Interfaces advertising the `Mobile` trait.
    pub async fn get_mobile_interfaces(&self) -> Result<Interfaces> {
        self.interfaces().mobile().await
    }

    /// List SMS messages stored on a modem interface.
    pub async fn get_sms_by_interface(&self, interface: impl Into<InterfaceName>) -> Result<Value> {
        self.sms().list(interface).await
    }

    /// Mark SMS messages as read.
    pub async fn mark_sms_as_read<I>(
        &self,
        interface: impl Into<InterfaceName>,
        ids: I,
    ) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: Into<MessageId>,
    {
        self.sms().mark_as_read(interface, ids).await
    }

    /// Delete SMS messages.
    pub async fn delete_sms<I>(&self, interface: impl Into<InterfaceName>, ids: I) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: Into<MessageId>,
    {
        self.sms().delete(interface, ids).await
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

impl<C: Connector> std::fmt::Debug for KeeneticClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeeneticClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("state", &self.state)
            .field("connected", &self.transport.is_some())
            .finish()
    }
}

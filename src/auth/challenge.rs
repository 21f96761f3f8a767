//! Parsing of the challenge headers returned by `GET /auth`.

use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};

use crate::{Error, Result};

/// The only authentication method this client implements.
pub const SUPPORTED_AUTH_METHOD: &str = "x-ndw2-interactive";

/// Header carrying the digest realm.
pub const REALM_HEADER: &str = "X-NDM-Realm";

/// Header carrying the one-time server nonce.
pub const CHALLENGE_HEADER: &str = "X-NDM-Challenge";

/// Challenge parameters read from the first `/auth` response.
///
/// Only lives for the duration of one login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Method token from `WWW-Authenticate`
    pub auth_method: String,
    /// Opaque parameters following the method token
    pub auth_params: String,
    /// `X-NDM-Realm`, empty if the device omitted it
    pub realm: String,
    /// `X-NDM-Challenge`, empty if the device omitted it
    pub challenge: String,
}

impl Challenge {
    /// Extract and validate the challenge from response headers.
    ///
    /// A missing `X-NDM-Realm` or `X-NDM-Challenge` is not an error: the
    /// value becomes an empty string and the digest is computed over it.
    /// Other clients of this API may substitute a placeholder text such as
    /// `"None"` instead, so the resulting digest differs from theirs; either
    /// way a real device will reject it.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if `WWW-Authenticate` is missing or empty
    /// - [`Error::UnsupportedAuthMethod`] if the method isn't
    ///   [`SUPPORTED_AUTH_METHOD`]
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let auth_header = headers
            .get(WWW_AUTHENTICATE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::Protocol(
                    "No 'WWW-Authenticate' header in /auth response - not a recognized device"
                        .to_string(),
                )
            })?;

        let (auth_method, auth_params) = match auth_header.split_once(' ') {
            Some((method, params)) => (method.to_string(), params.to_string()),
            None => (auth_header, String::new()),
        };

        if auth_method != SUPPORTED_AUTH_METHOD {
            return Err(Error::UnsupportedAuthMethod(auth_method));
        }

        let realm = header_or_empty(headers, REALM_HEADER);
        let challenge = header_or_empty(headers, CHALLENGE_HEADER);
        if realm.is_empty() || challenge.is_empty() {
            tracing::warn!(
                realm_present = !realm.is_empty(),
                challenge_present = !challenge.is_empty(),
                "Challenge headers incomplete; computing digest over empty values"
            );
        }

        Ok(Self {
            auth_method,
            auth_params,
            realm,
            challenge,
        })
    }
}

fn header_or_empty(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

//! The `x-ndw2-interactive` credential digest.

use md5::Md5;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute the password digest expected by `POST /auth`.
///
/// `SHA256(challenge + hex(MD5("username:realm:password")))`, both stages
/// rendered as lowercase hex.
///
/// ```
/// let d = keenetic_rs::auth::digest("admin", "realm", "pass", "nonce");
/// assert_eq!(d, keenetic_rs::auth::digest("admin", "realm", "pass", "nonce"));
/// assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
pub fn digest(username: &str, realm: &str, password: &str, challenge: &str) -> String {
    let hash1 = hex::encode(Md5::digest(
        format!("{}:{}:{}", username, realm, password).as_bytes(),
    ));
    hex::encode(Sha256::digest(format!("{}{}", challenge, hash1).as_bytes()))
}

/// Body of `POST /auth`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthData {
    /// The username, sent verbatim
    pub login: String,
    /// The digest, never the plain password
    pub password: String,
}

impl AuthData {
    /// Derive the auth body for one login attempt.
    pub fn new(username: &str, password: &str, realm: &str, challenge: &str) -> Self {
        Self {
            login: username.to_string(),
            password: digest(username, realm, password, challenge),
        }
    }
}

impl std::fmt::Debug for AuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthData")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

//! Authentication for the Keenetic `/auth` endpoint.
//!
//! Keenetic devices use a challenge-response scheme advertised as
//! `WWW-Authenticate: x-ndw2-interactive ...`:
//!
//! 1. `GET /auth` answers with the method plus `X-NDM-Realm` and
//!    `X-NDM-Challenge` headers ([`Challenge`]).
//! 2. The client posts `{login, password}` where `password` is
//!    `SHA256(challenge + MD5("login:realm:password"))` ([`AuthData`]).
//! 3. A second `GET /auth` confirms the session.
//!
//! `DELETE /auth` ends the session. The session itself is tracked by
//! [`SessionState`]; the HTTP exchanges live on
//! [`KeeneticClient`](crate::KeeneticClient).
//!
//! ```
//! use keenetic_rs::auth::AuthData;
//!
//! let data = AuthData::new("admin", "secret", "Keenetic Giga", "ABCDEF");
//! assert_eq!(data.login, "admin");
//! assert_eq!(data.password.len(), 64);
//! ```

mod challenge;
mod digest;
mod state;

pub use challenge::{Challenge, SUPPORTED_AUTH_METHOD};
pub use digest::{digest, AuthData};
pub use state::SessionState;

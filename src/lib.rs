//! # keenetic-rs
//!
//! An async Rust client for the HTTP management API of Keenetic routers.
//!
//! The crate implements the device's `x-ndw2-interactive` challenge-response
//! login and a small typed surface over the `/rci/` command endpoint:
//!
//! - **Authentication**: MD5/SHA-256 digest handshake with explicit session
//!   state and logout on close
//! - **Interfaces**: full interface table and the mobile (modem) subset
//! - **SMS**: list, mark as read and delete messages on a modem interface
//! - **Pluggable transport**: `reqwest` by default, any [`Connector`] otherwise
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keenetic_rs::KeeneticClient;
//!
//! #[tokio::main]
//! async fn main() -> keenetic_rs::Result<()> {
//!     let mut client = KeeneticClient::new("http://192.168.1.1", "admin", "password")?;
//!
//!     let unread = client
//!         .scoped(|client| {
//!             Box::pin(async move {
//!                 let mut all = Vec::new();
//!                 for name in client.get_mobile_interfaces().await?.keys() {
//!                     all.push(client.get_sms_by_interface(name).await?);
//!                 }
//!                 Ok::<_, keenetic_rs::Error>(all)
//!             })
//!         })
//!         .await?;
//!
//!     println!("{} modem inbox(es)", unread.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::SessionState;
pub use client::{Connector, KeeneticClient, ReqwestConnector, Response, Transport, TransportConfig};
pub use error::{Error, Result};
pub use models::{InterfaceName, Interfaces, MessageId};

/// Prelude module for convenient imports.
///
/// ```rust
/// use keenetic_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{InterfacesService, SmsService};
    pub use crate::auth::{AuthData, Challenge, SessionState};
    pub use crate::client::{
        Connector, KeeneticClient, ReqwestConnector, Request, Response, Transport,
        TransportConfig,
    };
    pub use crate::error::{Error, Result};
    pub use crate::models::{InterfaceName, Interfaces, MessageId, RciRequest};
}

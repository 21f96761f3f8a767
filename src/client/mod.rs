//! HTTP client and transport layer for the Keenetic API.
//!
//! [`KeeneticClient`] is the entry point. It sends every request through a
//! [`Transport`] obtained from a [`Connector`]; [`ReqwestConnector`] is the
//! default.
//!
//! # Example
//!
//! ```no_run
//! use keenetic_rs::{KeeneticClient, TransportConfig};
//!
//! # async fn example() -> keenetic_rs::Result<()> {
//! let config = TransportConfig::default().with_accept_invalid_certs(true);
//! let mut client = KeeneticClient::with_config(
//!     "https://my.keenetic.net",
//!     "admin",
//!     "password",
//!     config,
//! )?;
//! client.connect().await?;
//! let interfaces = client.rci_interface().await?;
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod transport;

pub use config::TransportConfig;
pub use http::KeeneticClient;
pub use transport::{Connector, ReqwestConnector, ReqwestTransport, Request, Response, Transport};

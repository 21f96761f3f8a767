//! Data models for the Keenetic API.
//!
//! The device API has no published schema, so responses stay as
//! [`serde_json::Value`]. Only identifiers and request fragments are typed:
//!
//! - [`primitives`] - `InterfaceName` and `MessageId`
//! - [`rci`] - request fragments and the interface map shape

pub mod primitives;
pub mod rci;

pub use primitives::*;
pub use rci::*;

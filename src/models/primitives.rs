//! Identifier newtypes.
//!
//! These wrap the string identifiers the device uses so that an interface
//! name can't be passed where a message ID is expected.

use serde::Serialize;
use std::fmt;

/// A device interface name, e.g. `"UsbQmi0"` or `"Interface0"`.
///
/// # Example
///
/// ```
/// use keenetic_rs::InterfaceName;
///
/// let iface = InterfaceName::new("UsbQmi0");
/// assert_eq!(iface.as_str(), "UsbQmi0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterfaceName(String);

impl InterfaceName {
    /// Create a new interface name from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the interface name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterfaceName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Keys of an `Interfaces` map are `String`s.
impl From<&String> for InterfaceName {
    fn from(s: &String) -> Self {
        Self::new(s.as_str())
    }
}

/// An SMS message ID as reported by the modem interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Create a new message ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

//! Request bodies for the `/rci/` endpoint.
//!
//! The router accepts a JSON command tree that mirrors its CLI: a `show`
//! branch for read-only queries and an `sms` branch for the modem message
//! store.

use serde::Serialize;
use serde_json::{Map, Value};

use super::primitives::{InterfaceName, MessageId};

/// Interface name to interface data, as found under `show.interface`.
pub type Interfaces = Map<String, Value>;

/// The trait a modem interface advertises in its `"traits"` list.
pub const MOBILE_TRAIT: &str = "Mobile";

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmptyObject {}

/// A top-level RCI command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RciRequest {
    /// `{"show": {...}}`
    Show(ShowCommand),
    /// `{"sms": {...}}`
    Sms(SmsCommand),
}

impl RciRequest {
    /// `{"show":{"interface":{}}}`
    pub fn show_interfaces() -> Self {
        RciRequest::Show(ShowCommand {
            interface: EmptyObject {},
        })
    }

    /// `{"sms":{"interface":name,"list":{}}}`
    pub fn sms_list(interface: impl Into<InterfaceName>) -> Self {
        RciRequest::Sms(SmsCommand {
            interface: interface.into(),
            action: SmsAction::List(EmptyObject {}),
        })
    }

    /// `{"sms":{"interface":name,"read":[{"id":..},..]}}`
    pub fn sms_read<I>(interface: impl Into<InterfaceName>, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MessageId>,
    {
        RciRequest::Sms(SmsCommand {
            interface: interface.into(),
            action: SmsAction::Read(MessageRef::collect(ids)),
        })
    }

    /// `{"sms":{"interface":name,"delete":[{"id":..},..]}}`
    pub fn sms_delete<I>(interface: impl Into<InterfaceName>, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MessageId>,
    {
        RciRequest::Sms(SmsCommand {
            interface: interface.into(),
            action: SmsAction::Delete(MessageRef::collect(ids)),
        })
    }
}

/// The `show` branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowCommand {
    /// Requests the full interface table.
    pub interface: EmptyObject,
}

/// The `sms` branch, scoped to one modem interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsCommand {
    /// Modem interface owning the message store
    pub interface: InterfaceName,
    /// Operation on the store
    #[serde(flatten)]
    pub action: SmsAction,
}

/// What to do with the message store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsAction {
    /// List all messages
    List(EmptyObject),
    /// Mark the given messages as read
    Read(Vec<MessageRef>),
    /// Delete the given messages
    Delete(Vec<MessageRef>),
}

/// `{"id": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRef {
    /// The referenced message
    pub id: MessageId,
}

impl MessageRef {
    fn collect<I>(ids: I) -> Vec<Self>
    where
        I: IntoIterator,
        I::Item: Into<MessageId>,
    {
        ids.into_iter().map(|id| MessageRef { id: id.into() }).collect()
    }
}

/// Returns `true` if the interface data lists the `Mobile` trait.
///
/// A missing or non-array `traits` field counts as an empty list.
pub fn is_mobile_interface(data: &Value) -> bool {
    data.get("traits")
        .and_then(Value::as_array)
        .map(|traits| traits.iter().any(|t| t.as_str() == Some(MOBILE_TRAIT)))
        .unwrap_or(false)
}

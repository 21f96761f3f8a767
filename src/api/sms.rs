//! SMS service.
//!
//! These calls return the device's body regardless of HTTP status; the
//! device reports SMS failures inside the JSON, so callers inspect it.

use serde_json::Value;

use crate::client::{Connector, KeeneticClient};
use crate::models::{InterfaceName, MessageId, RciRequest};
use crate::Result;

use super::RCI_PATH;

/// Service for the modem SMS store.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: keenetic_rs::KeeneticClient) -> keenetic_rs::Result<()> {
/// let inbox = client.sms().list("UsbQmi0").await?;
/// client.sms().mark_as_read("UsbQmi0", ["1", "2"]).await?;
/// # Ok(())
/// # }
/// ```
pub struct SmsService<'a, C: Connector> {
    client: &'a KeeneticClient<C>,
}

impl<'a, C: Connector> SmsService<'a, C> {
    pub(crate) fn new(client: &'a KeeneticClient<C>) -> Self {
        Self { client }
    }

    /// List messages on `interface`.
    pub async fn list(&self, interface: impl Into<InterfaceName>) -> Result<Value> {
        self.send(RciRequest::sms_list(interface)).await
    }

    /// Mark messages as read.
    pub async fn mark_as_read<I>(&self, interface: impl Into<InterfaceName>, ids: I) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: Into<MessageId>,
    {
        self.send(RciRequest::sms_read(interface, ids)).await
    }

    /// Delete messages.
    pub async fn delete<I>(&self, interface: impl Into<InterfaceName>, ids: I) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: Into<MessageId>,
    {
        self.send(RciRequest::sms_delete(interface, ids)).await
    }

    async fn send(&self, request: RciRequest) -> Result<Value> {
        self.client.post(RCI_PATH, &request, None).await?.json()
    }
}

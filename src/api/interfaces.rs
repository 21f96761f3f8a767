//! Interfaces service.

use serde_json::Value;

use crate::client::{Connector, KeeneticClient};
use crate::models::{is_mobile_interface, Interfaces, RciRequest};
use crate::{Error, Result};

use super::RCI_PATH;

/// Service for reading the device interface table.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: keenetic_rs::KeeneticClient) -> keenetic_rs::Result<()> {
/// let modems = client.interfaces().mobile().await?;
/// for (name, data) in &modems {
///     println!("{}: {}", name, data["description"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct InterfacesService<'a, C: Connector> {
    client: &'a KeeneticClient<C>,
}

impl<'a, C: Connector> InterfacesService<'a, C> {
    pub(crate) fn new(client: &'a KeeneticClient<C>) -> Self {
        Self { client }
    }

    /// `GET /rci/interface`, failing on a non-2xx status.
    pub async fn rci_interface(&self) -> Result<Value> {
        self.client
            .get("/rci/interface", None)
            .await?
            .error_for_status()?
            .json()
    }

    /// `{"show":{"interface":{}}}`, failing on a non-2xx status.
    pub async fn list(&self) -> Result<Value> {
        self.client
            .post(RCI_PATH, &RciRequest::show_interfaces(), None)
            .await?
            .error_for_status()?
            .json()
    }

    /// The subset of [`list`](Self::list) whose `traits` contain `"Mobile"`.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedResponse`] if the body has no `show.interface`
    /// object.
    pub async fn mobile(&self) -> Result<Interfaces> {
        let mut body = self.list().await?;
        let table = body.pointer_mut("/show/interface").map(Value::take);

        match table {
            Some(Value::Object(interfaces)) => Ok(interfaces
                .into_iter()
                .filter(|(_, data)| is_mobile_interface(data))
                .collect()),
            _ => Err(Error::UnexpectedResponse(
                "missing show.interface object in RCI response".to_string(),
            )),
        }
    }
}

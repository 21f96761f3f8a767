//! Typed remote calls on top of the `/rci` endpoints.
//!
//! Each service borrows the client and maps one family of device commands.
//! None of them checks the session first; calling them unauthenticated just
//! returns whatever the device answers.

mod interfaces;
mod sms;

pub use interfaces::InterfacesService;
pub use sms::SmsService;

/// Path of the RCI command endpoint.
pub(crate) const RCI_PATH: &str = "/rci/";

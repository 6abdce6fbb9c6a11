//! Delegate protocols and the weak slots that forward to them.
//!
//! The controller never interprets a callback. The engine and user driver
//! are handed forwarders at construction; each forwarder looks up whatever
//! delegate is attached to its slot at the moment the event fires.

pub mod slot;
pub mod updater;
pub mod user_driver;

pub use slot::DelegateSlot;
pub use updater::{ForwardingUpdaterDelegate, UpdaterDelegate};
pub use user_driver::{ForwardingUserDriverDelegate, UserDriverDelegate};

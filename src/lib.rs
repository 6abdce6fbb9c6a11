//! Standard updater controller.
//!
//! Sits between an application's UI and an autonomous update engine:
//!
//! - owns one [`UpdateEngine`] and one [`UserDriver`] (by default the
//!   [`StandardUserDriver`]), created together and dropped together;
//! - starts the engine exactly once, either at construction or later via
//!   [`StandardUpdaterController::start_updater`];
//! - turns the "Check for Updates…" command into an engine request and
//!   answers menu validation from the engine's capability flag;
//! - forwards engine and user-driver callbacks to weakly held delegates.
//!
//! The engine itself (feeds, downloads, verification, installation) is an
//! external collaborator reached only through [`UpdateEngine`].

pub mod bundle;
pub mod config;
pub mod controller;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod item;
pub mod logging;
pub mod main_queue;
pub mod user_driver;

#[cfg(test)]
mod test_utils;

pub use bundle::HostBundle;
pub use config::UpdaterConfig;
pub use controller::{MenuAction, MenuItem, StandardUpdaterController, StartupState, UpdaterSetup};
pub use delegate::{DelegateSlot, UpdaterDelegate, UserDriverDelegate};
pub use engine::{EngineContext, UpdateEngine};
pub use error::{ActivationError, Result, UpdaterError};
pub use item::{CheckKind, UpdateItem};
pub use main_queue::{MainLoop, MainQueue, main_queue};
pub use user_driver::{PresentationEvent, StandardUserDriver, UpdaterAlert, UserDriver};

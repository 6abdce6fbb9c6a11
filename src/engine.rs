//! The update engine contract.
//!
//! Fetching feeds, comparing versions, downloading, verifying and installing
//! all live behind [`UpdateEngine`]. The controller only builds the engine,
//! activates it once, asks whether a check may start and requests explicit
//! checks.

use crate::bundle::HostBundle;
use crate::config::UpdaterConfig;
use crate::delegate::UpdaterDelegate;
use crate::error::ActivationError;
use crate::main_queue::MainQueue;
use crate::user_driver::UserDriver;
use std::sync::{Arc, Weak};

/// Everything an engine is bound to when the controller builds it.
pub struct EngineContext<'a> {
    /// Application being updated.
    pub host: &'a HostBundle,
    /// Updater settings.
    pub config: &'a UpdaterConfig,
    /// The controller's user driver. The controller owns it; upgrade at
    /// the point of use and skip presentation once it is gone.
    pub user_driver: Weak<dyn UserDriver>,
    /// Forwards to whatever updater delegate is attached at call time.
    pub delegate: Arc<dyn UpdaterDelegate>,
    /// Delegate callbacks must be posted here so they run on the UI thread.
    pub main_queue: MainQueue,
}

/// An autonomous update engine.
pub trait UpdateEngine: Send + Sync + 'static {
    /// Build an engine. Must not start any work; that is [`UpdateEngine::activate`].
    fn create(context: EngineContext<'_>) -> Self
    where
        Self: Sized;

    /// Start the engine (validate configuration, schedule background checks).
    ///
    /// Called at most once per controller.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivationError`] when the host is misconfigured.
    fn activate(&self) -> Result<(), ActivationError>;

    /// Whether an explicit check could start right now.
    ///
    /// Polled on every menu refresh; must be cheap and side-effect free.
    fn can_check_for_updates(&self) -> bool;

    /// Start a user-visible update check. Returns immediately; progress and
    /// results arrive through delegate callbacks.
    fn check_for_updates(&self);
}

//! Engine lifecycle delegate protocol.

use crate::delegate::slot::DelegateSlot;
use crate::item::{CheckKind, UpdateItem};
use std::sync::Arc;

/// Callbacks the update engine sends over the course of an update cycle.
///
/// Every method has a default so observers implement only what they need.
/// Engines invoke these on the main loop.
pub trait UpdaterDelegate: Send + Sync + 'static {
    /// Feed URL to use instead of the configured one.
    fn feed_url_override(&self) -> Option<String> {
        None
    }
    fn did_finish_loading_appcast(&self) {}
    fn did_find_valid_update(&self, _item: &UpdateItem) {}
    fn did_not_find_update(&self) {}
    fn will_download_update(&self, _item: &UpdateItem) {}
    fn did_download_update(&self, _item: &UpdateItem) {}
    fn failed_to_download_update(&self, _item: &UpdateItem, _error: &str) {}
    fn will_install_update(&self, _item: &UpdateItem) {}
    fn did_abort_with_error(&self, _error: &str) {}
    /// Last callback of every cycle, successful or not.
    fn did_finish_update_cycle(&self, _kind: CheckKind, _error: Option<&str>) {}
}

/// The delegate the engine is built with.
///
/// Each call resolves the controller's updater-delegate slot at the time
/// it is made. With nothing attached, notifications are dropped and queries
/// return the protocol default.
#[derive(Debug, Clone)]
pub struct ForwardingUpdaterDelegate {
    slot: Arc<DelegateSlot<dyn UpdaterDelegate>>,
}

impl ForwardingUpdaterDelegate {
    #[must_use]
    pub fn new(slot: Arc<DelegateSlot<dyn UpdaterDelegate>>) -> Self {
        Self { slot }
    }

    fn forward(&self, callback: impl FnOnce(&dyn UpdaterDelegate)) {
        if let Some(delegate) = self.slot.current() {
            callback(delegate.as_ref());
        }
    }
}

impl UpdaterDelegate for ForwardingUpdaterDelegate {
    fn feed_url_override(&self) -> Option<String> {
        self.slot.current().and_then(|d| d.feed_url_override())
    }

    fn did_finish_loading_appcast(&self) {
        self.forward(|d| d.did_finish_loading_appcast());
    }

    fn did_find_valid_update(&self, item: &UpdateItem) {
        self.forward(|d| d.did_find_valid_update(item));
    }

    fn did_not_find_update(&self) {
        self.forward(|d| d.did_not_find_update());
    }

    fn will_download_update(&self, item: &UpdateItem) {
        self.forward(|d| d.will_download_update(item));
    }

    fn did_download_update(&self, item: &UpdateItem) {
        self.forward(|d| d.did_download_update(item));
    }

    fn failed_to_download_update(&self, item: &UpdateItem, error: &str) {
        self.forward(|d| d.failed_to_download_update(item, error));
    }

    fn will_install_update(&self, item: &UpdateItem) {
        self.forward(|d| d.will_install_update(item));
    }

    fn did_abort_with_error(&self, error: &str) {
        self.forward(|d| d.did_abort_with_error(error));
    }

    fn did_finish_update_cycle(&self, kind: CheckKind, error: Option<&str>) {
        self.forward(|d| d.did_finish_update_cycle(kind, error));
    }
}

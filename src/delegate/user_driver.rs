//! User-driver lifecycle delegate protocol.

use crate::delegate::slot::DelegateSlot;
use crate::item::UpdateItem;
use std::sync::Arc;

/// Callbacks the standard user driver sends around what it presents.
pub trait UserDriverDelegate: Send + Sync + 'static {
    fn will_show_modal_alert(&self) {}
    fn did_show_modal_alert(&self) {}
    /// Whether the driver should present an update found by a scheduled
    /// check. Return `false` to present it yourself (e.g. as a badge).
    fn should_handle_showing_scheduled_update(
        &self,
        _item: &UpdateItem,
        _immediate_focus: bool,
    ) -> bool {
        true
    }
    fn will_handle_showing_update(&self, _handle_showing: bool, _item: &UpdateItem) {}
    fn will_finish_update_session(&self) {}
}

/// The delegate the user driver is built with; resolves the controller's
/// user-driver slot on every call.
#[derive(Debug, Clone)]
pub struct ForwardingUserDriverDelegate {
    slot: Arc<DelegateSlot<dyn UserDriverDelegate>>,
}

impl ForwardingUserDriverDelegate {
    #[must_use]
    pub fn new(slot: Arc<DelegateSlot<dyn UserDriverDelegate>>) -> Self {
        Self { slot }
    }

    fn forward(&self, callback: impl FnOnce(&dyn UserDriverDelegate)) {
        if let Some(delegate) = self.slot.current() {
            callback(delegate.as_ref());
        }
    }
}

impl UserDriverDelegate for ForwardingUserDriverDelegate {
    fn will_show_modal_alert(&self) {
        self.forward(|d| d.will_show_modal_alert());
    }

    fn did_show_modal_alert(&self) {
        self.forward(|d| d.did_show_modal_alert());
    }

    fn should_handle_showing_scheduled_update(
        &self,
        item: &UpdateItem,
        immediate_focus: bool,
    ) -> bool {
        self.slot
            .current()
            .is_none_or(|d| d.should_handle_showing_scheduled_update(item, immediate_focus))
    }

    fn will_handle_showing_update(&self, handle_showing: bool, item: &UpdateItem) {
        self.forward(|d| d.will_handle_showing_update(handle_showing, item));
    }

    fn will_finish_update_session(&self) {
        self.forward(|d| d.will_finish_update_session());
    }
}

//! User drivers: the side of the updater that talks to the end user.
//!
//! The standard driver does not draw anything itself. It publishes
//! [`PresentationEvent`]s that the host UI subscribes to and renders in its
//! own toolkit, and it notifies the user-driver delegate around each one.

use crate::bundle::HostBundle;
use crate::delegate::UserDriverDelegate;
use crate::item::{CheckKind, UpdateItem};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the presentation broadcast channel.
const PRESENTATION_CAPACITY: usize = 32;

/// A modal alert the driver asks the host to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdaterAlert {
    pub title: String,
    pub message: String,
}

impl UpdaterAlert {
    /// Alert shown when the updater could not start.
    #[must_use]
    pub fn startup_failure(host: &HostBundle) -> Self {
        let app = if host.name.trim().is_empty() {
            "this app"
        } else {
            host.name.as_str()
        };
        Self {
            title: "Unable to Check For Updates".to_owned(),
            message: format!(
                "The update checker failed to start correctly. You should contact the \
                 developer of {app} to report this issue and verify that you have the \
                 latest version."
            ),
        }
    }
}

/// What the standard driver asks the host UI to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PresentationEvent {
    Alert {
        /// Bundle identifier of the app being updated.
        host: String,
        title: String,
        message: String,
    },
    UpdateFound {
        item: UpdateItem,
        kind: CheckKind,
    },
    SessionFinished,
}

/// The user-interaction half of the updater.
///
/// The controller builds exactly one driver and hands it to the engine.
pub trait UserDriver: Send + Sync + 'static {
    /// Build a driver for `host` that reports to `delegate`.
    fn create(host: &HostBundle, delegate: Arc<dyn UserDriverDelegate>) -> Self
    where
        Self: Sized;

    /// Present an updater error as a modal alert.
    fn show_updater_error(&self, alert: &UpdaterAlert);

    /// Present an update the engine found.
    fn show_update_found(&self, item: &UpdateItem, kind: CheckKind);

    /// Tear down whatever the current update session is showing.
    fn dismiss_update_session(&self);
}

/// Default driver that publishes presentation events for the host UI.
pub struct StandardUserDriver {
    host: HostBundle,
    delegate: Arc<dyn UserDriverDelegate>,
    events: broadcast::Sender<PresentationEvent>,
}

impl StandardUserDriver {
    /// Receive presentation events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PresentationEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn host(&self) -> &HostBundle {
        &self.host
    }

    fn publish(&self, event: PresentationEvent) {
        // No subscriber yet is fine; the UI simply is not listening.
        if self.events.send(event).is_err() {
            tracing::debug!(host = %self.host.identifier, "no presentation subscriber");
        }
    }
}

impl UserDriver for StandardUserDriver {
    fn create(host: &HostBundle, delegate: Arc<dyn UserDriverDelegate>) -> Self {
        let (events, _) = broadcast::channel(PRESENTATION_CAPACITY);
        Self {
            host: host.clone(),
            delegate,
            events,
        }
    }

    fn show_updater_error(&self, alert: &UpdaterAlert) {
        tracing::info!(
            host = %self.host.identifier,
            title = %alert.title,
            "presenting updater alert"
        );
        self.delegate.will_show_modal_alert();
        self.publish(PresentationEvent::Alert {
            host: self.host.identifier.clone(),
            title: alert.title.clone(),
            message: alert.message.clone(),
        });
        self.delegate.did_show_modal_alert();
    }

    fn show_update_found(&self, item: &UpdateItem, kind: CheckKind) {
        let handle_showing = match kind {
            CheckKind::Explicit => true,
            CheckKind::Background => self
                .delegate
                .should_handle_showing_scheduled_update(item, true),
        };
        self.delegate.will_handle_showing_update(handle_showing, item);

        if handle_showing {
            self.publish(PresentationEvent::UpdateFound {
                item: item.clone(),
                kind,
            });
        } else {
            tracing::debug!(
                version = %item.version,
                "delegate took over presenting scheduled update"
            );
        }
    }

    fn dismiss_update_session(&self) {
        self.delegate.will_finish_update_session();
        self.publish(PresentationEvent::SessionFinished);
    }
}

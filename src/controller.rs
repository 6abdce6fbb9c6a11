//! The standard updater controller.
//!
//! Owns one [`UpdateEngine`] and one [`UserDriver`], starts the engine at
//! most once, turns the "Check for Updates…" menu command into an engine
//! request, and answers menu validation from the engine's capability flag.
//!
//! Two-phase construction is supported: build the controller while the host
//! is still setting up its windows and menus, then call
//! [`StandardUpdaterController::start_updater`] once it has finished
//! launching.

use crate::bundle::HostBundle;
use crate::config::UpdaterConfig;
use crate::delegate::{
    DelegateSlot, ForwardingUpdaterDelegate, ForwardingUserDriverDelegate, UpdaterDelegate,
    UserDriverDelegate,
};
use crate::engine::{EngineContext, UpdateEngine};
use crate::main_queue::MainQueue;
use crate::user_driver::{StandardUserDriver, UpdaterAlert, UserDriver};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Host-supplied inputs the controller binds its engine and driver to.
pub struct UpdaterSetup {
    pub host: HostBundle,
    pub config: UpdaterConfig,
    /// Queue onto the host's UI thread.
    pub main_queue: MainQueue,
}

/// Whether the engine has been activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupState {
    NotStarted,
    Started,
}

/// The action a UI control is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// The controller's [`StandardUpdaterController::check_for_updates`].
    CheckForUpdates,
    /// Any other command; the controller does not gate it.
    Other(String),
}

/// A menu item (or any other control) asking to be validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub title: String,
    pub action: MenuAction,
}

impl MenuItem {
    pub fn new(title: impl Into<String>, action: MenuAction) -> Self {
        Self {
            title: title.into(),
            action,
        }
    }

    /// The conventional "Check for Updates…" item.
    #[must_use]
    pub fn check_for_updates() -> Self {
        Self::new("Check for Updates…", MenuAction::CheckForUpdates)
    }
}

/// Coordinates an update engine and its standard user driver for a UI.
///
/// Not internally synchronized: call it from the UI thread. Delegates are
/// held weakly and may be replaced at any time.
pub struct StandardUpdaterController<E: UpdateEngine, U: UserDriver = StandardUserDriver> {
    host: HostBundle,
    updater: E,
    user_driver: Arc<U>,
    updater_delegate: Arc<DelegateSlot<dyn UpdaterDelegate>>,
    user_driver_delegate: Arc<DelegateSlot<dyn UserDriverDelegate>>,
    main_queue: MainQueue,
    startup_alert_delay: Duration,
    state: StartupState,
}

impl<E: UpdateEngine, U: UserDriver> StandardUpdaterController<E, U> {
    /// Build a controller and start the updater immediately.
    pub fn new(
        setup: UpdaterSetup,
        updater_delegate: Option<&Arc<dyn UpdaterDelegate>>,
        user_driver_delegate: Option<&Arc<dyn UserDriverDelegate>>,
    ) -> Self {
        Self::with_starting_updater(true, setup, updater_delegate, user_driver_delegate)
    }

    /// Build a controller, starting the updater only if `start_updater` is set.
    ///
    /// With `false`, call [`StandardUpdaterController::start_updater`] once
    /// the host has finished launching.
    pub fn with_starting_updater(
        start_updater: bool,
        setup: UpdaterSetup,
        updater_delegate: Option<&Arc<dyn UpdaterDelegate>>,
        user_driver_delegate: Option<&Arc<dyn UserDriverDelegate>>,
    ) -> Self {
        let UpdaterSetup {
            host,
            config,
            main_queue,
        } = setup;

        let updater_slot = Arc::new(DelegateSlot::new(updater_delegate));
        let user_driver_slot = Arc::new(DelegateSlot::new(user_driver_delegate));

        let user_driver = Arc::new(U::create(
            &host,
            Arc::new(ForwardingUserDriverDelegate::new(Arc::clone(&user_driver_slot))),
        ));
        let engine_driver: Arc<dyn UserDriver> = user_driver.clone();
        let updater = E::create(EngineContext {
            host: &host,
            config: &config,
            user_driver: Arc::downgrade(&engine_driver),
            delegate: Arc::new(ForwardingUpdaterDelegate::new(Arc::clone(&updater_slot))),
            main_queue: main_queue.clone(),
        });

        let mut controller = Self {
            startup_alert_delay: config.startup_alert_delay(),
            host,
            updater,
            user_driver,
            updater_delegate: updater_slot,
            user_driver_delegate: user_driver_slot,
            main_queue,
            state: StartupState::NotStarted,
        };

        if start_updater {
            controller.start_updater();
        }
        controller
    }

    /// Start the updater if it has not been started yet.
    ///
    /// Only the first call activates the engine. If activation fails the
    /// error is logged and, after the configured delay, the user driver is
    /// asked to show an alert telling the user to contact the developer. The
    /// failure is never returned to the caller.
    pub fn start_updater(&mut self) {
        if self.state == StartupState::Started {
            debug!(host = %self.host.identifier, "updater already started");
            return;
        }
        self.state = StartupState::Started;

        match self.updater.activate() {
            Ok(()) => info!(host = %self.host.identifier, "updater started"),
            Err(e) => {
                error!(
                    host = %self.host.identifier,
                    code = e.code(),
                    error = %e,
                    "fatal updater error"
                );
                self.schedule_startup_alert();
            }
        }
    }

    fn schedule_startup_alert(&self) {
        let driver = Arc::downgrade(&self.user_driver);
        let alert = UpdaterAlert::startup_failure(&self.host);

        let posted = self
            .main_queue
            .post_after(self.startup_alert_delay, move || match driver.upgrade() {
                Some(driver) => driver.show_updater_error(&alert),
                None => debug!("controller dropped before startup alert was shown"),
            });
        if !posted {
            debug!(host = %self.host.identifier, "main loop closed, startup alert not scheduled");
        }
    }

    /// Ask the engine for a user-visible update check.
    ///
    /// Dispatched unconditionally; gate the control with
    /// [`StandardUpdaterController::validate_menu_item`].
    pub fn check_for_updates(&self, sender: Option<&MenuItem>) {
        debug!(
            host = %self.host.identifier,
            sender = ?sender.map(|item| item.title.as_str()),
            "check for updates requested"
        );
        self.updater.check_for_updates();
    }

    /// Whether `item` should be enabled.
    ///
    /// Items bound to [`MenuAction::CheckForUpdates`] follow the engine's
    /// current capability; anything else is left enabled.
    #[must_use]
    pub fn validate_menu_item(&self, item: &MenuItem) -> bool {
        match item.action {
            MenuAction::CheckForUpdates => self.updater.can_check_for_updates(),
            MenuAction::Other(_) => true,
        }
    }

    #[must_use]
    pub fn startup_state(&self) -> StartupState {
        self.state
    }

    #[must_use]
    pub fn host(&self) -> &HostBundle {
        &self.host
    }

    /// The owned engine, for hosts that bind UI state to it directly.
    #[must_use]
    pub fn updater(&self) -> &E {
        &self.updater
    }

    /// The owned user driver.
    #[must_use]
    pub fn user_driver(&self) -> &U {
        &self.user_driver
    }

    /// The attached updater delegate, if it is still alive.
    #[must_use]
    pub fn updater_delegate(&self) -> Option<Arc<dyn UpdaterDelegate>> {
        self.updater_delegate.current()
    }

    /// Attach (or with `None`, detach) the updater delegate.
    ///
    /// Only events fired after this call see the new delegate.
    pub fn set_updater_delegate(&self, delegate: Option<&Arc<dyn UpdaterDelegate>>) {
        self.updater_delegate.set(delegate);
    }

    #[must_use]
    pub fn user_driver_delegate(&self) -> Option<Arc<dyn UserDriverDelegate>> {
        self.user_driver_delegate.current()
    }

    pub fn set_user_driver_delegate(&self, delegate: Option<&Arc<dyn UserDriverDelegate>>) {
        self.user_driver_delegate.set(delegate);
    }
}

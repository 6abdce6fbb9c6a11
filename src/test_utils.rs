//! Shared test fakes for the controller, delegate and driver tests.

use crate::bundle::HostBundle;
use crate::config::UpdaterConfig;
use crate::delegate::{UpdaterDelegate, UserDriverDelegate};
use crate::engine::{EngineContext, UpdateEngine};
use crate::error::ActivationError;
use crate::item::{CheckKind, UpdateItem};
use crate::main_queue::MainQueue;
use crate::user_driver::UserDriver;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// A config that passes [`UpdaterConfig::validate`].
pub fn valid_config() -> UpdaterConfig {
    UpdaterConfig {
        feed_url: Some("https://updates.example.com/appcast.xml".to_owned()),
        public_ed_key: Some("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=".to_owned()),
        ..UpdaterConfig::default()
    }
}

/// Counters shared between a [`FakeEngine`] and the test observing it.
#[derive(Debug, Clone, Default)]
pub struct EngineProbe {
    activations: Arc<AtomicUsize>,
    explicit_checks: Arc<AtomicUsize>,
    can_check: Arc<AtomicBool>,
    dropped: Arc<AtomicBool>,
}

impl EngineProbe {
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }

    pub fn explicit_checks(&self) -> usize {
        self.explicit_checks.load(Ordering::SeqCst)
    }

    pub fn set_can_check(&self, can_check: bool) {
        self.can_check.store(can_check, Ordering::SeqCst);
    }

    pub fn dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Engine that validates its config on activation and otherwise only
/// records what it is asked to do.
pub struct FakeEngine {
    host: HostBundle,
    config: UpdaterConfig,
    delegate: Arc<dyn UpdaterDelegate>,
    user_driver: Weak<dyn UserDriver>,
    main_queue: MainQueue,
    probe: EngineProbe,
}

impl FakeEngine {
    pub fn probe(&self) -> &EngineProbe {
        &self.probe
    }

    /// Post the tail of an update cycle to the main loop, the way a real
    /// engine reports back from its worker.
    pub fn finish_cycle(&self, found: Option<UpdateItem>, kind: CheckKind) {
        let delegate = Arc::clone(&self.delegate);
        let driver = Weak::clone(&self.user_driver);
        self.main_queue.post(move || {
            match &found {
                Some(item) => {
                    delegate.did_find_valid_update(item);
                    if let Some(driver) = driver.upgrade() {
                        driver.show_update_found(item, kind);
                    }
                }
                None => delegate.did_not_find_update(),
            }
            delegate.did_finish_update_cycle(kind, None);
        });
    }
}

impl UpdateEngine for FakeEngine {
    fn create(context: EngineContext<'_>) -> Self {
        Self {
            host: context.host.clone(),
            config: context.config.clone(),
            delegate: context.delegate,
            user_driver: context.user_driver,
            main_queue: context.main_queue,
            probe: EngineProbe::default(),
        }
    }

    fn activate(&self) -> Result<(), ActivationError> {
        self.probe.activations.fetch_add(1, Ordering::SeqCst);
        let feed_override = self.delegate.feed_url_override();
        self.config
            .validate(&self.host, feed_override.as_deref())?;
        self.probe.set_can_check(true);
        Ok(())
    }

    fn can_check_for_updates(&self) -> bool {
        self.probe.can_check.load(Ordering::SeqCst)
    }

    fn check_for_updates(&self) {
        self.probe.explicit_checks.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.probe.dropped.store(true, Ordering::SeqCst);
    }
}

/// Delegate for both protocols that records the callbacks it receives.
///
/// Clones share one log, so a test can hand an `Arc` of a clone to the
/// controller and still read the log after that `Arc` is dropped.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelegate {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingDelegate {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn push(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl UpdaterDelegate for RecordingDelegate {
    fn did_find_valid_update(&self, item: &UpdateItem) {
        self.push(format!("did_find_valid_update {}", item.version));
    }

    fn did_not_find_update(&self) {
        self.push("did_not_find_update".to_owned());
    }

    fn did_finish_update_cycle(&self, kind: CheckKind, _error: Option<&str>) {
        self.push(format!("did_finish_update_cycle {kind}"));
    }
}

impl UserDriverDelegate for RecordingDelegate {
    fn will_show_modal_alert(&self) {
        self.push("will_show_modal_alert".to_owned());
    }

    fn did_show_modal_alert(&self) {
        self.push("did_show_modal_alert".to_owned());
    }

    fn will_handle_showing_update(&self, handle_showing: bool, _item: &UpdateItem) {
        self.push(format!("will_handle_showing_update {handle_showing}"));
    }
}

/// In-memory log sink for a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

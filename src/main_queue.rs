//! Main-thread job queue.
//!
//! UI toolkits run their widgets on a single event-loop thread. The
//! controller and engines never call UI-facing code directly from a timer or
//! a worker; they post a job to a [`MainQueue`] and the host drains the paired
//! [`MainLoop`] from its UI thread.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// A unit of work executed on the main loop.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A job in flight, with the earliest instant it may run.
struct Queued {
    due: Option<Instant>,
    job: Job,
}

/// Create a connected queue/loop pair.
#[must_use]
pub fn main_queue() -> (MainQueue, MainLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MainQueue { tx },
        MainLoop {
            rx,
            delayed: Vec::new(),
            timer: None,
        },
    )
}

/// Cloneable handle for posting jobs to the main loop from any thread.
#[derive(Clone)]
pub struct MainQueue {
    tx: mpsc::UnboundedSender<Queued>,
}

impl MainQueue {
    /// Queue `job` to run on the next main-loop turn.
    ///
    /// Returns `false` when the main loop has been dropped; the job is
    /// discarded.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.send(None, Box::new(job))
    }

    /// Queue `job` to run on the first main-loop turn after `delay`.
    ///
    /// The deadline is kept by the [`MainLoop`], so no timer task or thread
    /// is left behind and the job survives whatever runtime it was posted
    /// from. Returns `false` when the main loop has been dropped.
    pub fn post_after<F>(&self, delay: Duration, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match Instant::now().checked_add(delay) {
            Some(due) => self.send(Some(due), Box::new(job)),
            None => {
                tracing::warn!(?delay, "delay out of range, delayed job discarded");
                false
            }
        }
    }

    /// Returns `true` once the paired [`MainLoop`] has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, due: Option<Instant>, job: Job) -> bool {
        self.tx.send(Queued { due, job }).is_ok()
    }
}

struct Delayed {
    due: Instant,
    job: Job,
}

/// Receiving end of the main queue, driven by the host's UI thread.
pub struct MainLoop {
    rx: mpsc::UnboundedReceiver<Queued>,
    /// Jobs waiting for their deadline, earliest first.
    delayed: Vec<Delayed>,
    /// Timer used by [`MainLoop::run_next_blocking`], built on first need.
    timer: Option<tokio::runtime::Runtime>,
}

impl MainLoop {
    /// Run jobs until every [`MainQueue`] handle has been dropped and no
    /// delayed job is left.
    pub async fn run(mut self) {
        while self.run_next().await {}
    }

    /// Wait for the next job and run it.
    ///
    /// Returns `false` when every [`MainQueue`] handle has been dropped and
    /// no delayed job is left.
    pub async fn run_next(&mut self) -> bool {
        loop {
            if let Some(job) = self.take_due() {
                job();
                return true;
            }

            let next_due = self.next_due();
            let received = match next_due {
                Some(due) => tokio::select! {
                    queued = self.rx.recv() => queued,
                    () = tokio::time::sleep_until(due) => continue,
                },
                None => self.rx.recv().await,
            };

            match received {
                Some(queued) => {
                    if let Some(job) = self.admit(queued) {
                        job();
                        return true;
                    }
                }
                None => match next_due {
                    Some(due) => tokio::time::sleep_until(due).await,
                    None => return false,
                },
            }
        }
    }

    /// Blocking variant of [`MainLoop::run_next`] for hosts without a tokio
    /// runtime on their UI thread. Must not be called from async code.
    pub fn run_next_blocking(&mut self) -> bool {
        loop {
            if let Some(job) = self.take_due() {
                job();
                return true;
            }
            if !self.delayed.is_empty() {
                return self.run_next_on_timer();
            }

            match self.rx.blocking_recv() {
                Some(queued) => {
                    if let Some(job) = self.admit(queued) {
                        job();
                        return true;
                    }
                }
                None => return false,
            }
        }
    }

    /// Run every job that is already queued or due, without waiting.
    ///
    /// Returns how many jobs ran. Hosts with their own event loop call this
    /// once per turn.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        loop {
            let job = match self.rx.try_recv() {
                Ok(queued) => match self.admit(queued) {
                    Some(job) => job,
                    None => continue,
                },
                Err(_) => match self.take_due() {
                    Some(job) => job,
                    None => break,
                },
            };
            job();
            ran += 1;
        }
        ran
    }

    /// Hand back a job that may run now, or park it until its deadline.
    fn admit(&mut self, queued: Queued) -> Option<Job> {
        match queued.due {
            Some(due) if due > Instant::now() => {
                let at = self.delayed.partition_point(|d| d.due <= due);
                self.delayed.insert(
                    at,
                    Delayed {
                        due,
                        job: queued.job,
                    },
                );
                None
            }
            _ => Some(queued.job),
        }
    }

    fn take_due(&mut self) -> Option<Job> {
        let due = self.next_due()?;
        (due <= Instant::now()).then(|| self.delayed.remove(0).job)
    }

    fn next_due(&self) -> Option<Instant> {
        self.delayed.first().map(|d| d.due)
    }

    fn run_next_on_timer(&mut self) -> bool {
        let timer = match self.timer.take() {
            Some(timer) => timer,
            None => match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(timer) => timer,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "main loop timer unavailable, sleeping to next deadline"
                    );
                    if let Some(due) = self.next_due() {
                        std::thread::sleep(due.saturating_duration_since(Instant::now()));
                    }
                    return self.run_next_blocking();
                }
            },
        };
        let ran = timer.block_on(self.run_next());
        self.timer = Some(timer);
        ran
    }
}

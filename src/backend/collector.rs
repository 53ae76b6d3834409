use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::backend::aggregate::{aggregate, AggregateOptions};
use crate::backend::{ProcessSampler, ProcessSnapshotSource};
use crate::error::{MonitorError, Result};
use crate::model::Snapshot;

pub type RefreshOutcome = Result<Arc<Snapshot>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Busy,
}

/// Runs sample+aggregate cycles on a worker thread, at most one at a time.
///
/// The controller lives on the caller's thread and is the only thing that
/// reads or writes the busy flag. Finished cycles come back over a channel
/// and are handed to `on_snapshot_ready` from `poll`/`wait`, so the
/// callback always runs on the thread that owns the controller.
pub struct RefreshController<S> {
    sampler: Arc<ProcessSampler<S>>,
    options: AggregateOptions,
    state: RefreshState,
    tx: flume::Sender<RefreshOutcome>,
    rx: flume::Receiver<RefreshOutcome>,
    latest: Option<Arc<Snapshot>>,
    on_snapshot_ready: Box<dyn FnMut(RefreshOutcome)>,
}

impl<S: ProcessSnapshotSource + 'static> RefreshController<S> {
    pub fn new<F>(sampler: ProcessSampler<S>, options: AggregateOptions, on_snapshot_ready: F) -> Self
    where
        F: FnMut(RefreshOutcome) + 'static,
    {
        let (tx, rx) = flume::bounded(1);
        Self {
            sampler: Arc::new(sampler),
            options,
            state: RefreshState::Idle,
            tx,
            rx,
            latest: None,
            on_snapshot_ready: Box::new(on_snapshot_ready),
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == RefreshState::Busy
    }

    /// Last snapshot from a successful cycle. Failed cycles leave it alone.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.clone()
    }

    /// Applies from the next cycle on; an in-flight cycle keeps its options.
    pub fn set_options(&mut self, options: AggregateOptions) {
        self.options = options;
    }

    /// Start a cycle if idle. Returns `Ok(false)` when one is already running.
    pub fn request_refresh(&mut self) -> Result<bool> {
        if self.state == RefreshState::Busy {
            log::debug!("Refresh already in flight, ignoring request");
            return Ok(false);
        }

        let sampler = Arc::clone(&self.sampler);
        let options = self.options.clone();
        let reporter = CycleReporter::new(self.tx.clone());

        thread::Builder::new()
            .name("refresh".into())
            .spawn(move || {
                let outcome = sampler
                    .sample()
                    .and_then(|records| aggregate(records, &options))
                    .map(Arc::new);
                reporter.report(outcome);
            })
            .map_err(MonitorError::WorkerSpawn)?;

        self.state = RefreshState::Busy;
        Ok(true)
    }

    /// Deliver any finished cycle without blocking. Returns how many were delivered.
    pub fn poll(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            self.deliver(outcome);
            delivered += 1;
        }
        delivered
    }

    /// Block up to `timeout` for the in-flight cycle. Returns true if one was delivered.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        if self.state == RefreshState::Idle {
            return false;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.deliver(outcome);
                true
            }
            Err(_) => false,
        }
    }

    fn deliver(&mut self, outcome: RefreshOutcome) {
        match &outcome {
            Ok(snapshot) => {
                log::debug!("Refresh produced {} rows", snapshot.len());
                self.latest = Some(Arc::clone(snapshot));
            }
            Err(e) => log::warn!("Refresh failed: {}", e),
        }
        (self.on_snapshot_ready)(outcome);
        self.state = RefreshState::Idle;
    }
}

/// Guarantees a worker reports exactly once, even if it panics.
struct CycleReporter {
    tx: Option<flume::Sender<RefreshOutcome>>,
}

impl CycleReporter {
    fn new(tx: flume::Sender<RefreshOutcome>) -> Self {
        Self { tx: Some(tx) }
    }

    fn report(mut self, outcome: RefreshOutcome) {
        if let Some(tx) = self.tx.take() {
            send_outcome(&tx, outcome);
        }
    }
}

impl Drop for CycleReporter {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            send_outcome(&tx, Err(MonitorError::WorkerLost));
        }
    }
}

fn send_outcome(tx: &flume::Sender<RefreshOutcome>, outcome: RefreshOutcome) {
    if tx.send(outcome).is_err() {
        log::info!("Refresh channel closed, dropping result");
    }
}

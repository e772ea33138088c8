//! Background worker that runs one search at a time off the caller's thread.

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use tracing::{info, warn};

use vanitas_chains::{GenerationError, KeyGenerator};

use crate::error::VanityError;
use crate::search::{
    profile_of, NotFoundReason, SearchController, SearchFailure, SearchOptions, SearchOutcome,
    SearchResult,
};
use crate::stats::CancelToken;

/// Terminal message from a worker thread
#[derive(Debug)]
pub enum WorkerMessage {
    Found(SearchResult),
    NotFound(NotFoundReason),
    GenerationFailed(GenerationError),
    /// The controller refused the options. `start` validates before
    /// spawning, so this only fires if the two ever disagree.
    Rejected(String),
}

impl From<WorkerMessage> for SearchOutcome {
    fn from(message: WorkerMessage) -> Self {
        match message {
            WorkerMessage::Found(result) => SearchOutcome::Found(result),
            WorkerMessage::NotFound(reason) => SearchOutcome::NotFound(reason),
            WorkerMessage::GenerationFailed(e) => SearchOutcome::Failed(SearchFailure::Generation(e)),
            WorkerMessage::Rejected(reason) => SearchOutcome::Failed(SearchFailure::Rejected(reason)),
        }
    }
}

struct ActiveWorker {
    ticket: u64,
    cancel: CancelToken,
    stopped: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

type Slot = Arc<Mutex<Option<ActiveWorker>>>;

fn lock(slot: &Mutex<Option<ActiveWorker>>) -> MutexGuard<'_, Option<ActiveWorker>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns at most one background search for one generator.
///
/// Progress flows straight from the worker to the caller's channel; the
/// terminal outcome is delivered through the returned [`PendingSearch`].
pub struct WorkerDispatcher {
    generator: Arc<dyn KeyGenerator>,
    slot: Slot,
    next_ticket: AtomicU64,
}

impl WorkerDispatcher {
    pub fn new(generator: Arc<dyn KeyGenerator>) -> Self {
        Self {
            generator,
            slot: Arc::new(Mutex::new(None)),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn generator(&self) -> &Arc<dyn KeyGenerator> {
        &self.generator
    }

    /// True while a started search has not been waited on or stopped
    pub fn is_active(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Validate the options and start a search on a fresh worker thread.
    ///
    /// Fails with [`VanityError::Busy`] while another search is active; the
    /// active search is not affected.
    pub fn start(&self, options: SearchOptions) -> Result<PendingSearch, VanityError> {
        let issues = options.criteria.validate(&profile_of(self.generator.as_ref()));
        if !issues.is_empty() {
            return Err(VanityError::Validation(issues));
        }

        let mut slot = lock(&self.slot);
        if slot.is_some() {
            return Err(VanityError::Busy);
        }

        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let cancel = CancelToken::new();
        let stopped = Arc::new(AtomicBool::new(false));
        let (events_tx, events_rx) = bounded(1);

        let generator = Arc::clone(&self.generator);
        let worker_cancel = cancel.clone();
        let handle = thread::Builder::new()
            .name(format!("vanitas-worker-{}", self.generator.variant()))
            .spawn(move || {
                let mut controller = SearchController::with_cancel_token(generator, worker_cancel);
                let message = match controller.run(options) {
                    Ok(SearchOutcome::Found(result)) => WorkerMessage::Found(result),
                    Ok(SearchOutcome::NotFound(reason)) => WorkerMessage::NotFound(reason),
                    Ok(SearchOutcome::Failed(SearchFailure::Generation(e))) => {
                        WorkerMessage::GenerationFailed(e)
                    }
                    // A controller only ever fails through its generator
                    Ok(SearchOutcome::Failed(other)) => WorkerMessage::Rejected(other.to_string()),
                    Err(e) => WorkerMessage::Rejected(e.to_string()),
                };
                // Receiver gone means nobody is waiting for the outcome
                let _ = events_tx.send(message);
            })?;

        info!(ticket, variant = %self.generator.variant(), "Search worker started");
        *slot = Some(ActiveWorker {
            ticket,
            cancel: cancel.clone(),
            stopped: Arc::clone(&stopped),
            handle,
        });

        Ok(PendingSearch {
            ticket,
            slot: Arc::clone(&self.slot),
            events: events_rx,
            cancel,
            stopped,
            finished: false,
        })
    }

    /// Cancel the active search and wait for its worker to exit.
    ///
    /// The pending search resolves to `NotFound(Cancelled)` regardless of
    /// what the worker reported. No-op when nothing is running.
    pub fn stop(&self) {
        let worker = lock(&self.slot).take();
        if let Some(worker) = worker {
            worker.stopped.store(true, Ordering::Release);
            worker.cancel.cancel();
            info!(ticket = worker.ticket, "Stopping search worker");
            if worker.handle.join().is_err() {
                warn!(ticket = worker.ticket, "Search worker panicked while stopping");
            }
        }
    }
}

impl Drop for WorkerDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Handle to a search running on a [`WorkerDispatcher`]
///
/// Dropping it without waiting cancels the search.
pub struct PendingSearch {
    ticket: u64,
    slot: Slot,
    events: Receiver<WorkerMessage>,
    cancel: CancelToken,
    stopped: Arc<AtomicBool>,
    finished: bool,
}

impl PendingSearch {
    /// Block until the search reaches a terminal outcome
    pub fn wait(mut self) -> SearchOutcome {
        let message = self.events.recv().ok();
        self.finish(message)
    }

    /// Wait up to `timeout`. Returns `None` if the search is still running
    /// or its outcome was already taken.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<SearchOutcome> {
        if self.finished {
            return None;
        }
        match self.events.recv_timeout(timeout) {
            Ok(message) => Some(self.finish(Some(message))),
            Err(RecvTimeoutError::Disconnected) => Some(self.finish(None)),
            Err(RecvTimeoutError::Timeout) => None,
        }
    }

    /// Non-blocking poll for the outcome
    pub fn try_outcome(&mut self) -> Option<SearchOutcome> {
        if self.finished {
            return None;
        }
        match self.events.try_recv() {
            Ok(message) => Some(self.finish(Some(message))),
            Err(TryRecvError::Disconnected) => Some(self.finish(None)),
            Err(TryRecvError::Empty) => None,
        }
    }

    /// Request cancellation without waiting
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    fn finish(&mut self, message: Option<WorkerMessage>) -> SearchOutcome {
        self.finished = true;
        let joined = self.teardown();

        if self.stopped.load(Ordering::Acquire) {
            return SearchOutcome::NotFound(NotFoundReason::Cancelled);
        }

        match (message, joined) {
            (Some(message), _) => message.into(),
            (None, Some(Err(payload))) => {
                let reason = panic_message(payload.as_ref());
                warn!(ticket = self.ticket, reason = %reason, "Search worker crashed");
                SearchOutcome::Failed(SearchFailure::WorkerCrashed(reason))
            }
            (None, _) => SearchOutcome::Failed(SearchFailure::WorkerCrashed(
                "worker exited without reporting an outcome".to_string(),
            )),
        }
    }

    /// Release the dispatcher slot if it still holds this search and join
    /// the worker.
    fn teardown(&self) -> Option<thread::Result<()>> {
        let worker = {
            let mut slot = lock(&self.slot);
            match slot.as_ref() {
                Some(active) if active.ticket == self.ticket => slot.take(),
                _ => None,
            }
        };
        worker.map(|w| w.handle.join())
    }
}

impl Drop for PendingSearch {
    fn drop(&mut self) {
        if !self.finished {
            self.cancel.cancel();
            let _ = self.teardown();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

//! Background prefetch worker
//!
//! A single thread drains a FIFO of prefetch batches, one batch at a time,
//! and writes decoded images into the batch's store. Progress is reported
//! back through an event channel that the interactive side polls.
//!
//! Every batch carries the generation of the session that submitted it. When
//! a new catalog is opened the live generation moves on and any batch (or
//! single result) from an older generation is discarded instead of written.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::loader::Loader;
use super::store::ImageStore;
use crate::catalog::Catalog;

/// One batch of indices to load for a session.
#[derive(Debug)]
pub struct PrefetchJob {
    /// Session generation the batch belongs to
    pub generation: u64,
    /// Indices to load, in load order
    pub indices: Vec<usize>,
    pub catalog: Arc<Catalog>,
    pub store: Arc<ImageStore>,
}

/// Progress notifications from the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchEvent {
    /// An image was decoded and stored
    Loaded { generation: u64, index: usize },
    /// Decoding failed; the slot stays empty
    Failed { generation: u64, index: usize },
    /// The batch was dropped because its session was replaced
    Stale { generation: u64 },
    /// Every index of a batch was processed
    BatchDone { generation: u64 },
}

/// Count of submitted-but-unfinished batches.
#[derive(Debug, Default)]
struct Outstanding {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Outstanding {
    fn add(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn done(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        let count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        let (count, _) = self
            .idle
            .wait_timeout_while(count, timeout, |count| *count > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count == 0
    }
}

/// Generation no session ever uses; set on shutdown so queued batches go
/// stale instead of decoding.
const RETIRED_GENERATION: u64 = u64::MAX;

/// Handle to the prefetch thread.
///
/// Dropping the handle retires every queued batch, closes the queue and
/// joins the thread once the decode in flight (if any) returns.
pub struct PrefetchWorker {
    request_tx: Option<Sender<PrefetchJob>>,
    event_rx: Receiver<PrefetchEvent>,
    live_generation: Arc<AtomicU64>,
    outstanding: Arc<Outstanding>,
    handle: Option<JoinHandle<()>>,
}

impl PrefetchWorker {
    /// Spawn the worker thread using `loader` for every decode.
    pub fn spawn(loader: Loader) -> Self {
        let (request_tx, request_rx) = channel::<PrefetchJob>();
        let (event_tx, event_rx) = channel::<PrefetchEvent>();
        let live_generation = Arc::new(AtomicU64::new(0));
        let outstanding = Arc::new(Outstanding::default());

        let handle = {
            let live_generation = Arc::clone(&live_generation);
            let outstanding = Arc::clone(&outstanding);
            thread::Builder::new()
                .name("imgrot-prefetch".to_string())
                .spawn(move || {
                    while let Ok(job) = request_rx.recv() {
                        run_job(&job, &loader, &live_generation, &event_tx);
                        outstanding.done();
                    }
                    debug!("prefetch queue closed, worker exiting");
                })
        };

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                // Without a thread the queue has no receiver; submissions
                // fail fast and the viewer falls back to synchronous loads.
                warn!(error = %e, "failed to spawn prefetch thread");
                None
            }
        };

        Self {
            request_tx: Some(request_tx),
            event_rx,
            live_generation,
            outstanding,
            handle,
        }
    }

    /// Mark `generation` as the live session. Batches from any other
    /// generation are discarded from now on.
    pub fn set_generation(&self, generation: u64) {
        self.live_generation.store(generation, Ordering::Release);
    }

    pub fn generation(&self) -> u64 {
        self.live_generation.load(Ordering::Acquire)
    }

    /// Queue a batch. Never blocks; empty batches are ignored.
    pub fn submit(&self, job: PrefetchJob) {
        if job.indices.is_empty() {
            return;
        }
        let Some(tx) = &self.request_tx else {
            return;
        };

        trace!(
            generation = job.generation,
            count = job.indices.len(),
            "queueing prefetch batch"
        );
        self.outstanding.add();
        if tx.send(job).is_err() {
            warn!("prefetch worker is gone, dropping batch");
            self.outstanding.done();
        }
    }

    /// Drain every event published since the last poll.
    pub fn poll(&self) -> Vec<PrefetchEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Block until all submitted batches are finished or `timeout` elapses.
    /// Returns `true` when the queue is idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.outstanding.wait_idle(timeout)
    }
}

impl Drop for PrefetchWorker {
    fn drop(&mut self) {
        self.live_generation.store(RETIRED_GENERATION, Ordering::Release);
        // Closing the sender ends the worker's recv loop.
        self.request_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for PrefetchWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefetchWorker")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

fn run_job(
    job: &PrefetchJob,
    loader: &Loader,
    live: &AtomicU64,
    events: &Sender<PrefetchEvent>,
) {
    let generation = job.generation;
    let is_live = || live.load(Ordering::Acquire) == generation;

    for &index in &job.indices {
        if !is_live() {
            debug!(generation, "discarding prefetch batch from replaced session");
            let _ = events.send(PrefetchEvent::Stale { generation });
            return;
        }
        if job.store.is_resident(index) {
            continue;
        }
        let Some(path) = job.catalog.path(index) else {
            continue;
        };

        match loader.load(path) {
            Ok(image) => {
                // The session may have been replaced during the decode.
                if !is_live() {
                    debug!(generation, index, "dropping result for replaced session");
                    let _ = events.send(PrefetchEvent::Stale { generation });
                    return;
                }
                if let Err(e) = job.store.set_image(index, Arc::new(image)) {
                    warn!(error = %e, "prefetch result does not fit the store");
                    continue;
                }
                trace!(index, "prefetched");
                let _ = events.send(PrefetchEvent::Loaded { generation, index });
            }
            Err(e) => {
                warn!(index, error = %e, "failed to load image");
                let _ = events.send(PrefetchEvent::Failed { generation, index });
            }
        }
    }

    let _ = events.send(PrefetchEvent::BatchDone { generation });
}

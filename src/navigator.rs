//! Focus navigation over a catalog.
//!
//! The navigator owns the live [`Session`] and is the only component that
//! changes the focus index. Every focus change follows the same sequence:
//!
//! 1. load the new focus synchronously if it is not resident,
//! 2. queue the rest of the window on the prefetch worker,
//! 3. evict images that fell outside the retention window.
//!
//! Opening a new catalog replaces the session wholesale and bumps the
//! generation, which makes any queued batch of the old session a no-op.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{
    Direction, ImageStore, Loader, PrefetchEvent, PrefetchJob, PrefetchWorker, Slot,
    WindowScheduler,
};
use crate::catalog::{Catalog, CatalogError};
use crate::export::{self, Annotation, ExportError};
use crate::rotation::{drag_delta, RotationOp};

/// Navigator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// No session, or a session over an empty catalog
    Idle,
    /// A non-empty catalog is open and the focus is valid
    Ready,
}

/// Everything that belongs to one opened catalog.
#[derive(Debug)]
pub struct Session {
    generation: u64,
    catalog: Arc<Catalog>,
    store: Arc<ImageStore>,
    focus: usize,
}

impl Session {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<ImageStore> {
        &self.store
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

/// Drives focus changes, prefetching and eviction.
#[derive(Debug)]
pub struct Navigator {
    scheduler: WindowScheduler,
    loader: Loader,
    worker: PrefetchWorker,
    session: Option<Session>,
    last_generation: u64,
}

impl Navigator {
    /// Create an idle navigator. `group_size` sets both the prefetch reach
    /// and the retention radius.
    pub fn new(group_size: usize, loader: Loader) -> Self {
        let worker = PrefetchWorker::spawn(loader.clone());
        Self {
            scheduler: WindowScheduler::new(group_size),
            loader,
            worker,
            session: None,
            last_generation: 0,
        }
    }

    pub fn state(&self) -> NavState {
        match &self.session {
            Some(session) if !session.is_empty() => NavState::Ready,
            _ => NavState::Idle,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn scheduler(&self) -> &WindowScheduler {
        &self.scheduler
    }

    /// Number of images in the open catalog (0 when idle).
    pub fn len(&self) -> usize {
        self.session.as_ref().map(Session::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current focus index, `None` when idle.
    pub fn focus(&self) -> Option<usize> {
        self.ready_session().map(|session| session.focus)
    }

    pub fn current_path(&self) -> Option<&Path> {
        let session = self.ready_session()?;
        session.catalog.path(session.focus)
    }

    /// Snapshot of the focused slot.
    pub fn current_slot(&self) -> Option<Slot> {
        let session = self.ready_session()?;
        session.store.get(session.focus).ok()
    }

    /// Replace the current session with one over `catalog`.
    ///
    /// The first image is loaded synchronously and the first group is queued
    /// for prefetch. An empty catalog leaves the navigator idle.
    pub fn open_catalog(&mut self, catalog: Catalog) -> NavState {
        self.last_generation += 1;
        let generation = self.last_generation;
        self.worker.set_generation(generation);

        let len = catalog.len();
        self.session = Some(Session {
            generation,
            catalog: Arc::new(catalog),
            store: Arc::new(ImageStore::new(len)),
            focus: 0,
        });

        if len == 0 {
            info!(generation, "opened empty catalog");
            return NavState::Idle;
        }

        info!(generation, images = len, "opened catalog");
        self.ensure_loaded(0);
        let initial = self.scheduler.initial_set(len);
        self.submit(initial);
        NavState::Ready
    }

    /// Scan `root` and open the result.
    ///
    /// A root that is not a directory leaves the current session untouched.
    /// An empty directory still replaces the session (the navigator becomes
    /// idle) and is reported as [`CatalogError::Empty`].
    pub fn open_directory<S: AsRef<str>>(
        &mut self,
        root: &Path,
        extensions: &[S],
    ) -> Result<NavState, CatalogError> {
        let catalog = Catalog::scan(root, extensions)?;
        match self.open_catalog(catalog) {
            NavState::Idle => Err(CatalogError::Empty {
                path: root.to_path_buf(),
            }),
            state => Ok(state),
        }
    }

    /// Jump to `index`, clamped into the catalog. The target is resident when
    /// this returns unless its file failed to decode.
    pub fn seek(&mut self, index: usize) {
        let Some(session) = self.ready_session() else {
            return;
        };
        let target = index.min(session.len() - 1);
        let len = session.len();

        self.ensure_loaded(target);
        self.set_focus(target);
        let window = self.scheduler.prefetch_set(target, len);
        self.submit(window);
        self.evict();
    }

    /// Move one image forward. No-op at the last image or when idle.
    pub fn step_forward(&mut self) {
        self.step(Direction::Forward);
    }

    /// Move one image back. No-op at the first image or when idle.
    pub fn step_back(&mut self) {
        self.step(Direction::Backward);
    }

    fn step(&mut self, direction: Direction) {
        let Some(session) = self.ready_session() else {
            return;
        };
        let len = session.len();
        let focus = session.focus;
        let target = match direction {
            Direction::Forward if focus + 1 < len => focus + 1,
            Direction::Backward if focus > 0 => focus - 1,
            _ => return,
        };
        let store = Arc::clone(&session.store);

        self.ensure_loaded(target);
        self.set_focus(target);
        let jobs = self
            .scheduler
            .step_jobs(direction, target, len, |i| store.is_resident(i));
        self.submit(jobs);
        self.evict();
    }

    /// Apply a rotation to the focused image. Returns the new angle.
    pub fn rotate(&mut self, op: RotationOp) -> Option<f64> {
        let session = self.ready_session()?;
        let current = session.store.angle(session.focus).ok()?;
        let angle = op.apply(current);
        session.store.set_angle(session.focus, angle).ok()?;
        debug!(index = session.focus, angle, "rotation updated");
        Some(angle)
    }

    /// Apply a pointer drag of `(dx, dy)` pixels as a relative rotation.
    pub fn rotate_drag(&mut self, dx: f64, dy: f64, sensitivity: f64) -> Option<f64> {
        self.rotate(RotationOp::By(drag_delta(dx, dy, sensitivity)))
    }

    /// Rows for the prefix `[0, focus]` of the catalog. Never loads images.
    pub fn annotations(&self) -> Vec<Annotation> {
        let Some(session) = self.ready_session() else {
            return Vec::new();
        };
        let end = session.focus + 1;
        session
            .catalog
            .paths()
            .iter()
            .zip(session.store.angles_prefix(end))
            .map(|(path, angle)| Annotation {
                path: path.clone(),
                angle,
            })
            .collect()
    }

    /// Write [`Navigator::annotations`] as CSV to `dest`.
    pub fn export(&self, dest: &Path) -> Result<(), ExportError> {
        export::write_csv(dest, &self.annotations())
    }

    /// Drain prefetch progress events of the live session.
    pub fn poll(&self) -> Vec<PrefetchEvent> {
        let live = self.worker.generation();
        self.worker
            .poll()
            .into_iter()
            .filter(|event| event_generation(event) == live)
            .collect()
    }

    /// Block until the prefetch queue is empty or `timeout` elapses.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.worker.wait_idle(timeout)
    }

    /// Clear resident images outside the retention window of the focus.
    /// Only drops references; never does I/O.
    pub fn evict(&self) -> Vec<usize> {
        let Some(session) = self.ready_session() else {
            return Vec::new();
        };
        let (min, max) = self.scheduler.retention_range(session.focus, session.len());
        let cleared = session.store.evict_outside(min, max);
        if !cleared.is_empty() {
            debug!(count = cleared.len(), min, max, "evicted images");
        }
        cleared
    }

    fn ready_session(&self) -> Option<&Session> {
        self.session.as_ref().filter(|session| !session.is_empty())
    }

    fn set_focus(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut() {
            session.focus = index;
        }
    }

    // Synchronous load on the interactive thread; a decode failure leaves the
    // slot empty and is only logged.
    fn ensure_loaded(&self, index: usize) {
        let Some(session) = self.ready_session() else {
            return;
        };
        debug_assert!(index < session.len(), "focus index out of range");
        if session.store.is_resident(index) {
            return;
        }
        let Some(path) = session.catalog.path(index) else {
            return;
        };
        match self.loader.load(path) {
            Ok(image) => {
                if let Err(e) = session.store.set_image(index, Arc::new(image)) {
                    warn!(error = %e, "loaded image does not fit the store");
                }
            }
            Err(e) => warn!(index, error = %e, "failed to load image"),
        }
    }

    fn submit(&self, indices: Vec<usize>) {
        let Some(session) = self.ready_session() else {
            return;
        };
        self.worker.submit(PrefetchJob {
            generation: session.generation,
            indices,
            catalog: Arc::clone(&session.catalog),
            store: Arc::clone(&session.store),
        });
    }
}

fn event_generation(event: &PrefetchEvent) -> u64 {
    match event {
        PrefetchEvent::Loaded { generation, .. }
        | PrefetchEvent::Failed { generation, .. }
        | PrefetchEvent::Stale { generation }
        | PrefetchEvent::BatchDone { generation } => *generation,
    }
}

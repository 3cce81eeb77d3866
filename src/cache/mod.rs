//! Sliding-window image cache
//!
//! The store holds one slot per catalog entry, the scheduler decides which
//! slots should be filled or cleared around the focus, and the worker fills
//! them on a background thread.

pub mod loader;
pub mod scheduler;
pub mod store;
pub mod worker;

pub use loader::{Codec, DecodedImage, ImageCodec, LoadError, Loader};
pub use scheduler::{Direction, WindowScheduler};
pub use store::{ImageStore, Slot, StoreError};
pub use worker::{PrefetchEvent, PrefetchJob, PrefetchWorker};

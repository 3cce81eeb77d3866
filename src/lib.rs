//! imgrot Library
//!
//! Browse large, sorted image collections and annotate each image with a
//! rotation angle. The core is a sliding-window cache: images around the
//! focus are decoded ahead of time on a background thread, and images that
//! drift too far from the focus are evicted while their angles are kept.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod navigator;
pub mod rotation;
pub mod tui;

pub use cache::{DecodedImage, ImageStore, LoadError, Loader, Slot};
pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use export::{Annotation, ExportError};
pub use navigator::{NavState, Navigator, Session};
pub use rotation::RotationOp;

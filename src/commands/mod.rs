//! Command handlers for the imgrot CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod browse;
pub mod config;
pub mod export;
pub mod scan;

use std::path::Path;

use anyhow::{Context, Result};

use imgrot::{Catalog, CatalogError, Config, Loader, Navigator};

/// Open `dir` on a fresh navigator configured from `config`.
///
/// An empty directory is not an error here: the navigator is returned idle
/// so callers can decide how to report it.
pub fn open_navigator(dir: &Path, config: &Config) -> Result<Navigator> {
    let mut navigator = Navigator::new(config.cache.group_size, Loader::default());
    match navigator.open_directory(dir, &config.catalog.extensions) {
        Ok(_) | Err(CatalogError::Empty { .. }) => Ok(navigator),
        Err(e) => Err(e).with_context(|| format!("Cannot open {}", dir.display())),
    }
}

/// Scan `dir` with the configured extensions.
pub fn scan_catalog(dir: &Path, config: &Config) -> Result<Catalog> {
    Catalog::scan(dir, &config.catalog.extensions)
        .with_context(|| format!("Cannot scan {}", dir.display()))
}

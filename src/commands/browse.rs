//! Browse command handler

use std::path::Path;

use anyhow::Result;

use imgrot::tui::viewer::{self, Viewer};
use imgrot::Config;

use super::open_navigator;

/// Open the interactive viewer on `dir`.
#[cfg(not(tarpaulin_include))]
pub fn handle(dir: &Path, config: Config) -> Result<()> {
    let navigator = open_navigator(dir, &config)?;
    tracing::info!(dir = %dir.display(), images = navigator.len(), "starting viewer");
    viewer::run(Viewer::new(navigator, config))
}

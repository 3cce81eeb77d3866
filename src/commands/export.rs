//! Export command handler

use std::path::Path;

use anyhow::{Context, Result};

use imgrot::export::{template_rows, write_csv};
use imgrot::Config;

use super::scan_catalog;

/// Export unrotated annotation rows of `dir` up to `upto` (default: the last
/// image). Only the catalog is read; no image is decoded.
#[cfg(not(tarpaulin_include))]
pub fn handle(dir: &Path, output: &Path, upto: Option<usize>, config: &Config) -> Result<()> {
    let catalog = scan_catalog(dir, config)?;
    if catalog.is_empty() {
        eprintln!("No images found in {}", dir.display());
    }

    let rows = template_rows(&catalog, upto);
    write_csv(output, &rows)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    println!("Exported {} rows to {}", rows.len(), output.display());
    Ok(())
}

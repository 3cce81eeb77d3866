//! Scan command handler

use std::path::Path;

use anyhow::Result;

use imgrot::Config;

use super::scan_catalog;

/// Print the sorted catalog of `dir`, one path per line, then a count.
#[cfg(not(tarpaulin_include))]
pub fn handle(dir: &Path, config: &Config) -> Result<()> {
    let catalog = scan_catalog(dir, config)?;
    for path in catalog.iter() {
        println!("{}", path.display());
    }
    println!("{} images", catalog.len());
    Ok(())
}

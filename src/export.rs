//! CSV export of rotation annotations.
//!
//! The output is UTF-8 with a `Image,Rotation Angle` header and one row per
//! catalog entry. Files are written to a sibling temp file first and then
//! renamed over the destination, so a failed export never leaves a partial
//! file behind.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::Catalog;

/// Header row of every export.
pub const HEADER: &str = "Image,Rotation Angle";

/// Errors raised while writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write annotations to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One exported row.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub path: PathBuf,
    pub angle: f64,
}

/// Unrotated rows for `catalog[0..=upto]` (`upto` clamped to the last
/// image, default the last image). Reads paths only; nothing is decoded.
pub fn template_rows(catalog: &Catalog, upto: Option<usize>) -> Vec<Annotation> {
    let end = match upto {
        Some(last) => last.saturating_add(1).min(catalog.len()),
        None => catalog.len(),
    };
    catalog.paths()[..end]
        .iter()
        .map(|path| Annotation {
            path: path.clone(),
            angle: 0.0,
        })
        .collect()
}

/// Render annotations as CSV text, header included.
pub fn render_csv(rows: &[Annotation]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + rows.len() * 32);
    out.push_str(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&escape_field(&row.path.to_string_lossy()));
        out.push(',');
        out.push_str(&row.angle.to_string());
        out.push('\n');
    }
    out
}

/// Render `rows` and write them atomically to `dest`.
pub fn write_csv(dest: &Path, rows: &[Annotation]) -> Result<(), ExportError> {
    let contents = render_csv(rows);
    let temp_path = temp_path_for(dest);

    let io_err = |source| ExportError::Io {
        path: dest.to_path_buf(),
        source,
    };

    if let Err(e) = fs::write(&temp_path, contents.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(e));
    }
    if let Err(e) = fs::rename(&temp_path, dest) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(e));
    }

    info!(path = %dest.display(), rows = rows.len(), "annotations exported");
    Ok(())
}

/// Sibling temp path used while writing `dest` (`<dest>.tmp`).
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let mut temp = dest.as_os_str().to_owned();
    temp.push(".tmp");
    PathBuf::from(temp)
}

// Quote fields containing a separator, quote or line break, doubling quotes.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

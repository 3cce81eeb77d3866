//! Image catalog: the ordered, immutable file list of a session.
//!
//! A catalog is built once per opened directory. Files are collected
//! recursively, filtered by extension (case-insensitive) and sorted
//! case-insensitively by full path. The position of a file in the catalog is
//! its identity for the rest of the session.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions recognized when no configuration overrides them.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Errors raised while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("No images found in {}", .path.display())]
    Empty { path: PathBuf },
}

/// Sorted list of image paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    paths: Vec<PathBuf>,
}

impl Catalog {
    /// Build a catalog from an arbitrary path list, sorting it
    /// case-insensitively by full path.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        paths.sort_by_cached_key(|path| path.to_string_lossy().to_lowercase());
        Self { paths }
    }

    /// Recursively scan `root` for files whose extension is in `extensions`.
    ///
    /// Unreadable entries below the root are skipped with a warning. An
    /// empty result is not an error here.
    pub fn scan<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<Self, CatalogError> {
        if !root.is_dir() {
            return Err(CatalogError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && has_image_extension(entry.path(), extensions) {
                paths.push(entry.into_path());
            }
        }

        debug!(root = %root.display(), count = paths.len(), "catalog scanned");
        Ok(Self::from_paths(paths))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

/// Case-insensitive extension check against `extensions` (given without
/// the leading dot).
pub fn has_image_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

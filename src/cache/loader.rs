//! Image loading behind a pluggable codec.
//!
//! The loader owns no state beyond its codec. Its job is to turn a path
//! into a complete [`DecodedImage`] or a [`LoadError`]; it never hands out a
//! partially decoded image.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, ImageReader, ImageResult};

/// A fully decoded image ready for display.
#[derive(Debug)]
pub struct DecodedImage {
    pixels: DynamicImage,
}

impl DecodedImage {
    pub fn new(pixels: DynamicImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.as_bytes().len()
    }
}

/// Why a single file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Decoded image has no pixels: {}", .path.display())]
    Empty { path: PathBuf },

    #[error("Codec panicked while decoding {}", .path.display())]
    Panicked { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Decode { path, .. }
            | LoadError::Empty { path }
            | LoadError::Panicked { path } => path,
        }
    }
}

/// Decoder for image files.
///
/// Implementations must be callable from the prefetch thread and the
/// interactive thread at the same time.
pub trait Codec: Send + Sync {
    fn decode(&self, path: &Path) -> ImageResult<DynamicImage>;
}

/// Default codec backed by the `image` crate.
///
/// The format is sniffed from the file's magic bytes, falling back to the
/// extension when sniffing is inconclusive.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> ImageResult<DynamicImage> {
        let mut reader = ImageReader::open(path)?.with_guessed_format()?;
        if reader.format().is_none() {
            if let Ok(format) = ImageFormat::from_path(path) {
                reader.set_format(format);
            }
        }
        reader.decode()
    }
}

/// Maps codec output to [`DecodedImage`] / [`LoadError`].
#[derive(Clone)]
pub struct Loader {
    codec: Arc<dyn Codec>,
}

impl Loader {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    /// Load `path`. Codec panics are caught and reported as
    /// [`LoadError::Panicked`].
    pub fn load(&self, path: &Path) -> Result<DecodedImage, LoadError> {
        let decoded = panic::catch_unwind(AssertUnwindSafe(|| self.codec.decode(path)))
            .map_err(|_| LoadError::Panicked {
                path: path.to_path_buf(),
            })?
            .map_err(|source| LoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(DecodedImage::new(decoded))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(Arc::new(ImageCodec))
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

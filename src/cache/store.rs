//! Index-addressed slot table shared between the interactive context and
//! the prefetch worker.
//!
//! Every slot holds an optional decoded image (transient cache state) and a
//! rotation angle (durable session state). A single store-wide mutex guards
//! the table; it is held only for the length of one read or write, never
//! across a decode.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::loader::DecodedImage;
use crate::rotation::normalize_angle;

/// Errors raised by slot accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Index {index} is out of range for a catalog of {len} images")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Per-index cache record.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    /// Decoded image, absent until loaded and after eviction
    pub image: Option<Arc<DecodedImage>>,
    /// Rotation in degrees, always within `[0, 360)`
    pub rotation_angle: f64,
}

impl Slot {
    pub fn is_resident(&self) -> bool {
        self.image.is_some()
    }
}

/// Slot table for one session.
#[derive(Debug)]
pub struct ImageStore {
    slots: Mutex<Vec<Slot>>,
}

impl ImageStore {
    /// Create a store with `len` empty slots (no image, angle 0).
    pub fn new(len: usize) -> Self {
        Self {
            slots: Mutex::new(vec![Slot::default(); len]),
        }
    }

    /// Number of slots (the catalog size).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the slot at `index`.
    ///
    /// The image is shared, so the returned slot stays valid even if the
    /// entry is evicted right after.
    pub fn get(&self, index: usize) -> Result<Slot, StoreError> {
        let slots = self.lock();
        slots
            .get(index)
            .cloned()
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: slots.len(),
            })
    }

    /// Store a decoded image. Overwrites any existing image (last write wins).
    pub fn set_image(&self, index: usize, image: Arc<DecodedImage>) -> Result<(), StoreError> {
        let mut slots = self.lock();
        let len = slots.len();
        let slot = slots
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        slot.image = Some(image);
        Ok(())
    }

    /// Drop the image at `index`. The rotation angle is left untouched.
    pub fn clear_image(&self, index: usize) -> Result<(), StoreError> {
        let mut slots = self.lock();
        let len = slots.len();
        let slot = slots
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        slot.image = None;
        Ok(())
    }

    /// Store a rotation angle, normalized into `[0, 360)`.
    pub fn set_angle(&self, index: usize, angle: f64) -> Result<(), StoreError> {
        let mut slots = self.lock();
        let len = slots.len();
        let slot = slots
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        slot.rotation_angle = normalize_angle(angle);
        Ok(())
    }

    pub fn angle(&self, index: usize) -> Result<f64, StoreError> {
        let slots = self.lock();
        slots
            .get(index)
            .map(|slot| slot.rotation_angle)
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: slots.len(),
            })
    }

    /// Whether `index` currently holds an image. Out-of-range is `false`.
    pub fn is_resident(&self, index: usize) -> bool {
        self.lock()
            .get(index)
            .map(Slot::is_resident)
            .unwrap_or(false)
    }

    /// Number of slots currently holding an image.
    pub fn resident_count(&self) -> usize {
        self.lock().iter().filter(|slot| slot.is_resident()).count()
    }

    /// Approximate memory held by resident images, in bytes.
    pub fn resident_bytes(&self) -> usize {
        self.lock()
            .iter()
            .filter_map(|slot| slot.image.as_ref())
            .map(|image| image.byte_size())
            .sum()
    }

    /// Indices of the resident slots, ascending.
    pub fn resident_indices(&self) -> Vec<usize> {
        self.lock()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_resident())
            .map(|(i, _)| i)
            .collect()
    }

    /// Rotation angles for the half-open prefix `[0, end)`, clamped to the
    /// store length.
    pub fn angles_prefix(&self, end: usize) -> Vec<f64> {
        let slots = self.lock();
        let end = end.min(slots.len());
        slots[..end].iter().map(|slot| slot.rotation_angle).collect()
    }

    /// Clear every resident image whose index lies outside the inclusive
    /// range `[min, max]`. Returns the cleared indices.
    pub fn evict_outside(&self, min: usize, max: usize) -> Vec<usize> {
        let mut slots = self.lock();
        let mut cleared = Vec::new();
        for (i, slot) in slots.iter_mut().enumerate() {
            if (i < min || i > max) && slot.image.take().is_some() {
                cleared.push(i);
            }
        }
        cleared
    }

    // A panic while holding the lock cannot leave a slot half-written (each
    // mutation is a single field assignment), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

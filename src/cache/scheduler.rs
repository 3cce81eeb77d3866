//! Window arithmetic: what to prefetch and what to keep.
//!
//! Everything here is a pure function of the focus index, the catalog
//! length and the configured group size. Residency is passed in as a
//! predicate so the scheduler never touches the store itself.

use std::ops::Range;

/// Direction of a single-step navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Computes prefetch jobs and the retention window for a group size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowScheduler {
    group_size: usize,
}

impl WindowScheduler {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size: group_size.max(1),
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Indices to prefetch right after a catalog is opened: `[0, group_size)`.
    pub fn initial_set(&self, len: usize) -> Vec<usize> {
        (0..self.group_size.min(len)).collect()
    }

    /// Window centered on `focus`, ascending:
    /// `[focus - group_size/2, focus + group_size/2)` clamped to the catalog.
    pub fn prefetch_set(&self, focus: usize, len: usize) -> Vec<usize> {
        let half = self.group_size / 2;
        let start = focus.saturating_sub(half);
        let end = focus.saturating_add(half).min(len);
        (start..end).collect()
    }

    /// Load jobs after stepping one image in `direction` to `focus`.
    ///
    /// Forward looks at `[focus+1, focus+group_size)`; if anything in the far
    /// half is missing, every missing index of the range is queued ascending.
    /// Backward looks at `[focus-group_size, focus-1)` and queues missing
    /// indices descending, so the nearest image behind the focus loads first.
    pub fn step_jobs<F>(
        &self,
        direction: Direction,
        focus: usize,
        len: usize,
        is_resident: F,
    ) -> Vec<usize>
    where
        F: Fn(usize) -> bool,
    {
        match direction {
            Direction::Forward => {
                let range = self.forward_range(focus, len);
                let far_half = (range.start + range.len() / 2)..range.end;
                if far_half.into_iter().all(|i| is_resident(i)) {
                    return Vec::new();
                }
                range.filter(|&i| !is_resident(i)).collect()
            }
            Direction::Backward => {
                let range = self.backward_range(focus);
                let far_half = range.start..(range.start + range.len() / 2);
                if far_half.into_iter().all(|i| is_resident(i)) {
                    return Vec::new();
                }
                range.rev().filter(|&i| !is_resident(i)).collect()
            }
        }
    }

    /// Inclusive `(min, max)` range of indices that survive eviction:
    /// `[focus - group_size, focus + group_size]` clamped to the catalog.
    pub fn retention_range(&self, focus: usize, len: usize) -> (usize, usize) {
        let min = focus.saturating_sub(self.group_size);
        let max = focus.saturating_add(self.group_size).min(len);
        (min, max)
    }

    /// Whether `index` is kept resident while focus sits at `focus`.
    pub fn retains(&self, index: usize, focus: usize, len: usize) -> bool {
        let (min, max) = self.retention_range(focus, len);
        index >= min && index <= max
    }

    fn forward_range(&self, focus: usize, len: usize) -> Range<usize> {
        let start = focus.saturating_add(1).min(len);
        let end = focus.saturating_add(self.group_size).min(len);
        start..end.max(start)
    }

    fn backward_range(&self, focus: usize) -> Range<usize> {
        let start = focus.saturating_sub(self.group_size);
        let end = focus.saturating_sub(1);
        start..end.max(start)
    }
}

//! Shared batch state read by request handlers and advanced by the rotation clock.
//!
//! The batch sequence is fixed once the store is built, so it is read without any
//! synchronization. The only mutable state is the current index, held in an [`AtomicUsize`]:
//! readers see either the value before or after an advance, never anything in between, and
//! concurrent advances are applied one after another without being lost.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::batching::Batch;
use crate::errors::{Error, Result};

/// The batch currently being served, together with the index it was read at.
#[derive(Debug, Clone, Copy)]
pub struct CurrentBatch<'a> {
    pub index: usize,
    pub batch: &'a Batch,
}

#[derive(Debug, Default)]
pub struct BatchStore {
    batches: Vec<Batch>,
    current_index: AtomicUsize,
}

impl BatchStore {
    pub fn new(batches: Vec<Batch>) -> Self {
        Self {
            batches,
            current_index: AtomicUsize::new(0),
        }
    }

    /// All batches, in rotation order
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Number of batches in the rotation
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Total devices across every batch
    pub fn total_devices(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    /// Position of the batch currently being served. Always 0 when fewer than two batches are loaded.
    pub fn current_index(&self) -> usize {
        self.current_index.load(Ordering::Acquire)
    }

    /// The batch currently being served.
    ///
    /// Fails with [`Error::EmptyDataset`] when no batches are loaded.
    pub fn current_batch(&self) -> Result<&Batch> {
        self.current().map(|current| current.batch)
    }

    /// The current batch and its index, read from a single load of the index so the two always agree.
    pub fn current(&self) -> Result<CurrentBatch<'_>> {
        let index = self.current_index();
        let batch = self.batches.get(index).ok_or(Error::EmptyDataset)?;
        Ok(CurrentBatch { index, batch })
    }

    /// Move to the next batch, wrapping at the end. Returns the new index.
    ///
    /// With zero or one batch there is nothing to rotate to: the index stays at 0 and `None`
    /// is returned.
    pub fn advance(&self) -> Option<usize> {
        let len = self.batches.len();
        if len <= 1 {
            return None;
        }

        let previous = self
            .current_index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |index| Some((index + 1) % len))
            .unwrap_or_else(|index| index);

        Some((previous + 1) % len)
    }
}

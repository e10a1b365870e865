//! Outcome of a batch of independent submissions.
//!
//! Batches are not atomic: items that the backend accepted stay accepted
//! when later items fail.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position of the failed item in the submitted batch
    pub index: usize,
    pub reason: String,
    /// Error classification reported by the caller, e.g. `"conflict"`
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchOutcome<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, item: T) {
        self.succeeded.push(item);
    }

    pub fn record_failure(&mut self, index: usize, reason: impl Into<String>, kind: Option<&str>) {
        self.failed.push(BatchFailure {
            index,
            reason: reason.into(),
            kind: kind.map(str::to_string),
        });
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded_count() + self.failed_count()
    }

    /// Every submitted item was accepted
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Some, but not all, items were accepted
    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failed.iter().map(|f| f.index).collect()
    }
}

//! Ownership transfer of flat record tables to the records that reference them

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{FlverError, Result};

/// Entries keyed by their position in the file, each handed out at most once
#[derive(Debug)]
pub struct ClaimPool<T> {
    kind: &'static str,
    entries: BTreeMap<usize, T>,
}

impl<T> ClaimPool<T> {
    /// Pool `items` under their sequential indices
    pub fn new(kind: &'static str, items: Vec<T>) -> Self {
        Self {
            kind,
            entries: items.into_iter().enumerate().collect(),
        }
    }

    /// Remove and return the entry at `index`
    pub fn claim(&mut self, index: i64) -> Result<T> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.remove(&i))
            .ok_or(FlverError::MissingReference {
                kind: self.kind,
                index,
            })
    }

    /// Claim every index of `range`, in order
    pub fn claim_range(&mut self, range: Range<usize>) -> Result<Vec<T>> {
        range
            .map(|i| self.claim(i64::try_from(i).unwrap_or(i64::MAX)))
            .collect()
    }

    /// Claim each index of `indices`, in the given order
    pub fn claim_all(&mut self, indices: &[i32]) -> Result<Vec<T>> {
        indices.iter().map(|&i| self.claim(i64::from(i))).collect()
    }

    /// Unclaimed indices in ascending order
    pub fn remaining(&self) -> Vec<usize> {
        self.entries.keys().copied().collect()
    }

    /// Number of unclaimed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether every entry has been claimed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail if anything was left unclaimed
    pub fn finish(self) -> Result<()> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(FlverError::Orphaned {
                kind: self.kind,
                indices: self.remaining(),
            })
        }
    }
}

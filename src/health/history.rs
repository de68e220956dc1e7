//! Bounded per-target check history.

use std::collections::VecDeque;

use crate::health::classification::CheckRecord;

/// Append-only log of recent checks, stored oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLedger {
    records: VecDeque<CheckRecord>,
    capacity: usize,
}

impl HistoryLedger {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    /// Rebuild from persisted records (oldest first), keeping the newest `capacity`.
    pub fn from_records(records: impl IntoIterator<Item = CheckRecord>, capacity: usize) -> Self {
        let mut ledger = Self::new(capacity);
        for record in records {
            ledger.append(record);
        }
        ledger
    }

    /// Append at the newest end and evict the oldest beyond capacity.
    pub fn append(&mut self, record: CheckRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&CheckRecord> {
        self.records.back()
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CheckRecord> + '_ {
        self.records.iter()
    }

    /// Up to `n` records, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &CheckRecord> + '_ {
        self.records.iter().rev().take(n)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn into_vec(self) -> Vec<CheckRecord> {
        self.records.into()
    }
}

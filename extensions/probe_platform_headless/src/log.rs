//! Bounded buffer of recent diagnostic records

use std::collections::VecDeque;

use parking_lot::Mutex;

const CAPACITY: usize = 100;

/// Keeps the most recent records so failures can show what led up to them
#[derive(Default)]
pub struct LogHistory {
    records: Mutex<VecDeque<String>>,
}

impl LogHistory {
    pub fn push(&self, record: impl Into<String>) {
        let mut records = self.records.lock();
        if records.len() == CAPACITY {
            records.pop_front();
        }
        records.push_back(record.into());
    }

    pub fn records(&self) -> Vec<String> {
        self.records.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

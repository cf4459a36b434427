//! Recent conversions
//!
//! An in-memory list of the latest operations, newest first. Nothing is
//! persisted.

use crate::types::MimeType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Encode,
    Decode,
}

impl Operation {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub file_name: String,
    pub mime: MimeType,
    pub size: u64,
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
}

impl HistoryEntry {
    /// Relative age such as `Just now`, `5m ago`, `3h ago` or `2d ago`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.timestamp).num_seconds().max(0);
        let mins = secs / 60;
        let hours = mins / 60;
        let days = hours / 24;

        if secs < 60 {
            "Just now".to_string()
        } else if mins < 60 {
            format!("{mins}m ago")
        } else if hours < 24 {
            format!("{hours}h ago")
        } else {
            format!("{days}d ago")
        }
    }
}

/// Bounded history; the oldest entry is evicted once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Records an operation and returns the stored entry.
    pub fn record(
        &mut self,
        operation: Operation,
        file_name: &str,
        mime: &MimeType,
        size: u64,
        timestamp: DateTime<Utc>,
    ) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: self.next_id,
            file_name: file_name.to_string(),
            mime: mime.clone(),
            size,
            timestamp,
            operation,
        };
        self.next_id += 1;

        self.entries.push_front(entry);
        self.entries.truncate(self.capacity.max(1));
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

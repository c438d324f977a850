//! Message log — the ordered local view of the chat stream.
//!
//! DESIGN
//! ======
//! Display order is strictly stream order: bootstrap replaces the log with
//! the history snapshot wholesale, and each live event appends at the tail.
//! No reordering by timestamp ever happens.
//!
//! Local sends are echoed optimistically before the server mirrors them
//! back, so every append is gated on the entry's client-generated ID: the
//! mirrored copy of an entry we already rendered is dropped.

use std::collections::HashSet;

use uuid::Uuid;

use crate::event::ChatEntry;

/// Append-only chat log with ID-based deduplication.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<ChatEntry>,
    seen: HashSet<Uuid>,
}

impl MessageLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the tail unless its ID was already seen.
    /// Returns whether the entry was actually appended.
    pub fn append(&mut self, entry: ChatEntry) -> bool {
        if !self.seen.insert(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Replace the whole log with the history snapshot, oldest first.
    pub fn replace_all(&mut self, entries: Vec<ChatEntry>) {
        self.seen = entries.iter().map(|e| e.id).collect();
        self.entries = entries;
    }

    /// All entries in arrival order.
    #[must_use]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;

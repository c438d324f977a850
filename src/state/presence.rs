//! Presence registry — who is connected right now.
//!
//! All operations are total: registering an existing username replaces its
//! display attributes in place (keeping registration order), and removing an
//! absent username is a no-op, so a double leave is safe.

use crate::event::Identity;

/// Currently connected participants, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Identity>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the participant keyed by username. Idempotent:
    /// a re-registration replaces attributes without duplicating the entry
    /// and keeps the original position.
    pub fn register(&mut self, identity: Identity) {
        if let Some(existing) = self
            .participants
            .iter_mut()
            .find(|p| p.username == identity.username)
        {
            *existing = identity;
        } else {
            self.participants.push(identity);
        }
    }

    /// Remove the participant if present. No-op when absent.
    pub fn remove(&mut self, username: &str) {
        self.participants.retain(|p| p.username != username);
    }

    /// All current participants in registration order.
    #[must_use]
    pub fn list(&self) -> &[Identity] {
        &self.participants
    }

    /// Look up a participant by username.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<&Identity> {
        self.participants.iter().find(|p| p.username == username)
    }

    /// Replace the whole roster with a fetched snapshot.
    pub fn replace_all(&mut self, participants: Vec<Identity>) {
        self.participants = participants;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
#[path = "presence_test.rs"]
mod tests;

//! Poll state machine — at most one active two-option vote.
//!
//! DESIGN
//! ======
//! Idle ⇄ Active, driven purely by received stream events — never by local
//! optimistic updates. Tally correctness under concurrent votes requires
//! serialization at a single point, and that point is the server; this
//! machine just replays the serialized stream.
//!
//! Create and vote payloads arrive as free text (the interpreter does not
//! pre-parse them), so every transition here treats malformed input as a
//! silent no-op rather than an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Textual marker that opens a poll. Also recognized by the interpreter.
pub const CREATE_MARKER: &str = "/create";

// =============================================================================
// POLL
// =============================================================================

/// The active poll as carried on the wire and in snapshots.
///
/// Invariant: `votes_a + votes_b == voters.len()`, and a username appears in
/// `voters` at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub title: String,
    pub option_a: String,
    pub option_b: String,
    pub votes_a: u32,
    pub votes_b: u32,
    pub voters: HashSet<String>,
}

impl Poll {
    /// Parse a free-text create command into a fresh poll.
    ///
    /// Options are the first two whitespace tokens after the `/create`
    /// marker; the title is the line with the marker spliced out. Returns
    /// `None` when fewer than two option tokens follow the marker.
    #[must_use]
    pub fn parse_create(command: &str) -> Option<Self> {
        let (before, after) = command.split_once(CREATE_MARKER)?;

        let mut tokens = after.split_whitespace();
        let option_a = tokens.next()?.to_owned();
        let option_b = tokens.next()?.to_owned();

        let title: Vec<&str> = before
            .split_whitespace()
            .chain(after.split_whitespace())
            .collect();

        Some(Self {
            title: title.join(" "),
            option_a,
            option_b,
            votes_a: 0,
            votes_b: 0,
            voters: HashSet::new(),
        })
    }

    /// Which option a free-text vote references. Substring match; option A
    /// is checked first, so when one option text contains the other the
    /// tie breaks toward A.
    #[must_use]
    pub fn match_option(&self, vote: &str) -> Option<VoteOption> {
        if !self.option_a.is_empty() && vote.contains(&self.option_a) {
            return Some(VoteOption::A);
        }
        if !self.option_b.is_empty() && vote.contains(&self.option_b) {
            return Some(VoteOption::B);
        }
        None
    }
}

/// One of the two poll options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOption {
    A,
    B,
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Idle (no active poll) or Active (exactly one).
#[derive(Debug, Clone, Default)]
pub struct PollState {
    active: Option<Poll>,
}

impl PollState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active poll, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Poll> {
        self.active.as_ref()
    }

    /// Install a bootstrap snapshot wholesale. A snapshot with an empty
    /// title means "no active poll".
    pub fn replace(&mut self, snapshot: Option<Poll>) {
        self.active = snapshot.filter(|p| !p.title.is_empty());
    }

    /// Idle → Active on a received create event. Replaces any active poll
    /// wholesale; a malformed payload changes nothing.
    pub fn create(&mut self, command: &str) {
        if let Some(poll) = Poll::parse_create(command) {
            self.active = Some(poll);
        }
    }

    /// Apply a received vote. Ignored when no poll is active, when the text
    /// matches neither option, or when the username already voted (first
    /// vote wins, no revoting). Returns whether a tally changed.
    pub fn apply_vote(&mut self, vote: &str, username: &str) -> bool {
        let Some(poll) = &mut self.active else {
            return false;
        };
        let Some(option) = poll.match_option(vote) else {
            return false;
        };
        if !poll.voters.insert(username.to_owned()) {
            return false;
        }
        match option {
            VoteOption::A => poll.votes_a += 1,
            VoteOption::B => poll.votes_b += 1,
        }
        true
    }

    /// Active → Idle on a received close event, regardless of issuer — any
    /// participant may close the active poll. Idle close is a no-op.
    pub fn close(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
#[path = "poll_test.rs"]
mod tests;

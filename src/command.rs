//! Command interpreter — classifies raw chat input before dispatch.
//!
//! DESIGN
//! ======
//! Commands are textual sigils embedded in ordinary chat text with no
//! escaping mechanism, so classification checks the longest, most specific
//! markers first: a line containing both `/create` and `#` is a create, not
//! a vote. The `#` sigil only becomes a vote when a poll is active and the
//! line actually names one of its options; otherwise it falls through to a
//! plain message. Payloads are the raw line — argument parsing happens
//! downstream in the poll machine, which treats malformed input as a no-op.

use crate::state::poll::{CREATE_MARKER, Poll};

/// Textual marker that closes the active poll.
pub const CLOSE_MARKER: &str = "/close";

/// Sigil that marks a line as a vote attempt.
pub const VOTE_SIGIL: char = '#';

/// Classified outgoing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a poll. Carries the whole raw line for downstream parsing.
    CreatePoll { command: String },
    /// Close the active poll, whoever started it.
    ClosePoll,
    /// Vote on the active poll. Carries the raw line; option extraction
    /// happens downstream.
    Vote { vote: String },
    /// An ordinary chat message.
    Say { message: String },
}

/// Classify one raw input line. First match wins; blank input produces
/// nothing at all, not even a message.
#[must_use]
pub fn classify(line: &str, active_poll: Option<&Poll>) -> Option<Command> {
    if line.trim().is_empty() {
        return None;
    }
    if line.contains(CREATE_MARKER) {
        return Some(Command::CreatePoll { command: line.to_owned() });
    }
    if line.contains(CLOSE_MARKER) {
        return Some(Command::ClosePoll);
    }
    if line.contains(VOTE_SIGIL) {
        if let Some(poll) = active_poll {
            if poll.match_option(line).is_some() {
                return Some(Command::Vote { vote: line.to_owned() });
            }
        }
    }
    Some(Command::Say { message: line.to_owned() })
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

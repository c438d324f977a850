//! Session state.
//!
//! DESIGN
//! ======
//! One explicit struct owns everything the client mirrors from the room —
//! no ambient globals. The sync controller holds it and passes it to
//! handlers; mutations only happen inside the single event dispatcher or
//! the bootstrap reconciliation, so they are atomic with respect to each
//! other under the one-loop execution model.

pub mod messages;
pub mod poll;
pub mod presence;

use crate::event::Identity;
use messages::MessageLog;
use poll::PollState;
use presence::Roster;

/// The client's best-effort mirror of the shared room state, plus the local
/// verified identity once one exists.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Verified identity of the local participant. `None` until login,
    /// registration, or token verification succeeds.
    pub identity: Option<Identity>,
    pub roster: Roster,
    pub log: MessageLog,
    pub poll: PollState,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

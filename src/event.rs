//! Event — the wire model for the live stream.
//!
//! DESIGN
//! ======
//! Every state change after bootstrap travels as one `Event`, an internally
//! tagged enum consumed by a single dispatcher. The same shapes are used in
//! both directions: the server mirrors client events back out to the room.
//! Field names are camelCase on the wire; timestamps are milliseconds since
//! the Unix epoch.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Display name of the system author for arrival announcements.
pub const BOT_USERNAME: &str = "\u{1f525} Flamewars bot \u{1f525}";

/// Foreground color of system-authored entries.
pub const BOT_COLOR: &str = "#0c5460";

/// Bubble background color of system-authored entries.
pub const BOT_BG_COLOR: &str = "#d1ecf1";

/// Default palette offered at registration.
pub const COLORSET: [&str; 6] = [
    "#007bff", "#6f42c1", "#e83e8c", "#dc3545", "#28a745", "#17a2b8",
];

/// Default bubble background when the user picks none.
pub const DEFAULT_BG_COLOR: &str = "hsla(211, 100%, 95%, 0.85)";

// =============================================================================
// TYPES
// =============================================================================

/// A verified participant identity. Immutable for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,
    pub color: String,
    pub bg_color: String,
}

/// One chat message as rendered and as carried on the wire.
///
/// `id` is generated by the sending client and is the deduplication key: the
/// optimistic local echo and the server's mirrored copy share it. Inbound
/// data without an `id` gets a fresh one, which can never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub username: String,
    pub color: String,
    pub bg_color: String,
    pub message: String,
    /// Milliseconds since Unix epoch.
    pub date: i64,
}

impl ChatEntry {
    /// Build an entry authored by `identity`, stamped with a fresh ID and
    /// the current time.
    #[must_use]
    pub fn new(identity: &Identity, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: identity.username.clone(),
            color: identity.color.clone(),
            bg_color: identity.bg_color.clone(),
            message: message.into(),
            date: now_ms(),
        }
    }

    /// Build the system-authored arrival announcement for `username`.
    #[must_use]
    pub fn arrival(username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: BOT_USERNAME.to_owned(),
            color: BOT_COLOR.to_owned(),
            bg_color: BOT_BG_COLOR.to_owned(),
            message: format!("{username} has entered the chat"),
            date: now_ms(),
        }
    }
}

// =============================================================================
// EVENT
// =============================================================================

/// The universal stream event, tagged by kind.
///
/// Outbound and inbound shapes are identical; `create` and `close` are also
/// received because the poll machine is driven purely by the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    Message(ChatEntry),
    Register(Identity),
    UserLeft { username: String },
    Vote { vote: String, username: String },
    Create { command: String, username: String },
    Close { username: String },
}

// =============================================================================
// TIME
// =============================================================================

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;

//! flamechat — client-side synchronization core for a single-room chat with
//! ephemeral two-option polls overlaid on the message stream.
//!
//! ARCHITECTURE
//! ============
//! The library is the state-synchronization core: session bootstrap and
//! reconciliation, the presence roster, the append-only message log, the
//! poll state machine, and the command interpreter that turns raw chat input
//! into structured events. The binary in `main.rs` wires this core to a real
//! transport (HTTP snapshots + a persistent websocket event stream) and a
//! stdin input loop.
//!
//! DESIGN
//! ======
//! - One inbound `Event` enum, one dispatcher (`Controller::apply_event`).
//!   Handlers run to completion; no state is shared across tasks.
//! - Chat messages are echoed optimistically with client-generated IDs and
//!   deduplicated on receipt. Poll state is never updated optimistically —
//!   the server is the sole serialization point for votes.
//! - Every network failure degrades to last-known-good state and a warning;
//!   nothing here terminates the session.

pub mod command;
pub mod controller;
pub mod event;
pub mod net;
pub mod state;
pub mod token;

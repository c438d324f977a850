//! Network edges: HTTP snapshots/identity operations and the live stream.
//!
//! ARCHITECTURE
//! ============
//! `api` talks to the external session/message/poll store and token service
//! behind the `Backend` trait so the controller can be tested against an
//! in-memory fake; `stream` owns the persistent websocket connection and
//! the select loop that drives the whole session.

pub mod api;
pub mod stream;

//! Sync controller — bootstrap, reconciliation, and event dispatch.
//!
//! ARCHITECTURE
//! ============
//! The controller owns the session state and both directions of the stream:
//! inbound events go through `apply_event` (the single dispatcher), local
//! input goes through `submit_input` (classify, echo, emit). The transport
//! loop in `net::stream` drives it; handlers run to completion, so all
//! mutations are serialized.
//!
//! DESIGN
//! ======
//! Bootstrap fetches the three snapshots concurrently and fails open: a
//! failed fetch is logged and leaves that component empty. Token
//! verification failure falls back to the login prompt, never aborts.
//! Registration announcements race the roster snapshot across sessions, so
//! a one-shot deferred `refresh_roster` absorbs the fan-out as a best-effort
//! self-heal, not a correctness guarantee.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command::{Command, classify};
use crate::event::{ChatEntry, Event, Identity};
use crate::net::api::{ApiError, Backend};
use crate::state::SessionState;
use crate::token::CredentialStore;

/// Fixed delay before the one-shot roster re-fetch after announcing.
pub const ROSTER_REFRESH_DELAY_MS: u64 = 1000;

/// How session bootstrap resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A persisted token verified; the login prompt stays suppressed.
    Authenticated,
    /// No usable token; the login/registration prompt is needed.
    PromptRequired,
}

/// Orchestrates one client session against the remote room server.
pub struct Controller {
    pub state: SessionState,
    backend: Arc<dyn Backend>,
    credentials: CredentialStore,
    outbound: mpsc::UnboundedSender<Event>,
}

impl Controller {
    /// Build a controller and the receiving half of its outbound stream.
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        credentials: CredentialStore,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let controller = Self {
            state: SessionState::new(),
            backend,
            credentials,
            outbound,
        };
        (controller, rx)
    }

    // =========================================================================
    // BOOTSTRAP
    // =========================================================================

    /// Reconcile local state with the shared snapshots, then try the
    /// persisted token. Snapshot failures are non-fatal: the component is
    /// left at its empty initial state.
    pub async fn bootstrap(&mut self) -> BootstrapOutcome {
        let (messages, roster, poll) = tokio::join!(
            self.backend.fetch_messages(),
            self.backend.fetch_roster(),
            self.backend.fetch_poll(),
        );

        match messages {
            Ok(history) => self.state.log.replace_all(history),
            Err(e) => warn!(error = %e, "message history fetch failed; starting empty"),
        }
        match roster {
            Ok(participants) => self.state.roster.replace_all(participants),
            Err(e) => warn!(error = %e, "roster fetch failed; starting empty"),
        }
        match poll {
            Ok(snapshot) => self.state.poll.replace(snapshot),
            Err(e) => warn!(error = %e, "poll fetch failed; assuming no active poll"),
        }

        let Some(token) = self.credentials.load() else {
            return BootstrapOutcome::PromptRequired;
        };
        match self.backend.verify(&token).await {
            Ok(identity) => {
                info!(username = %identity.username, "persisted token verified");
                self.announce(identity);
                BootstrapOutcome::Authenticated
            }
            Err(e) => {
                warn!(error = %e, "token verification failed; falling back to prompt");
                BootstrapOutcome::PromptRequired
            }
        }
    }

    /// Log in through the prompt, persist a fresh token, and announce.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let identity = self.backend.login(username, password).await?;
        self.persist_token(&identity).await;
        self.announce(identity);
        Ok(())
    }

    /// Register a new account, persist a fresh token, and announce.
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
        color: &str,
        bg_color: &str,
    ) -> Result<(), ApiError> {
        let identity = self
            .backend
            .register(username, password, color, bg_color)
            .await?;
        self.persist_token(&identity).await;
        self.announce(identity);
        Ok(())
    }

    /// Ask the token service for a signed token and store it for future
    /// bootstraps. Failure is logged and otherwise ignored: the session
    /// works without a persisted credential.
    async fn persist_token(&self, identity: &Identity) {
        match self.backend.sign(identity).await {
            Ok(token) => {
                if let Err(e) = self.credentials.save(&token) {
                    warn!(error = %e, "failed to persist credential");
                }
            }
            Err(e) => warn!(error = %e, "token signing failed; credential not persisted"),
        }
    }

    /// Adopt a verified identity: register ourselves locally (idempotent),
    /// append the arrival announcement, and emit the announce + register
    /// pair outbound.
    fn announce(&mut self, identity: Identity) {
        let arrival = ChatEntry::arrival(&identity.username);
        self.state.log.append(arrival.clone());
        self.send(Event::Message(arrival));
        self.send(Event::Register(identity.clone()));
        self.state.roster.register(identity.clone());
        self.state.identity = Some(identity);
    }

    /// Re-emit our register event, used after the transport reconnects.
    pub fn reannounce(&mut self) {
        if let Some(identity) = self.state.identity.clone() {
            self.send(Event::Register(identity));
        }
    }

    /// The one-shot deferred roster re-fetch. Fail-open: on error the
    /// roster keeps its last-known value.
    pub async fn refresh_roster(&mut self) {
        match self.backend.fetch_roster().await {
            Ok(participants) => self.state.roster.replace_all(participants),
            Err(e) => warn!(error = %e, "deferred roster refresh failed; keeping current roster"),
        }
    }

    // =========================================================================
    // EVENT DISPATCH
    // =========================================================================

    /// Route one inbound stream event to the component that owns it.
    ///
    /// Chat messages dedup against the optimistic echo; poll transitions
    /// are applied here and only here — the server is the tally authority.
    pub fn apply_event(&mut self, event: Event) {
        match event {
            Event::Message(entry) => {
                self.state.log.append(entry);
            }
            Event::Register(identity) => self.state.roster.register(identity),
            Event::UserLeft { username } => self.state.roster.remove(&username),
            Event::Vote { vote, username } => {
                self.state.poll.apply_vote(&vote, &username);
            }
            Event::Create { command, username } => {
                info!(%username, "poll created");
                self.state.poll.create(&command);
            }
            Event::Close { username } => {
                info!(%username, "poll closed");
                self.state.poll.close();
            }
        }
    }

    // =========================================================================
    // LOCAL INPUT
    // =========================================================================

    /// Classify one line of local input and dispatch it. Plain messages are
    /// echoed optimistically; poll commands go out without touching local
    /// poll state. Input before authentication is dropped with a warning.
    pub fn submit_input(&mut self, line: &str) {
        let Some(identity) = self.state.identity.clone() else {
            warn!("input ignored: not authenticated yet");
            return;
        };
        let username = identity.username.clone();

        match classify(line, self.state.poll.active()) {
            None => {}
            Some(Command::CreatePoll { command }) => {
                self.send(Event::Create { command, username });
            }
            Some(Command::ClosePoll) => self.send(Event::Close { username }),
            Some(Command::Vote { vote }) => self.send(Event::Vote { vote, username }),
            Some(Command::Say { message }) => {
                let entry = ChatEntry::new(&identity, message);
                self.state.log.append(entry.clone());
                self.send(Event::Message(entry));
            }
        }
    }

    fn send(&self, event: Event) {
        if self.outbound.send(event).is_err() {
            warn!("outbound channel closed; event dropped");
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

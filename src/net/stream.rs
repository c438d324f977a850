//! Live event stream — the persistent websocket loop.
//!
//! DESIGN
//! ======
//! One `select!` loop drives the whole session: inbound stream events are
//! parsed and handed to the controller's dispatcher, outbound events are
//! serialized onto the socket, local input lines go through the command
//! interpreter, and the single deferred roster-refresh timer fires at most
//! once. Handlers run to completion before the next arm is polled, which is
//! what makes state mutations atomic with respect to each other.
//!
//! The connection reconnects with exponential backoff (1s doubling to a
//! 10s cap) and re-announces the known identity after each reconnect.
//! Malformed inbound frames are logged and skipped, never fatal.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

use crate::controller::{Controller, ROSTER_REFRESH_DELAY_MS};
use crate::event::Event;

/// Initial reconnect backoff.
pub const RECONNECT_MIN_MS: u64 = 1000;

/// Backoff ceiling.
pub const RECONNECT_MAX_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket send failed: {0}")]
    Send(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("event encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Derive the stream endpoint from the HTTP base URL.
pub fn ws_url(base_url: &str) -> Result<String, StreamError> {
    let base = base_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/stream"));
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/stream"));
    }
    Err(StreamError::InvalidBaseUrl(base_url.to_owned()))
}

/// Why one connection ended.
enum Disconnect {
    /// The transport dropped; reconnect.
    Lost,
    /// Local input closed; the session is over.
    InputClosed,
}

/// Run the session's event loop until local input closes.
///
/// `refresh_roster` arms the one-shot deferred roster re-fetch that absorbs
/// the registration fan-out race after an authenticated bootstrap.
/// `on_event` is invoked for every applied inbound event so the caller can
/// render without the core knowing how.
pub async fn run(
    base_url: &str,
    controller: &mut Controller,
    outbound: &mut mpsc::UnboundedReceiver<Event>,
    input: &mut mpsc::UnboundedReceiver<String>,
    mut refresh_roster: bool,
    on_event: &mut dyn FnMut(&Event),
) -> Result<(), StreamError> {
    let url = ws_url(base_url)?;
    let mut backoff_ms = RECONNECT_MIN_MS;
    let mut reconnected = false;

    loop {
        match connect_and_run(&url, controller, outbound, input, &mut refresh_roster, reconnected, on_event).await {
            Ok(Disconnect::InputClosed) => {
                info!("input closed; session over");
                return Ok(());
            }
            Ok(Disconnect::Lost) => {
                info!("stream disconnected");
                backoff_ms = RECONNECT_MIN_MS;
            }
            Err(e) => warn!(error = %e, "stream failed"),
        }

        reconnected = true;
        sleep(Duration::from_millis(backoff_ms)).await;
        backoff_ms = (backoff_ms * 2).min(RECONNECT_MAX_MS);
    }
}

/// One connection: connect, optionally re-announce, then loop until the
/// transport drops or input closes.
async fn connect_and_run(
    url: &str,
    controller: &mut Controller,
    outbound: &mut mpsc::UnboundedReceiver<Event>,
    input: &mut mpsc::UnboundedReceiver<String>,
    refresh_roster: &mut bool,
    reannounce: bool,
    on_event: &mut dyn FnMut(&Event),
) -> Result<Disconnect, StreamError> {
    let (stream, _) = connect_async(url)
        .await
        .map_err(|e| StreamError::Connect(Box::new(e)))?;
    let (mut sink, mut source) = stream.split();
    info!(%url, "stream connected");

    if reannounce {
        controller.reannounce();
    }

    let refresh = sleep(Duration::from_millis(ROSTER_REFRESH_DELAY_MS));
    tokio::pin!(refresh);

    loop {
        tokio::select! {
            msg = source.next() => {
                let Some(msg) = msg else { return Ok(Disconnect::Lost) };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(error = %e, "stream receive error");
                        return Ok(Disconnect::Lost);
                    }
                };
                match msg {
                    Message::Text(text) => apply_text(controller, &text, on_event),
                    Message::Close(_) => return Ok(Disconnect::Lost),
                    _ => {}
                }
            }
            Some(event) = outbound.recv() => {
                let json = serde_json::to_string(&event)?;
                sink.send(Message::Text(json.into()))
                    .await
                    .map_err(|e| StreamError::Send(Box::new(e)))?;
            }
            line = input.recv() => {
                let Some(line) = line else { return Ok(Disconnect::InputClosed) };
                controller.submit_input(&line);
            }
            () = &mut refresh, if *refresh_roster => {
                *refresh_roster = false;
                controller.refresh_roster().await;
            }
        }
    }
}

/// Parse and apply one inbound frame. Malformed payloads are skipped.
fn apply_text(controller: &mut Controller, text: &str, on_event: &mut dyn FnMut(&Event)) {
    match serde_json::from_str::<Event>(text) {
        Ok(event) => {
            on_event(&event);
            controller.apply_event(event);
        }
        Err(e) => warn!(error = %e, "ignoring malformed stream event"),
    }
}

#[cfg(test)]
#[path = "stream_test.rs"]
mod tests;

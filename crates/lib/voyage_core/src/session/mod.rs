//! Client-side conversation state.
//!
//! [`Conversation`] holds the transcript, the text being typed, the in-flight
//! flag and the map center. [`SessionHandle`] owns one on an actor task and
//! serializes every mutation through a command queue.

mod actor;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::gazetteer::{self, Coordinates, DEFAULT_CENTER, Entry};
use crate::message::Message;
use crate::relay::{Relay, RelayError};

pub use actor::SessionHandle;

/// First assistant message of every session.
pub const GREETING: &str = "Bonjour ! Où souhaitez-vous voyager ?";

/// Assistant message appended when the relay fails, whatever the cause.
pub const APOLOGY: &str = "Désolé, une erreur s'est produite. Veuillez réessayer.";

/// Errors surfaced by the session itself (not by the relay).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A message is already being sent")]
    Busy,

    #[error("Session is closed")]
    Closed,
}

/// Something that can turn a transcript into an assistant reply.
#[async_trait]
pub trait ChatRelay: Send + Sync + 'static {
    async fn send(&self, messages: Vec<Message>) -> Result<String, RelayError>;
}

#[async_trait]
impl ChatRelay for Relay {
    async fn send(&self, messages: Vec<Message>) -> Result<String, RelayError> {
        self.relay(&messages).await
    }
}

/// Result of a submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// The reply was appended to the transcript.
    Replied(String),
    /// The relay failed; the apology was appended.
    Failed(RelayError),
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub transcript: Vec<Message>,
    pub pending_input: String,
    pub in_flight: bool,
    pub map_center: Coordinates,
}

/// Conversation state machine. Not synchronized; see [`SessionHandle`].
#[derive(Debug, Clone)]
pub struct Conversation {
    transcript: Vec<Message>,
    pending_input: String,
    in_flight: bool,
    map_center: Coordinates,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            transcript: vec![Message::assistant(GREETING)],
            pending_input: String::new(),
            in_flight: false,
            map_center: DEFAULT_CENTER,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn map_center(&self) -> Coordinates {
        self.map_center
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Start a submission.
    ///
    /// Returns `Ok(None)` for blank input, otherwise appends the user message,
    /// marks the conversation in flight and returns the transcript to send.
    pub fn begin_submit(&mut self, input: &str) -> Result<Option<Vec<Message>>, SessionError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        if self.in_flight {
            return Err(SessionError::Busy);
        }

        self.transcript.push(Message::user(input));
        self.pending_input.clear();
        self.in_flight = true;
        Ok(Some(self.transcript.clone()))
    }

    /// Finish the submission started with `input`.
    ///
    /// Appends the reply (or the apology), clears the in-flight flag and
    /// re-centers the map from the user's own text.
    pub fn finish_submit(
        &mut self,
        input: &str,
        result: Result<String, RelayError>,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(reply) => {
                self.transcript.push(Message::assistant(reply.clone()));
                SubmitOutcome::Replied(reply)
            }
            Err(e) => {
                warn!(error = %e, status = ?e.upstream_status(), "relay failed");
                self.transcript.push(Message::assistant(APOLOGY));
                SubmitOutcome::Failed(e)
            }
        };
        self.in_flight = false;
        self.hint_location(input);
        outcome
    }

    /// Move the map center to the first known place mentioned in `text`.
    pub fn hint_location(&mut self, text: &str) -> Option<&'static Entry> {
        let entry = gazetteer::locate(text)?;
        debug!(place = entry.name, "map center updated");
        self.map_center = entry.coordinates;
        Some(entry)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            transcript: self.transcript.clone(),
            pending_input: self.pending_input.clone(),
            in_flight: self.in_flight,
            map_center: self.map_center,
        }
    }
}

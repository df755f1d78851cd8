//! Session actor.
//!
//! All state changes happen on one task. Relay calls run on their own task
//! and report back through a completion channel, so snapshots are answered
//! while a call is in flight. A submission arriving during a call is rejected
//! with [`SessionError::Busy`].

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::{ChatRelay, Conversation, SessionError, Snapshot, SubmitOutcome};
use crate::relay::RelayError;

const COMMAND_BUFFER: usize = 32;

type SubmitReply = oneshot::Sender<Result<SubmitOutcome, SessionError>>;

enum Command {
    Submit { input: String, reply: SubmitReply },
    SetPendingInput(String),
    Snapshot(oneshot::Sender<Snapshot>),
}

struct Finished {
    input: String,
    result: Result<String, RelayError>,
    reply: SubmitReply,
}

/// Cloneable handle to a running session. The actor stops once every handle
/// is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Spawn a fresh session on the current tokio runtime.
    pub fn spawn(relay: Arc<dyn ChatRelay>) -> Self {
        Self::spawn_with(Conversation::new(), relay)
    }

    pub fn spawn_with(conversation: Conversation, relay: Arc<dyn ChatRelay>) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run(conversation, relay, rx));
        Self { commands }
    }

    /// Submit user input and wait for the turn to complete.
    pub async fn submit(&self, input: impl Into<String>) -> Result<SubmitOutcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit {
            input: input.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn set_pending_input(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::SetPendingInput(text.into())).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

async fn run(
    mut conversation: Conversation,
    relay: Arc<dyn ChatRelay>,
    mut commands: mpsc::Receiver<Command>,
) {
    let (done_tx, mut done_rx) = mpsc::channel::<Finished>(1);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Submit { input, reply } => match conversation.begin_submit(&input) {
                        Ok(Some(outbound)) => {
                            let relay = relay.clone();
                            let done = done_tx.clone();
                            tokio::spawn(async move {
                                let result = relay.send(outbound).await;
                                let _ = done.send(Finished { input, result, reply }).await;
                            });
                        }
                        Ok(None) => {
                            let _ = reply.send(Ok(SubmitOutcome::Ignored));
                        }
                        Err(e) => {
                            debug!("submission rejected: {e}");
                            let _ = reply.send(Err(e));
                        }
                    },
                    Command::SetPendingInput(text) => conversation.set_pending_input(text),
                    Command::Snapshot(reply) => {
                        let _ = reply.send(conversation.snapshot());
                    }
                }
            }
            Some(finished) = done_rx.recv() => {
                let outcome = conversation.finish_submit(&finished.input, finished.result);
                let _ = finished.reply.send(Ok(outcome));
            }
        }
    }

    debug!("session closed");
}

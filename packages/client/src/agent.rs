//! Chat agent: one named participant with its own Lamport clock.
//!
//! The agent owns the joined flag of its session. The flag is shared only
//! with the receive task spawned for the current Join stream, so two agents
//! in the same process never observe each other's state.

use std::sync::Arc;

use chittychat_shared::{
    clock::{LamportClock, LogicalTimestamp},
    protocol::{BroadcastAck, LeaveAck},
};
use futures_util::StreamExt;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

use crate::{
    command::{Command, parse_command, validate_input},
    domain::{ReconnectPolicy, should_attempt_reconnect},
    error::ClientError,
    transport::{NotificationStream, RoomTransport},
};

/// A notification after it was merged into the local clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedNotification {
    pub text: String,
    /// Server timestamp carried by the notification
    pub timestamp: LogicalTimestamp,
    /// Local clock right after the merge
    pub local_clock: LogicalTimestamp,
}

/// Output produced by the receive task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    Received(ReceivedNotification),
    /// The server closed the stream while the agent still considered itself joined
    StreamEnded,
    StreamFailed(String),
}

/// What a handled prompt line resulted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Joined,
    Sent(BroadcastAck),
    Left(LeaveAck),
    Quit,
}

#[derive(Debug, Default)]
struct Session {
    joined: bool,
    /// Set while a Leave is in flight; the server closes the stream before
    /// the Leave is acknowledged.
    leaving: bool,
    /// Bumped on every successful join so a stale receive task cannot clear
    /// the flag of a newer session.
    generation: u64,
}

pub struct ChatAgent {
    name: String,
    clock: Arc<LamportClock>,
    session: Arc<Mutex<Session>>,
    transport: Arc<dyn RoomTransport>,
    events: mpsc::UnboundedSender<AgentEvent>,
    reconnect_policy: ReconnectPolicy,
    receive_task: Option<JoinHandle<()>>,
}

impl ChatAgent {
    pub fn new(
        name: impl Into<String>,
        transport: Arc<dyn RoomTransport>,
        events: mpsc::UnboundedSender<AgentEvent>,
    ) -> Self {
        Self {
            name: name.into(),
            clock: Arc::new(LamportClock::new()),
            session: Arc::new(Mutex::new(Session::default())),
            transport,
            events,
            reconnect_policy: ReconnectPolicy::default(),
            receive_task: None,
        }
    }

    pub fn with_reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clock(&self) -> LogicalTimestamp {
        self.clock.current()
    }

    pub async fn is_joined(&self) -> bool {
        self.session.lock().await.joined
    }

    /// Interpret one prompt line.
    ///
    /// Length is checked before the line is parsed, so an over-long line is
    /// rejected even if it starts like a command.
    pub async fn handle_line(&mut self, line: &str) -> Result<LineOutcome, ClientError> {
        validate_input(line)?;

        match parse_command(line) {
            Command::Join => self.join().await.map(|_| LineOutcome::Joined),
            Command::Leave => self.leave().await.map(LineOutcome::Left),
            Command::Quit => Ok(LineOutcome::Quit),
            Command::Message(message) => self.send(&message).await.map(LineOutcome::Sent),
        }
    }

    /// Open the Join stream and start consuming it in the background.
    ///
    /// Join carries the current clock without a local increment.
    /// Connection failures are retried according to the reconnect policy.
    pub async fn join(&mut self) -> Result<(), ClientError> {
        if self.is_joined().await {
            return Err(ClientError::AlreadyJoined);
        }

        let policy = self.reconnect_policy;
        let mut attempt = 1;
        let stream = loop {
            let timestamp = self.clock.current();
            tracing::info!(
                "Joining as '{}' at lamport time {} (attempt {}/{})",
                self.name,
                timestamp,
                attempt,
                policy.max_attempts
            );

            match self.transport.join(&self.name, timestamp).await {
                Ok(stream) => break stream,
                Err(e) if should_attempt_reconnect(&e, attempt, policy.max_attempts) => {
                    tracing::warn!(
                        "Join failed: {}. Retrying in {} seconds...",
                        e,
                        policy.interval.as_secs()
                    );
                    attempt += 1;
                    tokio::time::sleep(policy.interval).await;
                }
                Err(e) => {
                    tracing::error!("Join failed after {} attempt(s): {}", attempt, e);
                    return Err(e);
                }
            }
        };

        let generation = {
            let mut session = self.session.lock().await;
            session.generation += 1;
            session.joined = true;
            session.generation
        };

        self.receive_task = Some(tokio::spawn(receive_notifications(
            stream,
            generation,
            self.clock.clone(),
            self.session.clone(),
            self.events.clone(),
        )));
        Ok(())
    }

    /// Publish a chat message, stamped after a local increment.
    pub async fn send(&self, message: &str) -> Result<BroadcastAck, ClientError> {
        validate_input(message)?;
        if !self.is_joined().await {
            return Err(ClientError::NotJoined);
        }

        let timestamp = self.clock.tick();
        tracing::debug!("Broadcasting at lamport time {}", timestamp);
        self.transport
            .broadcast(&self.name, message, timestamp)
            .await
    }

    /// Leave the room, stamped after a local increment.
    ///
    /// The Join stream keeps running until the server closes it, so the
    /// agent still sees its own "left" notification.
    pub async fn leave(&self) -> Result<LeaveAck, ClientError> {
        if !self.is_joined().await {
            return Err(ClientError::NotJoined);
        }

        self.session.lock().await.leaving = true;
        let timestamp = self.clock.tick();
        let result = self.transport.leave(&self.name, timestamp).await;

        let mut session = self.session.lock().await;
        session.leaving = false;
        let ack = result?;
        session.joined = false;
        tracing::info!("Left the chat room at server time {}", ack.timestamp);
        Ok(ack)
    }

    /// Leave if still joined, then stop the receive task.
    pub async fn shutdown(&mut self) {
        if self.is_joined().await
            && let Err(e) = self.leave().await
        {
            tracing::warn!("Failed to leave before exiting: {}", e);
        }

        if let Some(task) = self.receive_task.take() {
            task.abort();
        }
    }
}

async fn receive_notifications(
    mut stream: NotificationStream,
    generation: u64,
    clock: Arc<LamportClock>,
    session: Arc<Mutex<Session>>,
    events: mpsc::UnboundedSender<AgentEvent>,
) {
    let end = loop {
        match stream.next().await {
            Some(Ok(notification)) => {
                let timestamp = LogicalTimestamp::new(notification.timestamp);
                let local_clock = clock.merge(timestamp);
                tracing::debug!(
                    "Received notification at {} (local clock {})",
                    timestamp,
                    local_clock
                );
                let event = AgentEvent::Received(ReceivedNotification {
                    text: notification.text,
                    timestamp,
                    local_clock,
                });
                if events.send(event).is_err() {
                    return;
                }
            }
            Some(Err(e)) => {
                tracing::warn!("Notification stream failed: {}", e);
                break AgentEvent::StreamFailed(e.to_string());
            }
            None => break AgentEvent::StreamEnded,
        }
    };

    let mut session = session.lock().await;
    if session.generation != generation || !session.joined {
        return;
    }
    session.joined = false;
    let leaving = session.leaving;
    drop(session);
    if !leaving {
        events.send(end).ok();
    }
}

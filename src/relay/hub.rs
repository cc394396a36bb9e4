// ABOUTME: Relay event loop owning the store and the cloneable handle used to drive it
// ABOUTME: Serializes every connect, join, publish, and disconnect through one command queue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! The relay hub.
//!
//! [`RelayHub::spawn`] moves a [`RelayStore`] into a dedicated task. Callers
//! talk to it through a [`RelayHandle`], which sends a [`Command`] and waits
//! on a oneshot reply. Commands are applied one at a time in arrival order.

use super::store::{BufferPolicy, ConnectionId, Outbox, PublishOutcome, RelayStats, RelayStore};
use crate::constants::relay::COMMAND_CHANNEL_CAPACITY;
use crate::errors::{AppError, AppResult};
use crate::models::{Notification, NotificationDraft, Role};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Reply<T> = oneshot::Sender<T>;

/// Requests accepted by the relay event loop
#[derive(Debug)]
pub enum Command {
    /// Register a connection and queue its snapshot
    Connect {
        /// Connect-time role hint, possibly unknown
        role_hint: String,
        /// Outbound queue for the new connection
        outbox: Outbox,
        /// Receives the assigned connection id
        reply: Reply<ConnectionId>,
    },
    /// Add a connection to a role group
    Join {
        /// Connection joining
        connection_id: ConnectionId,
        /// Role joined
        role: Role,
        /// Receives whether membership was new
        reply: Reply<AppResult<bool>>,
    },
    /// Store and fan out a notification
    Publish {
        /// Validated notification without identity
        draft: NotificationDraft,
        /// Receives the stored notification
        reply: Reply<PublishOutcome>,
    },
    /// Read buffered notifications for a role
    Snapshot {
        /// Role to filter by
        role: Role,
        /// Receives the notifications
        reply: Reply<Vec<Notification>>,
    },
    /// Read relay counters
    Stats {
        /// Receives the counters
        reply: Reply<RelayStats>,
    },
    /// Forget a connection
    Disconnect {
        /// Connection leaving
        connection_id: ConnectionId,
    },
}

/// Owner of the relay event loop
pub struct RelayHub {
    store: RelayStore,
    commands: mpsc::Receiver<Command>,
}

impl RelayHub {
    /// Start the event loop and return a handle to it
    ///
    /// The loop stops once every [`RelayHandle`] has been dropped.
    #[must_use]
    pub fn spawn(policy: BufferPolicy) -> (RelayHandle, JoinHandle<()>) {
        let (sender, commands) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let hub = Self {
            store: RelayStore::new(policy),
            commands,
        };
        info!(?policy, "Starting notification relay");
        let task = tokio::spawn(hub.run());
        (RelayHandle { sender }, task)
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.dispatch(command);
        }
        info!("Notification relay stopped");
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Connect {
                role_hint,
                outbox,
                reply,
            } => {
                let connection_id = self.store.connect(&role_hint, outbox);
                if reply.send(connection_id).is_err() {
                    // Caller gave up before the reply; drop the registration
                    self.store.disconnect(connection_id);
                }
            }
            Command::Join {
                connection_id,
                role,
                reply,
            } => {
                let result = self.store.join(connection_id, role);
                Self::respond(reply, result);
            }
            Command::Publish { draft, reply } => {
                let outcome = self.store.publish(draft);
                Self::respond(reply, outcome);
            }
            Command::Snapshot { role, reply } => {
                Self::respond(reply, self.store.snapshot(role));
            }
            Command::Stats { reply } => {
                Self::respond(reply, self.store.stats());
            }
            Command::Disconnect { connection_id } => {
                self.store.disconnect(connection_id);
            }
        }
    }

    fn respond<T>(reply: Reply<T>, value: T) {
        if reply.send(value).is_err() {
            debug!("Relay caller dropped before reply");
        }
    }
}

/// Cloneable entry point into the relay event loop
#[derive(Debug, Clone)]
pub struct RelayHandle {
    sender: mpsc::Sender<Command>,
}

impl RelayHandle {
    /// Register a streaming connection
    ///
    /// The connection's snapshot for `role_hint` is queued on `outbox` before
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay event loop is no longer running.
    pub async fn connect(&self, role_hint: &str, outbox: Outbox) -> AppResult<ConnectionId> {
        self.request(|reply| Command::Connect {
            role_hint: role_hint.to_owned(),
            outbox,
            reply,
        })
        .await
    }

    /// Subscribe a connection to a role's future broadcasts
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is unknown or the relay is stopped.
    pub async fn join(&self, connection_id: ConnectionId, role: Role) -> AppResult<bool> {
        self.request(|reply| Command::Join {
            connection_id,
            role,
            reply,
        })
        .await?
    }

    /// Store a notification and broadcast it to its role group
    ///
    /// # Errors
    ///
    /// Returns an error if the relay event loop is no longer running.
    pub async fn publish(&self, draft: NotificationDraft) -> AppResult<PublishOutcome> {
        self.request(|reply| Command::Publish { draft, reply }).await
    }

    /// Buffered notifications for a role
    ///
    /// # Errors
    ///
    /// Returns an error if the relay event loop is no longer running.
    pub async fn snapshot(&self, role: Role) -> AppResult<Vec<Notification>> {
        self.request(|reply| Command::Snapshot { role, reply }).await
    }

    /// Relay counters
    ///
    /// # Errors
    ///
    /// Returns an error if the relay event loop is no longer running.
    pub async fn stats(&self) -> AppResult<RelayStats> {
        self.request(|reply| Command::Stats { reply }).await
    }

    /// Remove a connection from every role group
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        if self
            .sender
            .send(Command::Disconnect { connection_id })
            .await
            .is_err()
        {
            warn!(connection_id, "Relay stopped before disconnect was recorded");
        }
    }

    /// Whether the event loop is still accepting commands
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> AppResult<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| AppError::unavailable("Notification relay is not running"))?;
        response
            .await
            .map_err(|_| AppError::unavailable("Notification relay dropped the request"))
    }
}

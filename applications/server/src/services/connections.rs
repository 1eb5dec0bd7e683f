/// Connection lifecycle - the fan-out set of connected clients
use crate::protocol::Envelope;
use lockstep_core::ConnectionId;
use std::collections::HashMap;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Outbound queues of every connected client
///
/// Sends never wait: each client has a bounded buffer, and a client that cannot keep up
/// (buffer full) or has gone away (receiver dropped) is removed on the spot. Its
/// socket then closes and it rejoins with a fresh snapshot.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    senders: HashMap<ConnectionId, mpsc::Sender<Envelope>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client with an outbound buffer of `capacity` messages
    pub fn register(&mut self, capacity: usize) -> (ConnectionId, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let id = ConnectionId::generate();
        self.senders.insert(id.clone(), tx);
        (id, rx)
    }

    /// Drop a client from the fan-out set; returns whether it was present
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        self.senders.remove(id).is_some()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.senders.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Enqueue a message for one client
    ///
    /// Returns `false` if the client is unknown or was dropped for failing to accept it.
    pub fn unicast(&mut self, id: &ConnectionId, envelope: Envelope) -> bool {
        let Some(sender) = self.senders.get(id) else {
            tracing::debug!(connection = %id, "Unicast to unknown connection");
            return false;
        };

        match sender.try_send(envelope) {
            Ok(()) => true,
            Err(err) => {
                Self::log_send_failure(id, &err);
                self.senders.remove(id);
                false
            }
        }
    }

    /// Enqueue a message for every client, in registry order
    ///
    /// Returns the number of clients the message was enqueued for.
    pub fn broadcast(&mut self, envelope: &Envelope) -> usize {
        let mut delivered = 0;
        let mut failed = Vec::new();

        for (id, sender) in &self.senders {
            match sender.try_send(envelope.clone()) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    Self::log_send_failure(id, &err);
                    failed.push(id.clone());
                }
            }
        }

        for id in failed {
            self.senders.remove(&id);
        }

        delivered
    }

    fn log_send_failure(id: &ConnectionId, err: &TrySendError<Envelope>) {
        match err {
            TrySendError::Full(_) => {
                tracing::warn!(connection = %id, "Outbound buffer full, dropping client");
            }
            TrySendError::Closed(_) => {
                tracing::debug!(connection = %id, "Client went away, removing");
            }
        }
    }
}

//! Auth-state publish/subscribe.
//!
//! Components that care about login state subscribe here instead of reading
//! ambient global state. Payloads are typed, every subscriber gets a copy of
//! every change, and unsubscription is deterministic: dropping the
//! [`Subscription`] is enough, dead subscribers are pruned on the next
//! publish.

use std::sync::{Mutex, mpsc};
use std::time::Duration;

use crate::auth::IdentityUser;

/// The payload delivered on every auth-state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStateChange {
    /// `Some` after sign-in / user refresh, `None` after sign-out.
    pub user: Option<IdentityUser>,
}

/// A subscription to auth-state changes.
///
/// Designed for single-threaded consumption; drop it on teardown to
/// unsubscribe.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<AuthStateChange>,
}

impl Subscription {
    pub fn new(receiver: mpsc::Receiver<AuthStateChange>) -> Self {
        Self { receiver }
    }

    /// Block until the next change is available.
    pub fn recv(&self) -> Result<AuthStateChange, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a change without blocking.
    pub fn try_recv(&self) -> Result<AuthStateChange, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a change.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<AuthStateChange, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Publisher side of the auth-state store.
pub trait AuthBus: Send + Sync {
    fn publish(&self, change: AuthStateChange);

    fn subscribe(&self) -> Subscription;
}

/// In-memory auth-state bus.
///
/// Best-effort fan-out; subscribers whose receiver was dropped are removed
/// while publishing.
#[derive(Debug, Default)]
pub struct InMemoryAuthBus {
    subscribers: Mutex<Vec<mpsc::Sender<AuthStateChange>>>,
}

impl InMemoryAuthBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthBus for InMemoryAuthBus {
    fn publish(&self, change: AuthStateChange) {
        if let Ok(mut subs) = self.subscribers.lock() {
            // Drop any dead subscribers while publishing.
            subs.retain(|tx| tx.send(change.clone()).is_ok());
        }
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

//! Action channel between terminal events, async work and the app reducer
//!
//! Key handlers and finished commands only send actions; a single
//! long-running handler owns the receiver and applies them in order.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Unbounded so that key handlers never block the render loop
pub struct ActionChannel<A> {
    tx: UnboundedSender<A>,
    rx: Arc<Mutex<UnboundedReceiver<A>>>,
}

impl<A> Clone for ActionChannel<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<A: Send + 'static> Default for ActionChannel<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Send + 'static> ActionChannel<A> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Queue an action. Returns false once the consumer is gone.
    pub fn send(&self, action: A) -> bool {
        self.tx.send(action).is_ok()
    }

    pub fn sender(&self) -> UnboundedSender<A> {
        self.tx.clone()
    }

    /// Shared receiver; the consumer holds the lock for its whole lifetime
    pub fn receiver(&self) -> Arc<Mutex<UnboundedReceiver<A>>> {
        self.rx.clone()
    }
}

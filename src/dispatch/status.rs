//! Status sink

use std::sync::Arc;

use tokio::sync::watch;

pub const READY_MESSAGE: &str = "SwitchBot Controller Ready";

/// Destination for human-readable outcomes. Keeps no history.
pub trait StatusSink: Send + Sync {
    fn publish(&self, message: String);
}

/// Latest status message, shared between the panel API and dispatch tasks
#[derive(Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<String>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(READY_MESSAGE.to_string());
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for StatusBoard {
    fn publish(&self, message: String) {
        // send_replace works with no receivers attached
        self.tx.send_replace(message);
    }
}

//! Shutdown coordination.
//!
//! One [`Shutdown`] per process. Every long-running task holds a
//! [`ShutdownListener`] and stops once it resolves. A listener created after
//! the trigger, or whose coordinator was dropped, resolves immediately.

use tokio::sync::broadcast;

use crate::lifecycle::signals::shutdown_signal;

pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
            fired: false,
        }
    }

    /// Wake every listener. Safe to call with none left.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger on SIGINT or SIGTERM.
    pub async fn trigger_on_signal(&self) {
        shutdown_signal().await;
        tracing::info!(listeners = self.tx.receiver_count(), "Shutting down");
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// A task's handle on the shutdown broadcast.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: broadcast::Receiver<()>,
    fired: bool,
}

impl ShutdownListener {
    /// Resolves once shutdown has been requested. Returns immediately on
    /// every later call.
    pub async fn recv(&mut self) {
        if !self.fired {
            // A closed channel means the coordinator is gone: stop as well.
            let _ = self.rx.recv().await;
            self.fired = true;
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.fired
    }

    /// A second listener for a spawned child task.
    pub fn resubscribe(&self) -> Self {
        Self {
            rx: self.rx.resubscribe(),
            fired: self.fired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_all_listeners() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut sweeper = server.resubscribe();

        shutdown.trigger();
        server.recv().await;
        sweeper.recv().await;
        assert!(server.is_shutdown() && sweeper.is_shutdown());

        // Resolved listeners stay resolved.
        server.recv().await;
        assert!(server.resubscribe().is_shutdown());
    }

    #[tokio::test]
    async fn test_dropped_coordinator_releases_listeners() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        drop(shutdown);

        tokio::time::timeout(Duration::from_secs(1), listener.recv())
            .await
            .unwrap();
        assert!(listener.is_shutdown());
    }

    #[tokio::test]
    async fn test_pending_until_triggered() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();

        let waited = tokio::time::timeout(Duration::from_millis(20), listener.recv()).await;
        assert!(waited.is_err());
        assert!(!listener.is_shutdown());

        shutdown.trigger();
        listener.recv().await;
        assert!(listener.is_shutdown());
    }

    #[test]
    fn test_trigger_without_listeners() {
        Shutdown::default().trigger();
    }
}

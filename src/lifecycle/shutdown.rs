//! Shutdown coordination for both services.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Every server subscribes before it starts serving; one `trigger` stops them all.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One subscriber's view of the shutdown broadcast.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Resolves once shutdown is triggered or the coordinator is gone.
    pub async fn recv(mut self) {
        let _ = self.rx.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let first = tokio::spawn(shutdown.subscribe().recv());
        let second = tokio::spawn(shutdown.subscribe().recv());

        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), async {
            first.await.unwrap();
            second.await.unwrap();
        })
        .await
        .expect("subscribers should observe the trigger");
    }

    #[tokio::test]
    async fn test_dropped_coordinator_releases_subscribers() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        drop(shutdown);

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("signal should resolve once the sender is gone");
    }
}

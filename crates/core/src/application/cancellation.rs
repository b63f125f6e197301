// Listing cancellation token

use tokio::sync::watch;

/// Cancellation flag observed by a running listing job
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for cancellation
    ///
    /// Never resolves if every signal is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let closed = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Cancellation sender
#[derive(Clone)]
pub struct CancelSignal {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    /// Request cancellation; returns false if it was already requested
    pub fn cancel(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Create a cancellation channel
pub fn cancellation_channel() -> (CancelSignal, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (
        CancelSignal {
            tx: std::sync::Arc::new(tx),
        },
        CancelToken { rx },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cancel_is_idempotent() {
        let (signal, token) = cancellation_channel();
        assert!(!token.is_cancelled());
        assert!(signal.cancel());
        assert!(!signal.cancel());
        assert!(token.is_cancelled());
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_signal() {
        let (signal, mut token) = cancellation_channel();
        let waiter = tokio::spawn(async move {
            token.cancelled().await;
        });
        signal.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("token did not observe cancellation")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_signal_does_not_cancel() {
        let (signal, mut token) = cancellation_channel();
        drop(signal);
        let waited = tokio::time::timeout(Duration::from_secs(5), token.cancelled()).await;
        assert!(waited.is_err());
        assert!(!token.is_cancelled());
    }
}

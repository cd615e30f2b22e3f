use std::time::Duration;
use tokio::sync::watch;

#[derive(Clone)]
pub struct CancellationToken {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    pub fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { receiver: rx })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    // A dropped sender means nobody can cancel any more, so wait forever.
    pub async fn cancelled(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Sleeps for `duration` unless cancelled first. Returns `true` when the
    /// sleep was cut short by cancellation.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = self.cancelled() => true,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        let (_, rx) = watch::channel(false);
        Self { receiver: rx }
    }
}

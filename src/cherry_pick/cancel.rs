//! Caller-owned cancellation for pipeline operations
//!
//! A [`Cancellation`] is a cheap, cloneable signal that fires when its
//! [`CancelHandle`] is triggered or when an optional deadline passes. Host
//! calls in the pipeline and both probe polling sleeps race against it. The
//! probe create and close are the exceptions: they run to completion under
//! their own timeout so an opened probe is always closed again.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Trigger side of a cancellation pair
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Fire the signal; every clone of the paired [`Cancellation`] observes it
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observing side of a cancellation pair
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Create a linked handle and signal
    pub fn new() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Self { rx, deadline: None })
    }

    /// A signal that never fires
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx, deadline: None }
    }

    /// Also fire once `timeout` has elapsed from now
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Whether the signal has already fired
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolve when the signal fires; pends forever if it never can
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let flag = async move {
            loop {
                if *rx.borrow_and_update() {
                    return;
                }
                if rx.changed().await.is_err() {
                    // Handle dropped without firing
                    std::future::pending::<()>().await;
                }
            }
        };

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = flag => {}
                    () = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => flag.await,
        }
    }

    /// Run `fut` unless the signal fires first
    ///
    /// `operation` names what was abandoned in the resulting [`Error::Cancelled`].
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(Error::Cancelled(operation.to_string()));
        }
        tokio::select! {
            result = fut => result,
            () = self.cancelled() => Err(Error::Cancelled(operation.to_string())),
        }
    }

    /// Sleep for `delay` unless the signal fires first
    pub async fn sleep(&self, operation: &str, delay: Duration) -> Result<()> {
        self.run(operation, async {
            tokio::time::sleep(delay).await;
            Ok(())
        })
        .await
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::never()
    }
}

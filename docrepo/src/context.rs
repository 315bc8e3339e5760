//! Cancellable, deadline-bearing execution context for repository operations.

use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::future::{pending, Future};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Execution context passed as the first argument of every repository operation.
///
/// A context optionally carries a deadline and a cancellation signal. When either
/// fires before the driver call completes, the in-flight call is dropped and the
/// operation fails with [`ErrorKind::Timeout`] or [`ErrorKind::Canceled`].
///
/// Contexts are cheap to clone; clones share the same cancellation signal.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::context::OperationContext;
/// use std::time::Duration;
///
/// let ctx = OperationContext::background().with_timeout(Duration::from_secs(2));
/// let users = repo.find_many(&ctx, doc! {}, None).await?;
///
/// let (ctx, handle) = OperationContext::cancellable();
/// tokio::spawn(async move { shutdown_signal().await; handle.cancel(); });
/// repo.find_many(&ctx, doc! {}, None).await?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct OperationContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Signals cancellation to every context derived from [`OperationContext::cancellable`].
///
/// Dropping the handle without calling [`cancel`](CancelHandle::cancel) leaves the
/// contexts uncancelled.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl OperationContext {
    /// A context with no deadline that can never be cancelled.
    pub fn background() -> Self {
        OperationContext::default()
    }

    /// A context paired with the handle that cancels it.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let ctx = OperationContext {
            deadline: None,
            cancel: Some(receiver),
        };
        (ctx, CancelHandle { sender })
    }

    /// Derives a context whose deadline is `timeout` from now.
    ///
    /// An earlier deadline already present on this context is kept. A timeout too
    /// large to represent as an instant adds no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Derives a context that expires at `deadline`.
    ///
    /// An earlier deadline already present on this context is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        OperationContext {
            deadline: Some(deadline),
            cancel: self.cancel.clone(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, or `None` when the context has no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|receiver| *receiver.borrow())
            .unwrap_or(false)
    }

    /// Drives `operation` to completion unless the context is cancelled or its
    /// deadline passes first, in which case `operation` is dropped.
    pub async fn run<F, T>(&self, operation: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        if self.is_cancelled() {
            return Err(RepoError::new("operation canceled", ErrorKind::Canceled));
        }

        let mut cancel = self.cancel.clone();
        let cancelled = async move {
            if let Some(receiver) = cancel.as_mut() {
                if receiver.wait_for(|cancelled| *cancelled).await.is_ok() {
                    return;
                }
            }
            // no handle left to cancel this context
            pending::<()>().await
        };

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(RepoError::new("operation canceled", ErrorKind::Canceled)),
            _ = expired => Err(RepoError::new("operation deadline exceeded", ErrorKind::Timeout)),
            result = operation => result,
        }
    }
}

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
    Parent,
    Deadline,
    Cancel,
}

impl Display for CancelReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parent => write!(f, "Parent"),
            Self::Deadline => write!(f, "Deadline"),
            Self::Cancel => write!(f, "Cancel"),
        }
    }
}

/// A cancellation scope shared by everything that should stop on shutdown.
///
/// Cloning is cheap. Tasks spawned through [`Context::spawn`] are tracked, and
/// [`Handler::cancel`] waits for them after cancelling.
#[derive(Clone)]
pub struct Context {
    token: CancellationToken,
    parent: Option<CancellationToken>,
    deadline: Option<Instant>,
    tracker: TaskTracker,
}

pub struct Handler {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Handler {
    /// Resolves once the context is cancelled, by us, a parent or the deadline.
    pub async fn done(&mut self) {
        self.token.cancelled().await;
    }

    /// Cancels the context and waits for every tracked task to finish.
    pub async fn cancel(self) {
        self.token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

impl Context {
    pub fn new() -> (Self, Handler) {
        Self::build(CancellationToken::new(), None, None)
    }

    pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
        Self::build(CancellationToken::new(), None, Some(deadline))
    }

    pub fn with_timeout(timeout: Duration) -> (Self, Handler) {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_parent(parent: Context, deadline: Option<Instant>) -> (Self, Handler) {
        Self::build(parent.token.child_token(), Some(parent.token), deadline)
    }

    fn build(token: CancellationToken, parent: Option<CancellationToken>, deadline: Option<Instant>) -> (Self, Handler) {
        let tracker = TaskTracker::new();

        if let Some(deadline) = deadline {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => token.cancel(),
                    _ = token.cancelled() => {}
                }
            });
        }

        (
            Self {
                token: token.clone(),
                parent,
                deadline,
                tracker: tracker.clone(),
            },
            Handler { token, tracker },
        )
    }

    pub async fn done(&self) -> CancelReason {
        self.token.cancelled().await;

        if self.parent.as_ref().is_some_and(|p| p.is_cancelled()) {
            CancelReason::Parent
        } else if self.deadline.is_some_and(|d| d <= Instant::now()) {
            CancelReason::Deadline
        } else {
            CancelReason::Cancel
        }
    }

    pub fn is_done(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Spawns a task that [`Handler::cancel`] will wait for.
    pub fn spawn<F>(&self, fut: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tracker.spawn(fut)
    }
}

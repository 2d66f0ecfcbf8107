use std::io;

use futures::future::select_all;
use futures::FutureExt;
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Waits on any of a set of unix signals.
#[derive(Default)]
pub struct SignalHandler {
    signals: Vec<(SignalKind, Signal)>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, kind: SignalKind) -> io::Result<Self> {
        self.signals.push((kind, signal(kind)?));
        Ok(self)
    }

    /// Resolves with the kind of the next signal received. Pending forever if
    /// no signal was registered.
    pub async fn recv(&mut self) -> SignalKind {
        if self.signals.is_empty() {
            return std::future::pending().await;
        }

        let futures = self
            .signals
            .iter_mut()
            .map(|(kind, signal)| {
                let kind = *kind;
                async move {
                    signal.recv().await;
                    kind
                }
                .boxed()
            })
            .collect::<Vec<_>>();

        let (kind, _, _) = select_all(futures).await;
        kind
    }
}

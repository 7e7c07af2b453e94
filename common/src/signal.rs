use futures::future::select_all;
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Listens for any of a set of unix signals.
pub struct SignalHandler {
    signals: Vec<(SignalKind, Signal)>,
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self {
            signals: Vec::new(),
        }
    }
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, kind: SignalKind) -> Self {
        let listener = signal(kind).expect("failed to register signal listener");
        self.signals.push((kind, listener));
        self
    }

    /// Resolves with the next signal received. Pends forever if no signals
    /// were registered.
    pub async fn recv(&mut self) -> SignalKind {
        if self.signals.is_empty() {
            return std::future::pending().await;
        }

        let (kind, ..) = select_all(self.signals.iter_mut().map(|(kind, listener)| {
            let kind = *kind;
            Box::pin(async move {
                listener.recv().await;
                kind
            })
        }))
        .await;

        kind
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::process::Command;

    use super::*;

    #[tokio::test]
    async fn receives_registered_signal() {
        let mut handler = SignalHandler::new().with_signal(SignalKind::user_defined1());

        let pid = std::process::id();

        Command::new("kill")
            .arg("-s")
            .arg("SIGUSR1")
            .arg(pid.to_string())
            .status()
            .await
            .expect("failed to send SIGUSR1");

        let kind = tokio::time::timeout(Duration::from_secs(1), handler.recv())
            .await
            .expect("signal was not received");

        assert_eq!(kind, SignalKind::user_defined1());
    }
}

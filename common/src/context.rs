use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};

/// A cancellation context, handed out to every long-running task.
///
/// The owning side keeps the [`Handler`]; when the handler is cancelled every
/// clone of the [`Context`] resolves its `done()` future. Dropping the last
/// `Context` clone in turn resolves the handler's `cancel()`/`done()` future,
/// which is how shutdown waits for in-flight work to finish.
struct RawContext {
    _sender: oneshot::Sender<()>,
    cancel_receiver: broadcast::Receiver<()>,
}

#[derive(Clone)]
pub struct Context(Arc<RawContext>);

pub struct Handler {
    recv: oneshot::Receiver<()>,
    cancel_sender: broadcast::Sender<()>,
}

impl Context {
    #[must_use]
    pub fn new() -> (Self, Handler) {
        let (sender, recv) = oneshot::channel();
        let (cancel_sender, cancel_receiver) = broadcast::channel(1);

        (
            Self(Arc::new(RawContext {
                _sender: sender,
                cancel_receiver,
            })),
            Handler {
                recv,
                cancel_sender,
            },
        )
    }

    /// Resolves once the context has been cancelled.
    pub async fn done(&self) {
        let mut recv = self.0.cancel_receiver.resubscribe();
        let _ = recv.recv().await;
    }
}

impl Handler {
    /// Waits for every clone of the context to be dropped without cancelling.
    pub async fn done(&mut self) {
        let _ = (&mut self.recv).await;
    }

    /// Cancels the context and waits for every clone to be dropped.
    pub async fn cancel(self) {
        drop(self.cancel_sender);

        let _ = self.recv.await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn cancel_resolves_done() {
        let (ctx, handler) = Context::new();

        let task = tokio::spawn(async move {
            ctx.done().await;
        });

        handler.cancel().await;

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("task did not observe cancellation")
            .unwrap();
    }

    #[tokio::test]
    async fn handler_waits_for_contexts() {
        let (ctx, mut handler) = Context::new();
        let second = ctx.clone();

        drop(ctx);

        // Still one clone alive, done() must not resolve yet.
        assert!(
            tokio::time::timeout(Duration::from_millis(50), handler.done())
                .await
                .is_err()
        );

        drop(second);

        tokio::time::timeout(Duration::from_secs(1), handler.done())
            .await
            .expect("handler did not observe drop");
    }
}

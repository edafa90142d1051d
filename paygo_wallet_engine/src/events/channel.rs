//! Simple stateless pub-sub event plumbing.
//!
//! An [`EventHandler`] owns the receiving end of an mpsc channel and a single handler closure. Producers are
//! cheap clones of the sending end. Each received event is handled on its own spawned task, so one slow email
//! cannot back up the channel for long. Handlers receive only the event itself; they have no access to engine
//! state.

use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::sync::mpsc;

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, listener) = mpsc::channel(buffer_size);
        Self { listener, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Runs the receive loop until every producer has been dropped.
    pub async fn start_handler(mut self) {
        debug!("📬️ Starting event handler");
        // Drop the internal sender so the loop ends when the last external producer goes away.
        drop(self.sender);
        while let Some(event) = self.listener.recv().await {
            trace!("📬️ Handling event");
            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                (handler)(event).await;
                trace!("📬️ Event handled");
            });
        }
        debug!("📬️ Event handler has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    /// Best-effort publish. A closed or full channel is logged and dropped; event delivery is never allowed to
    /// fail the caller.
    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[tokio::test]
    async fn events_reach_the_handler() {
        let _ = env_logger::try_init();
        let total = Arc::new(AtomicU64::new(0));
        let sum = Arc::clone(&total);
        let handler: Handler<u64> = Arc::new(move |v| {
            let sum = Arc::clone(&sum);
            Box::pin(async move {
                sum.fetch_add(v, Ordering::SeqCst);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        let event_handler = EventHandler::new(4, handler);
        let producer = event_handler.subscribe();
        let runner = tokio::spawn(event_handler.start_handler());
        for v in 1..=5u64 {
            producer.publish_event(v).await;
        }
        drop(producer);
        runner.await.unwrap();
        // Spawned handler tasks may still be in flight right after shutdown; give them a beat.
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        assert_eq!(total.load(Ordering::SeqCst), 15);
    }
}

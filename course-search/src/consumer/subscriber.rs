//! Queue subscriber that survives broker reconnects.

use std::sync::Arc;

use async_trait::async_trait;
use course_search_repository::ConnectionGuard;
use course_search_shared::CourseId;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::messages::decode_course_update;
use crate::errors::SyncError;

/// Stream of raw delivery payloads from one consumer.
pub type DeliveryStream = BoxStream<'static, Result<Vec<u8>, SyncError>>;

/// A broker channel that can start consuming a queue.
#[async_trait]
pub trait QueueChannel: Clone + Send + Sync + 'static {
    /// Start consuming `queue`; deliveries are acknowledged automatically.
    ///
    /// The stream ends when the channel goes away.
    async fn consume(&self, queue: &str) -> Result<DeliveryStream, SyncError>;

    /// Report the channel as unusable so the owning guard reconnects.
    fn mark_lost(&self);
}

/// Callback invoked once per decoded course-update message.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, course_id: &CourseId) -> Result<(), SyncError>;
}

/// Consumes course-update messages over a guarded broker connection.
///
/// Consumption starts once both a handler is registered and the connection is
/// ready, whichever happens last. When the delivery stream ends or consuming
/// fails, the channel is marked lost and the subscriber waits for the guard to
/// reconnect, then starts consuming again with the same handler.
pub struct MessageSubscriber<T> {
    connection: Arc<ConnectionGuard<T>>,
    queue: String,
    handler: watch::Sender<Option<Arc<dyn MessageHandler>>>,
}

impl<T: QueueChannel> MessageSubscriber<T> {
    pub fn new(connection: Arc<ConnectionGuard<T>>, queue: impl Into<String>) -> Self {
        let (handler, _) = watch::channel(None);
        Self {
            connection,
            queue: queue.into(),
            handler,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Install the handler for incoming messages, replacing any previous one.
    pub fn register_handler(&self, handler: Arc<dyn MessageHandler>) {
        self.handler.send_replace(Some(handler));
        debug!(queue = %self.queue, "Message handler registered");
    }

    /// Whether a handler has been registered.
    pub fn has_handler(&self) -> bool {
        self.handler.borrow().is_some()
    }

    /// Spawn the consume loop.
    ///
    /// The loop exits when the broker connection guard is shut down.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let subscriber = Arc::clone(self);
        tokio::spawn(async move { subscriber.run().await })
    }

    #[instrument(skip_all, fields(queue = %self.queue))]
    async fn run(&self) {
        loop {
            tokio::select! {
                _ = self.handler_registered() => {}
                _ = self.connection.shutdown_requested() => break,
            }

            let Some(channel) = self.connection.await_ready().await else {
                break;
            };

            let mut deliveries = match channel.consume(&self.queue).await {
                Ok(deliveries) => deliveries,
                Err(e) => {
                    warn!(error = %e, "Failed to start consuming, reconnecting...");
                    channel.mark_lost();
                    let stopped = tokio::select! {
                        _ = sleep(self.connection.retry_interval()) => false,
                        _ = self.connection.shutdown_requested() => true,
                    };
                    if stopped {
                        break;
                    }
                    continue;
                }
            };

            info!("Consuming course updates");

            loop {
                let delivery = tokio::select! {
                    delivery = deliveries.next() => delivery,
                    _ = self.connection.shutdown_requested() => {
                        info!("Subscriber stopped");
                        return;
                    }
                };

                match delivery {
                    Some(Ok(payload)) => self.dispatch(&payload).await,
                    Some(Err(e)) => {
                        warn!(error = %e, "Delivery failed, waiting for reconnect");
                        break;
                    }
                    None => {
                        info!("Delivery stream ended, waiting for reconnect");
                        break;
                    }
                }
            }

            // The channel cannot consume again; a fresh one comes from the guard.
            channel.mark_lost();
        }

        info!("Subscriber stopped");
    }

    async fn handler_registered(&self) {
        let mut handler = self.handler.subscribe();
        while handler.borrow_and_update().is_none() {
            if handler.changed().await.is_err() {
                return;
            }
        }
    }

    async fn dispatch(&self, payload: &[u8]) {
        let Some(course_id) = decode_course_update(payload) else {
            debug!(bytes = payload.len(), "Skipping malformed message");
            return;
        };

        let handler = self.handler.borrow().clone();
        let Some(handler) = handler else {
            return;
        };

        match handler.handle(&course_id).await {
            Ok(()) => debug!(course_id = %course_id, "Course update handled"),
            Err(e) => error!(course_id = %course_id, error = %e, "Failed to handle course update"),
        }
    }
}

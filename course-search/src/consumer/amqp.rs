//! RabbitMQ transport built on lapin.

use std::sync::Arc;

use async_trait::async_trait;
use course_search_repository::Connector;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties};
use tokio::sync::Notify;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::consumer::subscriber::{DeliveryStream, QueueChannel};
use crate::errors::SyncError;

/// AMQP reply code for a normal close.
const REPLY_SUCCESS: u16 = 200;

/// Connects to RabbitMQ and declares the update queue.
pub struct AmqpConnector {
    url: String,
    queue: String,
}

impl AmqpConnector {
    pub fn new(url: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            queue: queue.into(),
        }
    }

    async fn open_channel(&self, connection: &Connection) -> Result<Channel, lapin::Error> {
        let channel = connection.create_channel().await?;
        declare_queue(&channel, &self.queue).await?;
        Ok(channel)
    }
}

/// Declare the durable update queue; a no-op when it already exists.
async fn declare_queue(channel: &Channel, queue: &str) -> Result<(), lapin::Error> {
    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await?;
    Ok(())
}

/// An open connection with one channel on which the update queue is declared.
///
/// Loss is signalled by connection errors and by the subscriber when the
/// channel can no longer consume.
#[derive(Clone)]
pub struct AmqpChannel {
    connection: Arc<Connection>,
    channel: Channel,
    lost: Arc<Notify>,
}

#[async_trait]
impl Connector for AmqpConnector {
    type Connection = AmqpChannel;
    type Error = lapin::Error;

    #[instrument(skip(self), fields(queue = %self.queue))]
    async fn connect(&self) -> Result<AmqpChannel, lapin::Error> {
        let connection = Connection::connect(&self.url, ConnectionProperties::default()).await?;

        let lost = Arc::new(Notify::new());
        {
            let lost = Arc::clone(&lost);
            connection.on_error(move |err| {
                warn!(error = %err, "RabbitMQ connection error");
                lost.notify_one();
            });
        }

        let channel = match self.open_channel(&connection).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = connection.close(REPLY_SUCCESS, "setup failed").await {
                    debug!(error = %close_err, "Failed to close connection after setup error");
                }
                return Err(e);
            }
        };

        debug!("Queue declared");
        Ok(AmqpChannel {
            connection: Arc::new(connection),
            channel,
            lost,
        })
    }

    async fn closed(&self, connection: &AmqpChannel) {
        connection.lost.notified().await;
    }

    async fn release(&self, connection: AmqpChannel) {
        if let Err(e) = connection.channel.close(REPLY_SUCCESS, "shutdown").await {
            debug!(error = %e, "Failed to close channel");
        }
        if let Err(e) = connection.connection.close(REPLY_SUCCESS, "shutdown").await {
            debug!(error = %e, "Failed to close connection");
        }
    }
}

#[async_trait]
impl QueueChannel for AmqpChannel {
    async fn consume(&self, queue: &str) -> Result<DeliveryStream, SyncError> {
        // The queue may have been deleted since the channel was opened.
        declare_queue(&self.channel, queue).await?;

        let consumer_tag = format!("course-search-{}", Uuid::new_v4());
        let consumer = self
            .channel
            .basic_consume(
                queue,
                &consumer_tag,
                BasicConsumeOptions {
                    no_ack: true,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        debug!(consumer_tag = %consumer_tag, "Consumer registered");
        Ok(consumer
            .map(|delivery| {
                delivery
                    .map(|delivery| delivery.data)
                    .map_err(SyncError::from)
            })
            .boxed())
    }

    fn mark_lost(&self) {
        self.lost.notify_one();
    }
}

//! Consumer module for the course search service.
//!
//! Receives course-update notifications from RabbitMQ and hands each decoded
//! course id to the registered [`MessageHandler`].

mod amqp;
mod messages;
mod subscriber;

pub use amqp::{AmqpChannel, AmqpConnector};
pub use messages::decode_course_update;
pub use subscriber::{DeliveryStream, MessageHandler, MessageSubscriber, QueueChannel};

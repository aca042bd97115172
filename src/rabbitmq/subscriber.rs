use lapin::{
    options::*, types::FieldTable, Channel, Connection, ConnectionProperties, Consumer,
    ExchangeKind,
};
use serde::de::DeserializeOwned;
use std::{collections::HashMap, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::time::timeout;

#[derive(Error, Debug)]
pub enum SubscriberError {
    #[error("Failed to connect to RabbitMQ: {0}")]
    ConnectionFailed(String),
    #[error("Failed to open channel: {0}")]
    ChannelFailed(String),
    #[error("Failed to declare exchange: {0}")]
    ExchangeDeclarationFailed(String),
    #[error("Failed to declare queue: {0}")]
    QueueDeclarationFailed(String),
    #[error("Failed to bind queue: {0}")]
    QueueBindFailed(String),
    #[error("Failed to register consumer: {0}")]
    ConsumerRegistrationFailed(String),
    #[error("Context timeout: {0}")]
    Timeout(String),
}

/// A received RabbitMQ message.
#[derive(Debug, Clone)]
pub struct Message {
    pub body: Vec<u8>,
    pub routing_key: String,
    pub exchange: String,
    pub content_type: Option<String>,
    pub delivery_tag: u64,
}

impl Message {
    pub fn unmarshal_to<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Handler for messages on one routing key. Returning an error nacks the
/// delivery; success acks it.
pub trait Callback: Send + Sync {
    fn on_message(&self, message: &Message)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub type CallbackMap = HashMap<String, Arc<dyn Callback>>;

/// RabbitMQ subscriber: durable direct exchange, durable non-exclusive
/// queue, manual ack/nack, routing-key callback dispatch.
pub struct Subscriber {
    channel: Channel,
    exchange: String,
    queue: String,
}

impl Subscriber {
    pub async fn new(
        amqp_url: &str,
        exchange_name: &str,
        queue_name: &str,
    ) -> Result<Self, SubscriberError> {
        let connection = timeout(
            Duration::from_secs(60),
            Connection::connect(amqp_url, ConnectionProperties::default()),
        )
        .await
        .map_err(|_| SubscriberError::Timeout("Connection timeout".to_string()))?
        .map_err(|e| SubscriberError::ConnectionFailed(e.to_string()))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| SubscriberError::ChannelFailed(e.to_string()))?;

        // Declared identically on the publisher side.
        channel
            .exchange_declare(
                exchange_name,
                ExchangeKind::Direct,
                ExchangeDeclareOptions {
                    durable: true,
                    auto_delete: false,
                    internal: false,
                    nowait: false,
                    passive: false,
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| SubscriberError::ExchangeDeclarationFailed(e.to_string()))?;

        let queue = channel
            .queue_declare(
                queue_name,
                QueueDeclareOptions {
                    durable: true,
                    exclusive: false,
                    auto_delete: false,
                    nowait: false,
                    passive: false,
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| SubscriberError::QueueDeclarationFailed(e.to_string()))?;

        Ok(Subscriber {
            channel,
            exchange: exchange_name.to_string(),
            queue: queue.name().to_string(),
        })
    }

    /// Binds each routing key and starts the consume loop in a background
    /// task.
    pub async fn start(&mut self, callbacks: CallbackMap) -> Result<(), SubscriberError> {
        for routing_key in callbacks.keys() {
            self.channel
                .queue_bind(
                    &self.queue,
                    &self.exchange,
                    routing_key,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await
                .map_err(|e| {
                    SubscriberError::QueueBindFailed(format!(
                        "Failed to bind queue {} to exchange {} with routing key {}: {}",
                        self.queue, self.exchange, routing_key, e
                    ))
                })?;
        }

        let consumer = self
            .channel
            .basic_consume(
                &self.queue,
                "",
                BasicConsumeOptions {
                    no_ack: false, // Manual ack
                    exclusive: false,
                    no_local: false,
                    nowait: false,
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| SubscriberError::ConsumerRegistrationFailed(e.to_string()))?;

        self.process_messages(consumer, callbacks);
        Ok(())
    }

    fn process_messages(&self, mut consumer: Consumer, callbacks: CallbackMap) {
        let callbacks = Arc::new(callbacks);
        let channel = self.channel.clone();

        tokio::spawn(async move {
            use futures_util::StreamExt;

            while let Some(delivery) = consumer.next().await {
                match delivery {
                    Ok(delivery) => {
                        let msg = Message {
                            body: delivery.data.clone(),
                            routing_key: delivery.routing_key.to_string(),
                            exchange: delivery.exchange.to_string(),
                            content_type: delivery
                                .properties
                                .content_type()
                                .as_ref()
                                .map(|s| s.to_string()),
                            delivery_tag: delivery.delivery_tag,
                        };

                        match callbacks.get(&msg.routing_key) {
                            Some(callback) => match callback.on_message(&msg) {
                                Ok(_) => {
                                    if let Err(e) = channel
                                        .basic_ack(delivery.delivery_tag, BasicAckOptions::default())
                                        .await
                                    {
                                        log::error!(
                                            "Failed to acknowledge message for routing key {}: {}",
                                            msg.routing_key,
                                            e
                                        );
                                    }
                                }
                                Err(e) => {
                                    log::error!(
                                        "Error processing message for routing key {}: {}",
                                        msg.routing_key,
                                        e
                                    );
                                    if let Err(nack_err) = channel
                                        .basic_nack(delivery.delivery_tag, BasicNackOptions::default())
                                        .await
                                    {
                                        log::error!(
                                            "Failed to nack message for routing key {}: {}",
                                            msg.routing_key,
                                            nack_err
                                        );
                                    }
                                }
                            },
                            None => {
                                log::warn!("No callback found for routing key: {}", msg.routing_key);
                                if let Err(e) = channel
                                    .basic_nack(delivery.delivery_tag, BasicNackOptions::default())
                                    .await
                                {
                                    log::error!(
                                        "Failed to nack message for routing key {}: {}",
                                        msg.routing_key,
                                        e
                                    );
                                }
                            }
                        }
                    }
                    Err(e) => {
                        log::error!("Error receiving delivery: {}", e);
                    }
                }
            }
        });
    }

    pub fn get_exchange(&self) -> &str {
        &self.exchange
    }

    pub fn get_queue(&self) -> &str {
        &self.queue
    }
}

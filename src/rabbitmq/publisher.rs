use anyhow::Result;
use chrono::Utc;
use lapin::{
    options::{BasicPublishOptions, ExchangeDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind,
};

use crate::models::ReportSummary;
use crate::rabbitmq::messages::ReportSubmittedEvent;

pub struct ReportEventPublisher {
    channel: Channel,
    exchange: String,
    routing_key: String,
}

impl ReportEventPublisher {
    pub async fn new(amqp_url: &str, exchange: &str, routing_key: &str) -> Result<Self> {
        log::info!(
            "Initializing RabbitMQ publisher: exchange={}, routing_key={}",
            exchange,
            routing_key
        );

        let connection = Connection::connect(amqp_url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;

        channel
            .exchange_declare(
                exchange,
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
            .await?;

        Ok(Self {
            channel,
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
        })
    }

    pub async fn publish_report_submitted(&self, report: &ReportSummary) -> Result<()> {
        let event = ReportSubmittedEvent {
            report: report.clone(),
            timestamp: Utc::now(),
        };
        let payload = serde_json::to_vec(&event)?;

        self.channel
            .basic_publish(
                &self.exchange,
                &self.routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type("application/json".to_string().into()),
            )
            .await?
            .await?;

        log::debug!("Published ReportSubmittedEvent for report: {}", report.id);
        Ok(())
    }
}

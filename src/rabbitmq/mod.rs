pub mod messages;
pub mod publisher;
pub mod subscriber;

pub use publisher::ReportEventPublisher;

use std::sync::Arc;
use std::time::Duration;

use sqlx::MySqlPool;

use crate::cache::CandidateCache;
use crate::config::Config;
use crate::database::reports;
use crate::rabbitmq::messages::ReportSubmittedEvent;
use crate::rabbitmq::subscriber::{Callback, CallbackMap, Message, Subscriber, SubscriberError};
use crate::utils::debounce::Debouncer;

const RECONCILE_DELAY: Duration = Duration::from_secs(1);

/// Keeps the duplicate-detection candidate cache fresh: each
/// `report.submitted` event is upserted immediately, and a debounced full
/// re-prime from the database coalesces event bursts into one reload.
pub struct CandidateSubscriber {
    subscriber: Subscriber,
}

impl CandidateSubscriber {
    pub async fn new(config: &Config) -> Result<Self, SubscriberError> {
        let amqp_url = config.amqp_url();
        log::info!(
            "Initializing RabbitMQ subscriber: exchange={}, queue={}",
            config.rabbitmq_exchange,
            config.rabbitmq_queue
        );

        let subscriber =
            Subscriber::new(&amqp_url, &config.rabbitmq_exchange, &config.rabbitmq_queue).await?;
        Ok(Self { subscriber })
    }

    pub async fn start(
        &mut self,
        cache: CandidateCache,
        pool: MySqlPool,
        routing_key: &str,
    ) -> Result<(), SubscriberError> {
        log::info!("Starting RabbitMQ subscriber for routing key: {}", routing_key);

        let callback: Arc<dyn Callback> = Arc::new(CacheRefreshCallback {
            cache,
            pool,
            reconcile: Debouncer::new(RECONCILE_DELAY),
        });

        let mut callbacks: CallbackMap = CallbackMap::new();
        callbacks.insert(routing_key.to_string(), callback);

        self.subscriber.start(callbacks).await?;
        log::info!("RabbitMQ subscriber started successfully");
        Ok(())
    }
}

struct CacheRefreshCallback {
    cache: CandidateCache,
    pool: MySqlPool,
    reconcile: Debouncer,
}

impl Callback for CacheRefreshCallback {
    fn on_message(
        &self,
        message: &Message,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let event: ReportSubmittedEvent = message.unmarshal_to()?;
        log::info!("Got a new report: id={}", event.report.id);

        self.cache.upsert(event.report);

        // Coalesce event bursts into one reload from the authoritative store.
        let cache = self.cache.clone();
        let pool = self.pool.clone();
        self.reconcile.schedule(move || async move {
            match reports::fetch_summaries(&pool).await {
                Ok(summaries) => cache.prime(summaries),
                Err(e) => log::error!("Candidate cache reconciliation failed: {}", e),
            }
        });

        Ok(())
    }
}

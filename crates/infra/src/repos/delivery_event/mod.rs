mod inmemory;
mod postgres;

pub use inmemory::InMemoryDeliveryEventRepo;
pub use postgres::PostgresDeliveryEventRepo;

use duemate_domain::DeliveryEvent;

/// Append-only log of successfully delivered reminders, keyed by the
/// reminder idempotency key
#[async_trait::async_trait]
pub trait IDeliveryEventRepo: Send + Sync {
    async fn insert(&self, event: &DeliveryEvent) -> anyhow::Result<()>;
    async fn find_by_key(&self, idempotency_key: &str) -> anyhow::Result<Option<DeliveryEvent>>;
}

use super::IDeliveryEventRepo;
use crate::repos::shared::inmemory_repo::*;
use duemate_domain::DeliveryEvent;

pub struct InMemoryDeliveryEventRepo {
    events: std::sync::Mutex<Vec<DeliveryEvent>>,
}

impl InMemoryDeliveryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDeliveryEventRepo for InMemoryDeliveryEventRepo {
    async fn insert(&self, event: &DeliveryEvent) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn find_by_key(&self, idempotency_key: &str) -> anyhow::Result<Option<DeliveryEvent>> {
        let matches = find_by(&self.events, |event: &DeliveryEvent| {
            event.idempotency_key == idempotency_key
        });
        Ok(matches.into_iter().next())
    }
}

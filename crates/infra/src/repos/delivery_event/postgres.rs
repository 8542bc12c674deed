use super::IDeliveryEventRepo;

use duemate_domain::{DeliveryEvent, ReminderKind};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

pub struct PostgresDeliveryEventRepo {
    pool: PgPool,
}

impl PostgresDeliveryEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DeliveryEventRaw {
    tenant_uid: Uuid,
    invoice_uid: Uuid,
    kind: String,
    idempotency_key: String,
    delivered_at: i64,
}

impl Into<DeliveryEvent> for DeliveryEventRaw {
    fn into(self) -> DeliveryEvent {
        let kind = match self.kind.parse() {
            Ok(kind) => kind,
            Err(_) => {
                warn!("Delivery event {} has an unknown kind", self.idempotency_key);
                ReminderKind::OnDue
            }
        };
        DeliveryEvent {
            tenant_id: self.tenant_uid.into(),
            invoice_id: self.invoice_uid.into(),
            kind,
            idempotency_key: self.idempotency_key,
            delivered_at: self.delivered_at,
        }
    }
}

#[async_trait::async_trait]
impl IDeliveryEventRepo for PostgresDeliveryEventRepo {
    async fn insert(&self, event: &DeliveryEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_delivery_events
            (idempotency_key, tenant_uid, invoice_uid, kind, delivered_at)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&event.idempotency_key)
        .bind(event.tenant_id.inner_ref())
        .bind(event.invoice_id.inner_ref())
        .bind(event.kind.as_str())
        .bind(event.delivered_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_key(&self, idempotency_key: &str) -> anyhow::Result<Option<DeliveryEvent>> {
        let row = sqlx::query_as::<_, DeliveryEventRaw>(
            r#"
            SELECT * FROM reminder_delivery_events
            WHERE idempotency_key = $1
            "#,
        )
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|event| event.into()))
    }
}

use super::ITenantRepo;

use duemate_domain::{Tenant, TenantSettings, TenantWebhookSettings, ID};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRaw {
    tenant_uid: Uuid,
    webhook_url: Option<String>,
    webhook_key: Option<String>,
    timezone: String,
}

impl Into<Tenant> for TenantRaw {
    fn into(self) -> Tenant {
        let webhook = match (self.webhook_url, self.webhook_key) {
            (Some(url), Some(key)) => Some(TenantWebhookSettings { url, key }),
            _ => None,
        };
        let timezone = match self.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "Tenant {} has an unknown timezone: {}, falling back to UTC",
                    self.tenant_uid, self.timezone
                );
                chrono_tz::UTC
            }
        };
        Tenant {
            id: self.tenant_uid.into(),
            settings: TenantSettings { timezone, webhook },
        }
    }
}

#[async_trait::async_trait]
impl ITenantRepo for PostgresTenantRepo {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants
            (tenant_uid, webhook_url, webhook_key, timezone)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(tenant.id.inner_ref())
        .bind(tenant.settings.webhook.as_ref().map(|w| w.url.clone()))
        .bind(tenant.settings.webhook.as_ref().map(|w| w.key.clone()))
        .bind(tenant.settings.timezone.name())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, tenant_id: &ID) -> Option<Tenant> {
        sqlx::query_as::<_, TenantRaw>(
            r#"
            SELECT * FROM tenants
            WHERE tenant_uid = $1
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None)
        .map(|tenant| tenant.into())
    }
}

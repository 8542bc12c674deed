use super::ITenantStateRepo;

use duemate_domain::{TenantState, ID};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

pub struct PostgresTenantStateRepo {
    pool: PgPool,
}

impl PostgresTenantStateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantStateRaw {
    state: Json<TenantState>,
}

#[derive(Debug, FromRow)]
struct TenantUidRaw {
    tenant_uid: Uuid,
}

#[async_trait::async_trait]
impl ITenantStateRepo for PostgresTenantStateRepo {
    async fn find(&self, tenant_id: &ID) -> anyhow::Result<Option<TenantState>> {
        let row = sqlx::query_as::<_, TenantStateRaw>(
            r#"
            SELECT state FROM tenant_reminder_state
            WHERE tenant_uid = $1
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|raw| raw.state.0))
    }

    async fn save(
        &self,
        state: &TenantState,
        next_wake_at: Option<i64>,
        pending_jobs: i64,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tenant_reminder_state
            (tenant_uid, state, next_wake_at, pending_jobs)
            VALUES($1, $2, $3, $4)
            ON CONFLICT (tenant_uid)
            DO UPDATE SET
                state = $2,
                next_wake_at = $3,
                pending_jobs = $4
            "#,
        )
        .bind(state.tenant_id.inner_ref())
        .bind(Json(state))
        .bind(next_wake_at)
        .bind(pending_jobs)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_due_wakes(&self, now: i64) -> Vec<ID> {
        sqlx::query_as::<_, TenantUidRaw>(
            r#"
            SELECT tenant_uid FROM tenant_reminder_state
            WHERE next_wake_at IS NOT NULL AND next_wake_at <= $1
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .unwrap_or(vec![])
        .into_iter()
        .map(|row| row.tenant_uid.into())
        .collect()
    }

    async fn find_with_pending_jobs(&self) -> Vec<ID> {
        sqlx::query_as::<_, TenantUidRaw>(
            r#"
            SELECT tenant_uid FROM tenant_reminder_state
            WHERE pending_jobs > 0
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or(vec![])
        .into_iter()
        .map(|row| row.tenant_uid.into())
        .collect()
    }
}

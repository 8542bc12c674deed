use super::ITenantStateRepo;
use crate::repos::shared::inmemory_repo::*;
use duemate_domain::{Entity, TenantState, ID};

#[derive(Debug, Clone)]
struct TenantStateRow {
    state: TenantState,
    next_wake_at: Option<i64>,
    pending_jobs: i64,
}

impl Entity for TenantStateRow {
    fn id(&self) -> &ID {
        &self.state.tenant_id
    }
}

pub struct InMemoryTenantStateRepo {
    states: std::sync::Mutex<Vec<TenantStateRow>>,
}

impl InMemoryTenantStateRepo {
    pub fn new() -> Self {
        Self {
            states: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITenantStateRepo for InMemoryTenantStateRepo {
    async fn find(&self, tenant_id: &ID) -> anyhow::Result<Option<TenantState>> {
        Ok(find(tenant_id, &self.states).map(|row| row.state))
    }

    async fn save(
        &self,
        state: &TenantState,
        next_wake_at: Option<i64>,
        pending_jobs: i64,
    ) -> anyhow::Result<()> {
        upsert(
            &TenantStateRow {
                state: state.clone(),
                next_wake_at,
                pending_jobs,
            },
            &self.states,
        );
        Ok(())
    }

    async fn find_due_wakes(&self, now: i64) -> Vec<ID> {
        find_by(&self.states, |row: &TenantStateRow| {
            matches!(row.next_wake_at, Some(wake_at) if wake_at <= now)
        })
        .into_iter()
        .map(|row| row.state.tenant_id)
        .collect()
    }

    async fn find_with_pending_jobs(&self) -> Vec<ID> {
        find_by(&self.states, |row: &TenantStateRow| row.pending_jobs > 0)
            .into_iter()
            .map(|row| row.state.tenant_id)
            .collect()
    }
}

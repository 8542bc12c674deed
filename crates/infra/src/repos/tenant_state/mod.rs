mod inmemory;
mod postgres;

pub use inmemory::InMemoryTenantStateRepo;
pub use postgres::PostgresTenantStateRepo;

use duemate_domain::{TenantState, ID};

/// Stores one durable state blob per tenant together with the tenant's
/// armed wake instant and pending-job count, written in a single upsert so
/// the three always change together.
#[async_trait::async_trait]
pub trait ITenantStateRepo: Send + Sync {
    async fn find(&self, tenant_id: &ID) -> anyhow::Result<Option<TenantState>>;
    async fn save(
        &self,
        state: &TenantState,
        next_wake_at: Option<i64>,
        pending_jobs: i64,
    ) -> anyhow::Result<()>;
    /// Tenants whose armed wake instant has arrived
    async fn find_due_wakes(&self, now: i64) -> Vec<ID>;
    /// Tenants with at least one non-terminal reminder obligation
    async fn find_with_pending_jobs(&self) -> Vec<ID>;
}

mod inmemory;
mod postgres;

pub use inmemory::InMemoryTenantRepo;
pub use postgres::PostgresTenantRepo;

use duemate_domain::{Tenant, ID};

#[async_trait::async_trait]
pub trait ITenantRepo: Send + Sync {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()>;
    async fn find(&self, tenant_id: &ID) -> Option<Tenant>;
}

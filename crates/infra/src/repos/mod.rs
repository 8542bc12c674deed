mod delivery_event;
mod shared;
mod tenant;
mod tenant_state;

use delivery_event::PostgresDeliveryEventRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tenant::{InMemoryTenantRepo, PostgresTenantRepo};
use tenant_state::{InMemoryTenantStateRepo, PostgresTenantStateRepo};
use tracing::info;

pub use delivery_event::{IDeliveryEventRepo, InMemoryDeliveryEventRepo};
pub use tenant::ITenantRepo;
pub use tenant_state::ITenantStateRepo;

#[derive(Clone)]
pub struct Repos {
    pub tenants: Arc<dyn ITenantRepo>,
    pub tenant_states: Arc<dyn ITenantStateRepo>,
    pub delivery_events: Arc<dyn IDeliveryEventRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION ...");
        sqlx::query("SELECT 1").execute(&pool).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            tenants: Arc::new(PostgresTenantRepo::new(pool.clone())),
            tenant_states: Arc::new(PostgresTenantStateRepo::new(pool.clone())),
            delivery_events: Arc::new(PostgresDeliveryEventRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            tenants: Arc::new(InMemoryTenantRepo::new()),
            tenant_states: Arc::new(InMemoryTenantStateRepo::new()),
            delivery_events: Arc::new(InMemoryDeliveryEventRepo::new()),
        }
    }
}

mod actor;
mod config;
mod repos;
mod services;
mod system;

pub use actor::{ActorRegistry, TenantLease};
pub use config::Config;
use repos::Repos;
pub use repos::{IDeliveryEventRepo, ITenantRepo, ITenantStateRepo, InMemoryDeliveryEventRepo};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// Per-tenant exclusive leases: every state mutation for a tenant goes
    /// through its lease, which is what serializes the tenant's actor
    pub actors: ActorRegistry,
    pub notifier: Arc<dyn INotificationDispatcher>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl Context {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let notifier = Arc::new(WebhookNotificationDispatcher::new(Duration::from_millis(
            config.dispatch_timeout_millis,
        )));
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            actors: ActorRegistry::new(),
            notifier,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> Context {
    Context::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Context backed entirely by inmemory repositories, used in tests
pub fn setup_context_inmemory() -> Context {
    let config = Config::new();
    let notifier = Arc::new(WebhookNotificationDispatcher::new(Duration::from_millis(
        config.dispatch_timeout_millis,
    )));
    Context {
        repos: Repos::create_inmemory(),
        config,
        sys: Arc::new(RealSys {}),
        actors: ActorRegistry::new(),
        notifier,
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}

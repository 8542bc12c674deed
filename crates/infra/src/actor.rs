use duemate_domain::ID;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as TenantMutex, OwnedMutexGuard};

/// Hands out exclusive per-tenant leases. Holding a `TenantLease` is what
/// makes an operation "the actor" for that tenant: operations on the same
/// tenant queue up behind the lease and run in strict serial order, while
/// different tenants proceed independently.
#[derive(Clone, Default)]
pub struct ActorRegistry {
    leases: Arc<Mutex<HashMap<ID, Arc<TenantMutex<()>>>>>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self {
            leases: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Suspends until the tenant's current operation, if any, has finished
    pub async fn lease(&self, tenant_id: &ID) -> TenantLease {
        let lease = {
            let mut leases = self.leases.lock().unwrap();
            leases
                .entry(tenant_id.clone())
                .or_insert_with(|| Arc::new(TenantMutex::new(())))
                .clone()
        };
        TenantLease {
            _guard: lease.lock_owned().await,
        }
    }
}

/// Exclusive access to one tenant's durable state, released on drop
pub struct TenantLease {
    _guard: OwnedMutexGuard<()>,
}

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the wake poller checks for tenants whose armed wake
    /// instant has arrived
    pub wake_poll_interval_secs: u64,
    /// Cadence of the reconciliation sweep that re-evaluates every tenant
    /// with pending reminders, covering missed wakes
    pub reconciliation_interval_secs: u64,
    /// Upper bound for a single webhook dispatch
    pub dispatch_timeout_millis: u64,
    /// Upper bound for one tenant's processing pass during a sweep, so a
    /// hung tenant cannot stall the others
    pub process_sweep_timeout_millis: u64,
}

fn env_var_or<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            port: env_var_or("PORT", 5000),
            wake_poll_interval_secs: env_var_or("WAKE_POLL_INTERVAL_SECS", 30),
            reconciliation_interval_secs: env_var_or("RECONCILIATION_INTERVAL_SECS", 5 * 60),
            dispatch_timeout_millis: env_var_or("DISPATCH_TIMEOUT_MILLIS", 5 * 1000),
            process_sweep_timeout_millis: env_var_or("PROCESS_SWEEP_TIMEOUT_MILLIS", 30 * 1000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

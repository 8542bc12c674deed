use crate::reminder::process_reminders::ProcessRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, timeout};
use duemate_domain::ID;
use duemate_infra::Context;
use std::time::Duration;
use tracing::{debug, error};
use tracing_futures::Instrument;

/// Polls the persisted wake instants and resumes every tenant actor whose
/// timer has expired. Each tenant keeps exactly one armed instant, so the
/// poll returns at most one entry per tenant regardless of how many
/// reminders it tracks.
pub fn start_wake_timer_job(ctx: Context) {
    actix_web::rt::spawn(async move {
        let mut interval = interval(Duration::from_secs(ctx.config.wake_poll_interval_secs));
        loop {
            interval.tick().await;

            let now = ctx.sys.get_timestamp_millis();
            let due_tenants = ctx.repos.tenant_states.find_due_wakes(now).await;
            if due_tenants.is_empty() {
                continue;
            }
            process_tenants(ctx.clone(), due_tenants, "wake_timer").await;
        }
    });
}

/// Safety net over the wake timer: periodically re-evaluates every tenant
/// that still has a pending reminder, so reminders survive missed wakes
/// from deploys, evictions or timer drift.
pub fn start_reconciliation_job(ctx: Context) {
    actix_web::rt::spawn(async move {
        let mut interval = interval(Duration::from_secs(ctx.config.reconciliation_interval_secs));
        loop {
            interval.tick().await;

            let tenants = ctx.repos.tenant_states.find_with_pending_jobs().await;
            let context = ctx.clone();
            actix_web::rt::spawn(process_tenants(context, tenants, "reconciliation"));
        }
    });
}

/// Runs one processing pass per tenant, concurrently. Every pass is
/// individually bounded and individually caught: one slow or failing
/// tenant never delays or fails the others.
async fn process_tenants(ctx: Context, tenant_ids: Vec<ID>, trigger: &'static str) {
    let pass_timeout = Duration::from_millis(ctx.config.process_sweep_timeout_millis);

    let passes = tenant_ids
        .into_iter()
        .map(|tenant_id| {
            let ctx = ctx.clone();
            actix_web::rt::spawn(
                async move {
                    let usecase = ProcessRemindersUseCase {
                        tenant_id: tenant_id.clone(),
                    };
                    match timeout(pass_timeout, execute(usecase, &ctx)).await {
                        Ok(Ok(res)) => {
                            debug!(
                                "Processed {} reminders for tenant {}, sent {}",
                                res.processed, tenant_id, res.sent
                            );
                        }
                        Ok(Err(e)) => {
                            error!("Reminder pass failed for tenant {}: {:?}", tenant_id, e);
                        }
                        Err(_) => {
                            error!("Reminder pass timed out for tenant {}", tenant_id);
                        }
                    }
                }
                .instrument(tracing::info_span!("Reminder pass", trigger)),
            )
        })
        .collect::<Vec<_>>();

    let _ = futures::future::join_all(passes).await;
}

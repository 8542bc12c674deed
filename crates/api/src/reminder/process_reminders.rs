use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use duemate_api_structs::process_reminders::*;
use duemate_domain::{DeliveryEvent, ID};
use duemate_infra::Context;
use tracing::{error, warn};

pub async fn process_reminders_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let usecase = ProcessRemindersUseCase {
        tenant_id: path_params.tenant_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                processed: res.processed,
                sent: res.sent,
            })
        })
        .map_err(ApiError::from)
}

/// Sweeps one tenant's due reminders and delivers each of them at most
/// once. Safe to invoke any number of times and from any trigger (wake
/// timer, reconciliation, manual): every delivery is checked against the
/// delivery log first, and a reminder is only marked sent after it was
/// either dispatched or found already recorded.
#[derive(Debug)]
pub struct ProcessRemindersUseCase {
    pub tenant_id: ID,
}

#[derive(Debug)]
pub struct ProcessedReminders {
    /// Number of due jobs examined
    pub processed: usize,
    /// Number of notifications actually dispatched
    pub sent: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TenantNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TenantNotFound(tenant_id) => {
                Self::NotFound(format!("The tenant with id: {}, was not found.", tenant_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessRemindersUseCase {
    type Response = ProcessedReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::TenantNotFound(self.tenant_id.clone()))?;

        let now = ctx.sys.get_timestamp_millis();

        let _lease = ctx.actors.lease(&self.tenant_id).await;
        let mut state = match ctx
            .repos
            .tenant_states
            .find(&self.tenant_id)
            .await
            .map_err(|e| {
                error!("Unable to load state for tenant {}: {:?}", self.tenant_id, e);
                UseCaseError::StorageError
            })? {
            Some(state) => state,
            None => {
                return Ok(ProcessedReminders {
                    processed: 0,
                    sent: 0,
                })
            }
        };

        let mut processed = 0;
        let mut sent = 0;

        for schedule in state.invoices.values_mut() {
            if schedule.cancelled {
                continue;
            }
            let invoice_id = schedule.invoice_id.clone();

            for job in schedule.reminders.iter_mut() {
                if !job.is_due(now) {
                    continue;
                }
                processed += 1;

                let delivered = match ctx
                    .repos
                    .delivery_events
                    .find_by_key(&job.idempotency_key)
                    .await
                {
                    Ok(delivered) => delivered,
                    Err(e) => {
                        // Without the log we cannot tell whether this
                        // reminder already went out. Leave it pending for a
                        // later pass instead of risking a duplicate send.
                        warn!(
                            "Delivery log unavailable for reminder {}: {:?}. Leaving it pending.",
                            job.idempotency_key, e
                        );
                        continue;
                    }
                };

                if delivered.is_some() {
                    // Already delivered, e.g. before a restart or by a
                    // concurrent trigger. Catch the local state up.
                    job.sent = true;
                    continue;
                }

                match ctx.notifier.send(&tenant, &invoice_id, job.kind).await {
                    Ok(()) => {
                        job.sent = true;
                        sent += 1;
                        let event = DeliveryEvent {
                            tenant_id: self.tenant_id.clone(),
                            invoice_id: invoice_id.clone(),
                            kind: job.kind,
                            idempotency_key: job.idempotency_key.clone(),
                            delivered_at: now,
                        };
                        if let Err(e) = ctx.repos.delivery_events.insert(&event).await {
                            error!(
                                "Unable to record delivery of reminder {}: {:?}",
                                job.idempotency_key, e
                            );
                        }
                    }
                    Err(e) => {
                        warn!(
                            "Dispatch failed for invoice {} reminder {}: {:?}. Will retry.",
                            invoice_id, job.kind, e
                        );
                    }
                }
            }
        }

        ctx.repos
            .tenant_states
            .save(
                &state,
                state.next_wake_at(now),
                state.pending_job_count() as i64,
            )
            .await
            .map_err(|e| {
                error!("Unable to save state for tenant {}: {:?}", self.tenant_id, e);
                UseCaseError::StorageError
            })?;

        Ok(ProcessedReminders { processed, sent })
    }
}

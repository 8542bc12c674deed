use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use duemate_api_structs::cancel_reminders::*;
use duemate_domain::ID;
use duemate_infra::Context;
use tracing::error;

pub async fn cancel_reminders_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let usecase = CancelRemindersUseCase {
        tenant_id: path_params.tenant_id.clone(),
        invoice_id: path_params.invoice_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse { cancelled: true }))
        .map_err(ApiError::from)
}

/// Stops all remaining reminders for an invoice that has been paid or
/// voided. Cancelling an invoice that was never scheduled is a no-op, so
/// the payment flow does not have to care whether reminders existed.
#[derive(Debug)]
pub struct CancelRemindersUseCase {
    pub tenant_id: ID,
    pub invoice_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelRemindersUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "CancelReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
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
            // Nothing scheduled for this tenant yet
            None => return Ok(()),
        };

        if !state.cancel_invoice(&self.invoice_id) {
            return Ok(());
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

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::schedule_reminders::ScheduleRemindersUseCase;
    use duemate_domain::Tenant;
    use duemate_infra::{setup_context_inmemory, ISys};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    #[actix_web::test]
    async fn cancelling_disarms_the_wake_timer() {
        let mut ctx = setup_context_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(0));
        let tenant = Tenant::default();
        ctx.repos.tenants.insert(&tenant).await.unwrap();
        let invoice_id = ID::new();

        let usecase = ScheduleRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: invoice_id.clone(),
            due_date: "2026-4-30".into(),
        };
        execute(usecase, &ctx).await.unwrap();
        assert!(!ctx.repos.tenant_states.find_due_wakes(i64::MAX).await.is_empty());

        let usecase = CancelRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: invoice_id.clone(),
        };
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.repos.tenant_states.find_due_wakes(i64::MAX).await.is_empty());
        assert!(ctx.repos.tenant_states.find_with_pending_jobs().await.is_empty());

        let state = ctx
            .repos
            .tenant_states
            .find(&tenant.id)
            .await
            .unwrap()
            .unwrap();
        // The schedule is retained for status queries, only flagged
        assert!(state.invoices[&invoice_id].cancelled);
    }

    #[actix_web::test]
    async fn cancelling_an_unknown_invoice_is_a_noop() {
        let ctx = setup_context_inmemory();
        let tenant = Tenant::default();
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        let usecase = CancelRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: ID::new(),
        };
        assert!(execute(usecase, &ctx).await.is_ok());
        assert!(ctx.repos.tenant_states.find(&tenant.id).await.unwrap().is_none());
    }
}

use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use duemate_api_structs::{get_invoice_reminders, get_tenant_reminders};
use duemate_domain::{InvoiceSchedule, TenantState, ID};
use duemate_infra::Context;

pub async fn get_invoice_reminders_controller(
    path_params: web::Path<get_invoice_reminders::PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let usecase = GetInvoiceRemindersUseCase {
        tenant_id: path_params.tenant_id.clone(),
        invoice_id: path_params.invoice_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|schedule| {
            HttpResponse::Ok().json(get_invoice_reminders::APIResponse::new(schedule))
        })
        .map_err(ApiError::from)
}

pub async fn get_tenant_reminders_controller(
    path_params: web::Path<get_tenant_reminders::PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let usecase = GetTenantRemindersUseCase {
        tenant_id: path_params.tenant_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|state| HttpResponse::Ok().json(get_tenant_reminders::APIResponse::new(state)))
        .map_err(ApiError::from)
}

/// Read-only view of one invoice's reminder schedule, cancelled or not
#[derive(Debug)]
pub struct GetInvoiceRemindersUseCase {
    pub tenant_id: ID,
    pub invoice_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(invoice_id) => Self::NotFound(format!(
                "No reminder schedule found for invoice: {}",
                invoice_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetInvoiceRemindersUseCase {
    type Response = InvoiceSchedule;

    type Error = UseCaseError;

    const NAME: &'static str = "GetInvoiceReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let state = ctx
            .repos
            .tenant_states
            .find(&self.tenant_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.invoice_id.clone()))?;

        state
            .invoices
            .get(&self.invoice_id)
            .cloned()
            .ok_or_else(|| UseCaseError::NotFound(self.invoice_id.clone()))
    }
}

/// Read-only snapshot of everything the tenant's actor is tracking. A
/// tenant that never scheduled anything yields an empty snapshot.
#[derive(Debug)]
pub struct GetTenantRemindersUseCase {
    pub tenant_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTenantRemindersUseCase {
    type Response = TenantState;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTenantReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let state = ctx
            .repos
            .tenant_states
            .find(&self.tenant_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(state.unwrap_or_else(|| TenantState::new(self.tenant_id.clone())))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::schedule_reminders::ScheduleRemindersUseCase;
    use duemate_domain::Tenant;
    use duemate_infra::setup_context_inmemory;

    #[actix_web::test]
    async fn returns_the_tracked_schedule_for_one_invoice() {
        let ctx = setup_context_inmemory();
        let tenant = Tenant::default();
        ctx.repos.tenants.insert(&tenant).await.unwrap();
        let invoice_id = ID::new();

        let usecase = ScheduleRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: invoice_id.clone(),
            due_date: "2026-4-30".into(),
        };
        execute(usecase, &ctx).await.unwrap();

        let usecase = GetInvoiceRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: invoice_id.clone(),
        };
        let schedule = execute(usecase, &ctx).await.unwrap();
        assert_eq!(schedule.invoice_id, invoice_id);
        assert_eq!(schedule.due_date, "2026-4-30");
        assert!(!schedule.cancelled);
    }

    #[actix_web::test]
    async fn unknown_invoices_are_not_found() {
        let ctx = setup_context_inmemory();
        let tenant = Tenant::default();
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        let invoice_id = ID::new();
        let usecase = GetInvoiceRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: invoice_id.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(invoice_id));
    }

    #[actix_web::test]
    async fn tenant_snapshot_is_empty_before_any_scheduling() {
        let ctx = setup_context_inmemory();
        let tenant = Tenant::default();
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        let usecase = GetTenantRemindersUseCase {
            tenant_id: tenant.id.clone(),
        };
        let state = execute(usecase, &ctx).await.unwrap();
        assert_eq!(state.tenant_id, tenant.id);
        assert!(state.invoices.is_empty());
    }
}

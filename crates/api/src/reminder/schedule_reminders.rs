use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use duemate_api_structs::schedule_reminders::*;
use duemate_domain::{
    due_date_midnight_millis, format_due_date, is_valid_due_date, InvoiceSchedule, TenantState, ID,
};
use duemate_infra::Context;
use tracing::error;

pub async fn schedule_reminders_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let body = body.0;
    let usecase = ScheduleRemindersUseCase {
        tenant_id: path_params.tenant_id.clone(),
        invoice_id: body.invoice_id,
        due_date: body.due_date,
    };

    execute(usecase, &ctx)
        .await
        .map(|scheduled| HttpResponse::Ok().json(APIResponse { scheduled }))
        .map_err(ApiError::from)
}

/// Creates the reminder jobs for an invoice that has just been sent to a
/// customer. Replaces whatever was scheduled for the invoice before, so a
/// duplicated "invoice sent" trigger never duplicates reminders.
#[derive(Debug)]
pub struct ScheduleRemindersUseCase {
    pub tenant_id: ID,
    pub invoice_id: ID,
    pub due_date: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidDueDate(String),
    TenantNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidDueDate(due_date) => Self::BadClientData(format!(
                "Invalid due date: {}, expected yyyy-mm-dd",
                due_date
            )),
            UseCaseError::TenantNotFound(tenant_id) => {
                Self::NotFound(format!("The tenant with id: {}, was not found.", tenant_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleRemindersUseCase {
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::TenantNotFound(self.tenant_id.clone()))?;

        let (year, month, day) = is_valid_due_date(&self.due_date)
            .map_err(|_| UseCaseError::InvalidDueDate(self.due_date.clone()))?;
        let due_date = format_due_date(year, month, day);
        let due_ts = due_date_midnight_millis(&tenant.settings.timezone, year, month, day)
            .ok_or_else(|| UseCaseError::InvalidDueDate(self.due_date.clone()))?;

        let now = ctx.sys.get_timestamp_millis();

        let _lease = ctx.actors.lease(&self.tenant_id).await;
        let mut state = ctx
            .repos
            .tenant_states
            .find(&self.tenant_id)
            .await
            .map_err(|e| {
                error!("Unable to load state for tenant {}: {:?}", self.tenant_id, e);
                UseCaseError::StorageError
            })?
            .unwrap_or_else(|| TenantState::new(self.tenant_id.clone()));

        let schedule = InvoiceSchedule::new(self.invoice_id.clone(), due_date, due_ts, now);
        let scheduled = state.upsert_schedule(schedule);

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

        Ok(scheduled)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use duemate_domain::{ReminderKind, Tenant, BEFORE_DUE_OFFSET_MILLIS};
    use duemate_infra::{setup_context_inmemory, ISys};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    struct TestContext {
        ctx: Context,
        tenant: Tenant,
    }

    async fn setup() -> TestContext {
        let ctx = setup_context_inmemory();
        let tenant = Tenant::default();
        ctx.repos.tenants.insert(&tenant).await.unwrap();
        TestContext { ctx, tenant }
    }

    fn due_ts(datestr: &str) -> i64 {
        let (year, month, day) = is_valid_due_date(datestr).unwrap();
        Utc.ymd(year, month, day).and_hms(0, 0, 0).timestamp_millis()
    }

    #[actix_web::test]
    async fn schedules_three_reminders_for_a_future_due_date() {
        let TestContext { mut ctx, tenant } = setup().await;
        let due = due_ts("2026-4-30");
        ctx.sys = Arc::new(StaticTimeSys(due - 30 * 24 * 60 * 60 * 1000));

        let usecase = ScheduleRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: ID::new(),
            due_date: "2026-4-30".into(),
        };

        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap(), 3);

        // The wake timer is armed at the before-due instant
        let before_due = due - BEFORE_DUE_OFFSET_MILLIS;
        let due_wakes = ctx.repos.tenant_states.find_due_wakes(before_due).await;
        assert_eq!(due_wakes, vec![tenant.id.clone()]);
        let due_wakes = ctx
            .repos
            .tenant_states
            .find_due_wakes(before_due - 1)
            .await;
        assert!(due_wakes.is_empty());
    }

    #[actix_web::test]
    async fn schedules_only_the_overdue_reminder_for_a_past_due_date() {
        let TestContext { mut ctx, tenant } = setup().await;
        let due = due_ts("2026-4-30");
        ctx.sys = Arc::new(StaticTimeSys(due + 10 * 24 * 60 * 60 * 1000));

        let usecase = ScheduleRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: ID::new(),
            due_date: "2026-4-30".into(),
        };

        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap(), 1);

        let state = ctx
            .repos
            .tenant_states
            .find(&tenant.id)
            .await
            .unwrap()
            .unwrap();
        let jobs = state.invoices.values().next().unwrap();
        assert_eq!(jobs.reminders[0].kind, ReminderKind::AfterDue);
    }

    #[actix_web::test]
    async fn scheduling_twice_replaces_previous_reminders() {
        let TestContext { mut ctx, tenant } = setup().await;
        let due = due_ts("2026-4-30");
        ctx.sys = Arc::new(StaticTimeSys(due - 30 * 24 * 60 * 60 * 1000));
        let invoice_id = ID::new();

        for _ in 0..2 {
            let usecase = ScheduleRemindersUseCase {
                tenant_id: tenant.id.clone(),
                invoice_id: invoice_id.clone(),
                due_date: "2026-4-30".into(),
            };
            let res = execute(usecase, &ctx).await;
            assert_eq!(res.unwrap(), 3);
        }

        let state = ctx
            .repos
            .tenant_states
            .find(&tenant.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.invoices.len(), 1);
        assert_eq!(state.invoices[&invoice_id].reminders.len(), 3);
        assert_eq!(state.pending_job_count(), 3);
    }

    #[actix_web::test]
    async fn interprets_due_dates_in_the_tenant_timezone() {
        let TestContext { mut ctx, tenant: _ } = setup().await;
        let mut tenant = Tenant::default();
        tenant.settings.set_timezone("Europe/Oslo");
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        let due_utc = due_ts("2026-1-15");
        ctx.sys = Arc::new(StaticTimeSys(due_utc - 30 * 24 * 60 * 60 * 1000));

        let usecase = ScheduleRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: ID::new(),
            due_date: "2026-1-15".into(),
        };
        execute(usecase, &ctx).await.unwrap();

        let state = ctx
            .repos
            .tenant_states
            .find(&tenant.id)
            .await
            .unwrap()
            .unwrap();
        let schedule = state.invoices.values().next().unwrap();
        // Midnight in Oslo (UTC+1 in January) is one hour before midnight UTC
        assert_eq!(schedule.due_ts, due_utc - 60 * 60 * 1000);
    }

    #[actix_web::test]
    async fn rejects_malformed_due_dates_without_mutating_state() {
        let TestContext { ctx, tenant } = setup().await;

        let usecase = ScheduleRemindersUseCase {
            tenant_id: tenant.id.clone(),
            invoice_id: ID::new(),
            due_date: "2026-13-40".into(),
        };

        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::InvalidDueDate("2026-13-40".into())
        );

        let state = ctx.repos.tenant_states.find(&tenant.id).await.unwrap();
        assert!(state.is_none());
        assert!(ctx.repos.tenant_states.find_due_wakes(i64::MAX).await.is_empty());
    }

    #[actix_web::test]
    async fn rejects_unknown_tenants() {
        let TestContext { ctx, tenant: _ } = setup().await;

        let usecase = ScheduleRemindersUseCase {
            tenant_id: ID::new(),
            invoice_id: ID::new(),
            due_date: "2026-4-30".into(),
        };

        let res = execute(usecase, &ctx).await;
        assert!(matches!(res.unwrap_err(), UseCaseError::TenantNotFound(_)));
    }
}

use duemate_domain::{InvoiceSchedule, ReminderJob, ReminderKind, TenantState, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderJobDTO {
    pub invoice_id: ID,
    pub kind: ReminderKind,
    pub scheduled_at: i64,
    pub idempotency_key: String,
    pub sent: bool,
}

impl ReminderJobDTO {
    pub fn new(job: ReminderJob) -> Self {
        Self {
            invoice_id: job.invoice_id,
            kind: job.kind,
            scheduled_at: job.scheduled_at,
            idempotency_key: job.idempotency_key,
            sent: job.sent,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceScheduleDTO {
    pub invoice_id: ID,
    pub due_date: String,
    pub due_ts: i64,
    pub reminders: Vec<ReminderJobDTO>,
    pub cancelled: bool,
}

impl InvoiceScheduleDTO {
    pub fn new(schedule: InvoiceSchedule) -> Self {
        Self {
            invoice_id: schedule.invoice_id,
            due_date: schedule.due_date,
            due_ts: schedule.due_ts,
            reminders: schedule
                .reminders
                .into_iter()
                .map(ReminderJobDTO::new)
                .collect(),
            cancelled: schedule.cancelled,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TenantStateDTO {
    pub tenant_id: ID,
    /// Ordered by due date, then invoice id, for stable output
    pub invoices: Vec<InvoiceScheduleDTO>,
}

impl TenantStateDTO {
    pub fn new(state: TenantState) -> Self {
        let mut invoices = state
            .invoices
            .into_iter()
            .map(|(_, schedule)| InvoiceScheduleDTO::new(schedule))
            .collect::<Vec<_>>();
        invoices.sort_by(|s1, s2| {
            s1.due_ts
                .cmp(&s2.due_ts)
                .then_with(|| s1.invoice_id.as_string().cmp(&s2.invoice_id.as_string()))
        });
        Self {
            tenant_id: state.tenant_id,
            invoices,
        }
    }
}

mod date;
mod delivery;
mod reminder;
mod shared;
mod tenant;
mod tenant_state;

pub use date::{due_date_midnight_millis, format_due_date, is_valid_due_date};
pub use delivery::DeliveryEvent;
pub use reminder::{
    compute_reminder_jobs, reminder_idempotency_key, InvoiceSchedule, ReminderJob, ReminderKind,
    AFTER_DUE_OFFSET_MILLIS, BEFORE_DUE_OFFSET_MILLIS,
};
pub use shared::entity::{Entity, ID};
pub use tenant::{Tenant, TenantSettings, TenantWebhookSettings};
pub use tenant_state::TenantState;

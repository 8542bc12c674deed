use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// How far before the due date the early reminder fires
pub const BEFORE_DUE_OFFSET_MILLIS: i64 = 3 * MILLIS_PER_DAY;
/// How long after the due date the overdue reminder fires
pub const AFTER_DUE_OFFSET_MILLIS: i64 = 7 * MILLIS_PER_DAY;

/// The timing rule a `ReminderJob` is tied to, relative to the
/// invoice due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    BeforeDue,
    OnDue,
    AfterDue,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeDue => "before_due",
            Self::OnDue => "on_due",
            Self::AfterDue => "after_due",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReminderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before_due" => Ok(Self::BeforeDue),
            "on_due" => Ok(Self::OnDue),
            "after_due" => Ok(Self::AfterDue),
            _ => Err(anyhow::Error::msg(format!("Unknown reminder kind: {}", s))),
        }
    }
}

/// Deterministic deduplication key for one reminder. The same invoice,
/// kind and due date always map to the same key, across restarts, so a
/// delivery recorded under it suppresses every later attempt to send the
/// same reminder again.
pub fn reminder_idempotency_key(invoice_id: &ID, kind: ReminderKind, due_date: &str) -> String {
    format!("{}:{}:{}", invoice_id, kind.as_str(), due_date)
}

/// One scheduled notification for an invoice. `sent` only ever goes from
/// false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderJob {
    pub invoice_id: ID,
    pub kind: ReminderKind,
    /// The timestamp in millis at which this reminder should be delivered
    pub scheduled_at: i64,
    pub idempotency_key: String,
    pub sent: bool,
}

impl ReminderJob {
    pub fn is_due(&self, now: i64) -> bool {
        !self.sent && self.scheduled_at <= now
    }
}

/// Computes the reminder jobs for an invoice due at `due_ts`.
///
/// The before-due and on-due reminders are only created when their instant
/// is still in the future. The after-due reminder is always created: even
/// when its instant has already passed it is picked up by the next
/// processing pass.
pub fn compute_reminder_jobs(
    invoice_id: &ID,
    due_date: &str,
    due_ts: i64,
    now: i64,
) -> Vec<ReminderJob> {
    let candidates = vec![
        (ReminderKind::BeforeDue, due_ts - BEFORE_DUE_OFFSET_MILLIS),
        (ReminderKind::OnDue, due_ts),
        (ReminderKind::AfterDue, due_ts + AFTER_DUE_OFFSET_MILLIS),
    ];

    candidates
        .into_iter()
        .filter(|(kind, scheduled_at)| *kind == ReminderKind::AfterDue || *scheduled_at > now)
        .map(|(kind, scheduled_at)| ReminderJob {
            invoice_id: invoice_id.clone(),
            kind,
            scheduled_at,
            idempotency_key: reminder_idempotency_key(invoice_id, kind, due_date),
            sent: false,
        })
        .collect()
}

/// The reminder obligations of a single invoice. Never physically deleted:
/// paid or voided invoices keep their schedule around with `cancelled` set
/// so status queries can still explain what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSchedule {
    pub invoice_id: ID,
    /// Canonical `yyyy-mm-dd` due date the reminders were derived from
    pub due_date: String,
    /// Due date resolved to midnight in the tenant timezone, in millis
    pub due_ts: i64,
    /// Ordered by `scheduled_at` ascending
    pub reminders: Vec<ReminderJob>,
    pub cancelled: bool,
}

impl InvoiceSchedule {
    pub fn new(invoice_id: ID, due_date: String, due_ts: i64, now: i64) -> Self {
        let reminders = compute_reminder_jobs(&invoice_id, &due_date, due_ts, now);
        Self {
            invoice_id,
            due_date,
            due_ts,
            reminders,
            cancelled: false,
        }
    }
}

impl Entity for InvoiceSchedule {
    fn id(&self) -> &ID {
        &self.invoice_id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        let invoice_id = ID::new();
        let key1 = reminder_idempotency_key(&invoice_id, ReminderKind::OnDue, "2026-3-1");
        let key2 = reminder_idempotency_key(&invoice_id, ReminderKind::OnDue, "2026-3-1");
        assert_eq!(key1, key2);
    }

    #[test]
    fn key_differs_per_invoice_kind_and_date() {
        let invoice_id = ID::new();
        let key = reminder_idempotency_key(&invoice_id, ReminderKind::OnDue, "2026-3-1");

        let other_invoice = reminder_idempotency_key(&ID::new(), ReminderKind::OnDue, "2026-3-1");
        let other_kind = reminder_idempotency_key(&invoice_id, ReminderKind::AfterDue, "2026-3-1");
        let other_date = reminder_idempotency_key(&invoice_id, ReminderKind::OnDue, "2026-3-2");

        assert_ne!(key, other_invoice);
        assert_ne!(key, other_kind);
        assert_ne!(key, other_date);
    }

    #[test]
    fn schedules_all_three_reminders_for_a_future_due_date() {
        let now = 1000;
        let due_ts = now + 30 * MILLIS_PER_DAY;
        let jobs = compute_reminder_jobs(&ID::new(), "2026-3-1", due_ts, now);

        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].kind, ReminderKind::BeforeDue);
        assert_eq!(jobs[0].scheduled_at, due_ts - BEFORE_DUE_OFFSET_MILLIS);
        assert_eq!(jobs[1].kind, ReminderKind::OnDue);
        assert_eq!(jobs[1].scheduled_at, due_ts);
        assert_eq!(jobs[2].kind, ReminderKind::AfterDue);
        assert_eq!(jobs[2].scheduled_at, due_ts + AFTER_DUE_OFFSET_MILLIS);
        assert!(jobs.iter().all(|job| !job.sent));
    }

    #[test]
    fn only_schedules_the_overdue_reminder_for_a_past_due_date() {
        let now = 100 * MILLIS_PER_DAY;
        let due_ts = now - 10 * MILLIS_PER_DAY;
        let jobs = compute_reminder_jobs(&ID::new(), "2026-3-1", due_ts, now);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].kind, ReminderKind::AfterDue);
        // Already past, still kept so the next pass delivers it
        assert!(jobs[0].is_due(now));
    }

    #[test]
    fn drops_only_the_elapsed_reminders_for_a_near_due_date() {
        let now = 100 * MILLIS_PER_DAY;
        // Due tomorrow: the before-due instant has passed, on-due has not
        let due_ts = now + MILLIS_PER_DAY;
        let jobs = compute_reminder_jobs(&ID::new(), "2026-3-1", due_ts, now);

        let kinds = jobs.iter().map(|job| job.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![ReminderKind::OnDue, ReminderKind::AfterDue]);
    }

    #[test]
    fn jobs_are_ordered_by_scheduled_at() {
        let now = 0;
        let jobs = compute_reminder_jobs(&ID::new(), "2026-3-1", 30 * MILLIS_PER_DAY, now);
        let instants = jobs.iter().map(|job| job.scheduled_at).collect::<Vec<_>>();
        let mut sorted = instants.clone();
        sorted.sort_unstable();
        assert_eq!(instants, sorted);
    }
}

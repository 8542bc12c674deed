use crate::reminder::InvoiceSchedule;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All reminder obligations of one tenant. Exclusively owned by whoever
/// holds the tenant's actor lease: every mutation is a read-modify-write
/// of the whole state followed by a single persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantState {
    pub tenant_id: ID,
    pub invoices: HashMap<ID, InvoiceSchedule>,
}

impl TenantState {
    pub fn new(tenant_id: ID) -> Self {
        Self {
            tenant_id,
            invoices: HashMap::new(),
        }
    }

    /// Replaces any prior schedule for the invoice. Scheduling the same
    /// invoice twice therefore never duplicates reminders.
    pub fn upsert_schedule(&mut self, schedule: InvoiceSchedule) -> usize {
        let scheduled = schedule.reminders.len();
        self.invoices.insert(schedule.invoice_id.clone(), schedule);
        scheduled
    }

    /// Marks the invoice schedule cancelled. Returns false when the
    /// invoice is not tracked, which callers treat as a no-op.
    pub fn cancel_invoice(&mut self, invoice_id: &ID) -> bool {
        match self.invoices.get_mut(invoice_id) {
            Some(schedule) => {
                schedule.cancelled = true;
                true
            }
            None => false,
        }
    }

    /// The instant the tenant actor should next wake: the minimum
    /// `scheduled_at` over all unsent jobs of uncancelled schedules that
    /// are still in the future. `None` disarms the wake timer.
    pub fn next_wake_at(&self, now: i64) -> Option<i64> {
        self.invoices
            .values()
            .filter(|schedule| !schedule.cancelled)
            .flat_map(|schedule| schedule.reminders.iter())
            .filter(|job| !job.sent && job.scheduled_at > now)
            .map(|job| job.scheduled_at)
            .min()
    }

    /// Number of non-terminal reminder obligations, due or not. Tenants
    /// with a count above zero are visited by the reconciliation sweep.
    pub fn pending_job_count(&self) -> usize {
        self.invoices
            .values()
            .filter(|schedule| !schedule.cancelled)
            .flat_map(|schedule| schedule.reminders.iter())
            .filter(|job| !job.sent)
            .count()
    }
}

impl Entity for TenantState {
    fn id(&self) -> &ID {
        &self.tenant_id
    }
}

use crate::reminder::ReminderKind;
use crate::shared::entity::ID;

/// Append-only record of one successfully delivered reminder, keyed by
/// the reminder idempotency key. Consulted before every dispatch so a
/// reminder is never sent twice even when a processing pass is replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEvent {
    pub tenant_id: ID,
    pub invoice_id: ID,
    pub kind: ReminderKind,
    pub idempotency_key: String,
    pub delivered_at: i64,
}

use crate::dtos::{InvoiceScheduleDTO, TenantStateDTO};
use duemate_domain::{InvoiceSchedule, TenantState, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceScheduleResponse {
    pub schedule: InvoiceScheduleDTO,
}

impl InvoiceScheduleResponse {
    pub fn new(schedule: InvoiceSchedule) -> Self {
        Self {
            schedule: InvoiceScheduleDTO::new(schedule),
        }
    }
}

pub mod schedule_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub invoice_id: ID,
        /// Due date as `yyyy-mm-dd`
        pub due_date: String,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduled: usize,
    }
}

pub mod cancel_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
        pub invoice_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub cancelled: bool,
    }
}

pub mod process_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub processed: usize,
        pub sent: usize,
    }
}

pub mod get_invoice_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
        pub invoice_id: ID,
    }

    pub type APIResponse = InvoiceScheduleResponse;
}

pub mod get_tenant_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub state: TenantStateDTO,
    }

    impl APIResponse {
        pub fn new(state: TenantState) -> Self {
            Self {
                state: TenantStateDTO::new(state),
            }
        }
    }
}

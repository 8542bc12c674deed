mod cancel_reminders;
mod get_reminder_status;
pub mod process_reminders;
mod schedule_reminders;

use actix_web::web;
use cancel_reminders::cancel_reminders_controller;
use get_reminder_status::{get_invoice_reminders_controller, get_tenant_reminders_controller};
use process_reminders::process_reminders_controller;
use schedule_reminders::schedule_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/reminders",
        web::post().to(schedule_reminders_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/reminders",
        web::get().to(get_tenant_reminders_controller),
    );

    // Registered before the `{invoice_id}` routes so that "process" is
    // never captured as an invoice id
    cfg.route(
        "/tenants/{tenant_id}/reminders/process",
        web::post().to(process_reminders_controller),
    );

    cfg.route(
        "/tenants/{tenant_id}/reminders/{invoice_id}",
        web::get().to(get_invoice_reminders_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/reminders/{invoice_id}",
        web::delete().to(cancel_reminders_controller),
    );
}

use duemate_domain::{ReminderKind, Tenant, ID};
use serde::Serialize;
use std::time::Duration;

/// Delivers one reminder to the outside world. Implementations must be
/// safe to retry: the caller only re-invokes `send` for a reminder whose
/// previous attempt failed.
#[async_trait::async_trait]
pub trait INotificationDispatcher: Send + Sync {
    async fn send(&self, tenant: &Tenant, invoice_id: &ID, kind: ReminderKind)
        -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderNotificationBody<'a> {
    invoice_id: &'a ID,
    kind: ReminderKind,
}

/// Posts reminders to the webhook the tenant has registered, signed with
/// the tenant's webhook key
pub struct WebhookNotificationDispatcher {
    client: reqwest::Client,
}

impl WebhookNotificationDispatcher {
    pub fn new(dispatch_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(dispatch_timeout)
            .build()
            .expect("To build the webhook http client");
        Self { client }
    }
}

#[async_trait::async_trait]
impl INotificationDispatcher for WebhookNotificationDispatcher {
    async fn send(
        &self,
        tenant: &Tenant,
        invoice_id: &ID,
        kind: ReminderKind,
    ) -> anyhow::Result<()> {
        let webhook = match &tenant.settings.webhook {
            Some(webhook) => webhook,
            None => {
                return Err(anyhow::Error::msg(format!(
                    "Tenant {} has no webhook configured",
                    tenant.id
                )))
            }
        };

        self.client
            .post(&webhook.url)
            .header("duemate-webhook-key", &webhook.key)
            .json(&ReminderNotificationBody { invoice_id, kind })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

use crate::shared::entity::{Entity, ID};
use chrono_tz::{Tz, UTC};
use duemate_utils::create_random_secret;

const WEBHOOK_KEY_LEN: usize = 30;

/// A `Tenant` is one business using the invoicing product. All reminder
/// state is scoped to a tenant and owned by that tenant's actor; tenants
/// never coordinate with each other.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: ID,
    pub settings: TenantSettings,
}

#[derive(Debug, Clone)]
pub struct TenantSettings {
    /// Due dates are interpreted as midnight in this timezone
    pub timezone: Tz,
    pub webhook: Option<TenantWebhookSettings>,
}

#[derive(Debug, Clone)]
pub struct TenantWebhookSettings {
    pub url: String,
    /// Signing key included with every webhook delivery so the receiver
    /// can authenticate the sender
    pub key: String,
}

impl TenantSettings {
    pub fn set_webhook_url(&mut self, webhook_url: Option<String>) -> bool {
        match webhook_url {
            Some(url) => {
                if let Ok(parsed_url) = url::Url::parse(&url) {
                    let allowed_schemes = vec!["https", "http"];
                    if !allowed_schemes.contains(&parsed_url.scheme()) {
                        return false;
                    }
                } else {
                    return false;
                }

                if let Some(webhook_settings) = self.webhook.as_mut() {
                    webhook_settings.url = url;
                } else {
                    self.webhook = Some(TenantWebhookSettings {
                        url,
                        key: create_random_secret(WEBHOOK_KEY_LEN),
                    });
                }
            }
            None => {
                self.webhook = None;
            }
        };
        true
    }

    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tzid) => {
                self.timezone = tzid;
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            timezone: UTC,
            webhook: None,
        }
    }
}

impl Tenant {
    pub fn new() -> Self {
        Self {
            id: Default::default(),
            settings: Default::default(),
        }
    }
}

impl Default for Tenant {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Tenant {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_http_and_https_webhook_urls() {
        let mut settings = TenantSettings::default();
        assert!(settings.set_webhook_url(Some("https://billing.example.com/hooks".into())));
        assert!(settings.set_webhook_url(Some("http://localhost:3000/hooks".into())));
        assert!(settings.webhook.is_some());
    }

    #[test]
    fn rejects_invalid_webhook_urls() {
        let mut settings = TenantSettings::default();
        for url in &["ftp://example.com", "not a url", ""] {
            assert!(!settings.set_webhook_url(Some((*url).into())));
        }
        assert!(settings.webhook.is_none());
    }

    #[test]
    fn updating_the_webhook_url_keeps_the_signing_key() {
        let mut settings = TenantSettings::default();
        settings.set_webhook_url(Some("https://one.example.com".into()));
        let key = settings.webhook.as_ref().unwrap().key.clone();
        settings.set_webhook_url(Some("https://two.example.com".into()));
        assert_eq!(settings.webhook.as_ref().unwrap().key, key);
    }

    #[test]
    fn clearing_the_webhook_disables_it() {
        let mut settings = TenantSettings::default();
        settings.set_webhook_url(Some("https://one.example.com".into()));
        settings.set_webhook_url(None);
        assert!(settings.webhook.is_none());
    }

    #[test]
    fn parses_known_timezones() {
        let mut settings = TenantSettings::default();
        assert!(settings.set_timezone("Europe/Oslo"));
        assert_eq!(settings.timezone, chrono_tz::Europe::Oslo);
        assert!(!settings.set_timezone("Mars/Olympus_Mons"));
        assert_eq!(settings.timezone, chrono_tz::Europe::Oslo);
    }
}

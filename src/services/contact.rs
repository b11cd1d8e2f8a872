use chrono::Utc;

use super::types::{ServiceContext, ServiceFuture};
use acl;
use config;
use errors::Error;
use models::*;
use repos::*;
use whatsapp;

/// Business number from the settings row, falling back to the configured one
pub fn business_number(session: &mut RepoSession, whatsapp: &config::WhatsApp) -> RepoResult<String> {
    let settings = session.admin_settings().select_one(AdminSettingsFilter::default())?;
    Ok(settings
        .map(|settings| settings.whatsapp_business_number)
        .filter(|number| !number.trim().is_empty())
        .unwrap_or_else(|| whatsapp.default_business_number.clone()))
}

/// Deep link for whichever device sent the request
pub fn link_for(whatsapp: &config::WhatsApp, business_number: &str, message: &str, user_agent: Option<&str>) -> String {
    let is_mobile = user_agent.map(whatsapp::is_mobile_user_agent).unwrap_or(false);
    whatsapp::generate_link(business_number, message, is_mobile, &whatsapp.country_code)
}

pub trait ContactService {
    /// Number, hours and expected response time shown by the contact widget
    fn contact_info(&self, user_agent: Option<String>) -> ServiceFuture<ContactInfo>;
    /// Deep link with a custom message, the default greeting or a bulk-order message
    fn link(&self, payload: ContactLinkPayload, user_agent: Option<String>) -> ServiceFuture<ContactLink>;
    fn get_settings(&self) -> ServiceFuture<AdminSettings>;
    /// Updates the settings row, creating it on first use
    fn update_settings(&self, payload: AdminSettingsPayload) -> ServiceFuture<AdminSettings>;
}

pub struct ContactServiceImpl {
    pub ctx: ServiceContext,
}

impl ContactService for ContactServiceImpl {
    fn contact_info(&self, user_agent: Option<String>) -> ServiceFuture<ContactInfo> {
        let whatsapp_config = self.ctx.whatsapp.clone();
        self.ctx.spawn_on_pool(move |session| {
            let settings = session.admin_settings().select_one(AdminSettingsFilter::default())?;
            let (number, hours) = match settings {
                Some(settings) => {
                    let number = if settings.whatsapp_business_number.trim().is_empty() {
                        whatsapp_config.default_business_number.clone()
                    } else {
                        settings.whatsapp_business_number
                    };
                    (number, settings.business_hours)
                }
                None => (
                    whatsapp_config.default_business_number.clone(),
                    whatsapp::default_business_hours(),
                ),
            };

            let now = whatsapp::local_time(Utc::now(), whatsapp_config.utc_offset_seconds);
            let user_agent = user_agent.as_ref().map(String::as_str);
            Ok(ContactInfo {
                is_open: whatsapp::is_business_open(&hours, &now),
                estimated_response_time: whatsapp::estimated_response_time(&hours, &now).to_string(),
                default_message: whatsapp::DEFAULT_GREETING.to_string(),
                whatsapp_link: link_for(&whatsapp_config, &number, whatsapp::DEFAULT_GREETING, user_agent),
                whatsapp_business_number: number,
                business_hours: hours,
            })
        })
    }

    fn link(&self, payload: ContactLinkPayload, user_agent: Option<String>) -> ServiceFuture<ContactLink> {
        let whatsapp_config = self.ctx.whatsapp.clone();
        self.ctx.spawn_on_pool(move |session| {
            let message = match (payload.bulk_item_count, non_blank(payload.message)) {
                (Some(count), _) if count < 1 => {
                    return Err(Error::invalid_input("bulk_item_count", "item count must be at least 1").into());
                }
                (Some(count), _) => whatsapp::bulk_inquiry_message(count),
                (None, Some(message)) => message,
                (None, None) => whatsapp::DEFAULT_GREETING.to_string(),
            };

            let number = business_number(session, &whatsapp_config)?;
            Ok(ContactLink {
                whatsapp_link: link_for(&whatsapp_config, &number, &message, user_agent.as_ref().map(String::as_str)),
                message,
            })
        })
    }

    fn get_settings(&self) -> ServiceFuture<AdminSettings> {
        let login = self.ctx.login.clone();
        let whatsapp_config = self.ctx.whatsapp.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            match session.admin_settings().select_one(AdminSettingsFilter::default())? {
                Some(settings) => Ok(settings),
                None => Ok(NewAdminSettings::with_defaults(whatsapp_config.default_business_number.clone()).into()),
            }
        })
    }

    fn update_settings(&self, payload: AdminSettingsPayload) -> ServiceFuture<AdminSettings> {
        let login = self.ctx.login.clone();
        let whatsapp_config = self.ctx.whatsapp.clone();
        self.ctx.spawn_transaction(move |session| {
            acl::ensure_admin(&login)?;
            let data = payload.into_update_data()?;

            let current = session.admin_settings().select_one(AdminSettingsFilter::default())?;
            let settings = match current {
                Some(settings) => settings,
                None => {
                    info!("Creating admin settings");
                    session
                        .admin_settings()
                        .insert(NewAdminSettings::with_defaults(whatsapp_config.default_business_number.clone()))?
                }
            };

            let updated = session.admin_settings().update(AdminSettingsUpdater {
                filter: AdminSettingsFilter { id: Some(settings.id) },
                data,
            })?;
            Ok(updated.into_iter().next().ok_or(Error::NotFound)?)
        })
    }
}

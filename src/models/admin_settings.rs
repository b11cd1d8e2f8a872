use chrono::prelude::*;
use serde_json::Value;
use validator::Validate;

use super::common::*;
use errors::Error;
use whatsapp::{default_business_hours, BusinessHours};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    pub id: AdminSettingsId,
    pub whatsapp_business_number: String,
    pub business_hours: BusinessHours,
    pub message_templates: Value,
    pub auto_response_enabled: bool,
    pub notification_email: Option<String>,
    pub notification_preferences: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewAdminSettings {
    pub id: AdminSettingsId,
    pub whatsapp_business_number: String,
    pub business_hours: BusinessHours,
    pub message_templates: Value,
    pub auto_response_enabled: bool,
    pub notification_email: Option<String>,
    pub notification_preferences: Value,
    pub created_at: DateTime<Utc>,
}

impl NewAdminSettings {
    /// First settings row, seeded from the configured fallback number
    pub fn with_defaults(whatsapp_business_number: String) -> Self {
        Self {
            id: AdminSettingsId::new(),
            whatsapp_business_number,
            business_hours: default_business_hours(),
            message_templates: json!({}),
            auto_response_enabled: true,
            notification_email: None,
            notification_preferences: json!({}),
            created_at: Utc::now(),
        }
    }
}

impl From<NewAdminSettings> for AdminSettings {
    fn from(v: NewAdminSettings) -> Self {
        Self {
            id: v.id,
            whatsapp_business_number: v.whatsapp_business_number,
            business_hours: v.business_hours,
            message_templates: v.message_templates,
            auto_response_enabled: v.auto_response_enabled,
            notification_email: v.notification_email,
            notification_preferences: v.notification_preferences,
            created_at: v.created_at,
            updated_at: v.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct AdminSettingsPayload {
    #[validate(length(min = "7", max = "20", message = "Enter a valid WhatsApp number"))]
    pub whatsapp_business_number: Option<String>,
    pub business_hours: Option<BusinessHours>,
    pub message_templates: Option<Value>,
    pub auto_response_enabled: Option<bool>,
    #[validate(email(message = "Invalid email address"))]
    pub notification_email: Option<String>,
    pub notification_preferences: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminSettingsUpdateData {
    pub whatsapp_business_number: Option<String>,
    pub business_hours: Option<BusinessHours>,
    pub message_templates: Option<Value>,
    pub auto_response_enabled: Option<bool>,
    pub notification_email: Option<Option<String>>,
    pub notification_preferences: Option<Value>,
}

impl AdminSettingsPayload {
    pub fn into_update_data(self) -> Result<AdminSettingsUpdateData, Error> {
        let notification_email = self.notification_email.map(|s| s.trim().to_string());
        let payload = AdminSettingsPayload {
            whatsapp_business_number: self
                .whatsapp_business_number
                .map(|s| s.chars().filter(|c| c.is_ascii_digit()).collect()),
            notification_email: notification_email.clone().filter(|s| !s.is_empty()),
            ..self
        };
        payload.validate().map_err(Error::Validate)?;

        if let Some(ref hours) = payload.business_hours {
            check_business_hours(hours)?;
        }

        Ok(AdminSettingsUpdateData {
            whatsapp_business_number: payload.whatsapp_business_number,
            business_hours: payload.business_hours,
            message_templates: payload.message_templates,
            auto_response_enabled: payload.auto_response_enabled,
            notification_email: notification_email.map(|s| if s.is_empty() { None } else { Some(s) }),
            notification_preferences: payload.notification_preferences,
        })
    }
}

const WEEKDAYS: &[&str] = &["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

fn check_business_hours(hours: &BusinessHours) -> Result<(), Error> {
    for (day, day_hours) in hours {
        if !WEEKDAYS.contains(&day.as_str()) {
            return Err(Error::invalid_input("business_hours", format!("unknown weekday '{}'", day)));
        }
        for time in day_hours.open.iter().chain(day_hours.close.iter()) {
            if NaiveTime::parse_from_str(time, "%H:%M").is_err() || time.len() != 5 {
                return Err(Error::invalid_input(
                    "business_hours",
                    format!("'{}' on {} is not an HH:MM time", time, day),
                ));
            }
        }
    }
    Ok(())
}

impl AdminSettingsUpdateData {
    pub fn apply(&self, settings: &mut AdminSettings) {
        if let Some(ref v) = self.whatsapp_business_number {
            settings.whatsapp_business_number = v.clone();
        }
        if let Some(ref v) = self.business_hours {
            settings.business_hours = v.clone();
        }
        if let Some(ref v) = self.message_templates {
            settings.message_templates = v.clone();
        }
        if let Some(v) = self.auto_response_enabled {
            settings.auto_response_enabled = v;
        }
        if let Some(ref v) = self.notification_email {
            settings.notification_email = v.clone();
        }
        if let Some(ref v) = self.notification_preferences {
            settings.notification_preferences = v.clone();
        }
        settings.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminSettingsFilter {
    pub id: Option<AdminSettingsId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdminSettingsUpdater {
    pub filter: AdminSettingsFilter,
    pub data: AdminSettingsUpdateData,
}

/// What the contact widget shows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub whatsapp_business_number: String,
    pub business_hours: BusinessHours,
    pub is_open: bool,
    pub estimated_response_time: String,
    pub default_message: String,
    pub whatsapp_link: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactLinkPayload {
    pub message: Option<String>,
    /// Builds the bulk-order message for this many jerseys instead
    pub bulk_item_count: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    pub message: String,
    pub whatsapp_link: String,
}

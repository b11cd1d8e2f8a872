use chrono::Utc;
use postgres::types::Json;
use postgres::Row;
use serde_json::Value;

use super::*;
use models::*;
use util::QueryBuilder;
use whatsapp::BusinessHours;

const ID_COLUMN: &str = "id";
const WHATSAPP_BUSINESS_NUMBER_COLUMN: &str = "whatsapp_business_number";
const BUSINESS_HOURS_COLUMN: &str = "business_hours";
const MESSAGE_TEMPLATES_COLUMN: &str = "message_templates";
const AUTO_RESPONSE_ENABLED_COLUMN: &str = "auto_response_enabled";
const NOTIFICATION_EMAIL_COLUMN: &str = "notification_email";
const NOTIFICATION_PREFERENCES_COLUMN: &str = "notification_preferences";
const CREATED_AT_COLUMN: &str = "created_at";
const UPDATED_AT_COLUMN: &str = "updated_at";

pub trait AdminSettingsRepo: DbRepo<AdminSettings, NewAdminSettings, AdminSettingsFilter, AdminSettingsUpdater> {}

impl<'a> AdminSettingsRepo for DbRepoImpl<'a> {}
impl AdminSettingsRepo for MemoryRepoImpl {}

impl DbEntity for AdminSettings {
    const TABLE: &'static str = "admin_settings";

    fn from_row(row: &Row) -> RepoResult<Self> {
        let Json(business_hours): Json<BusinessHours> = row.try_get(BUSINESS_HOURS_COLUMN)?;
        let auto_response_enabled: Option<bool> = row.try_get(AUTO_RESPONSE_ENABLED_COLUMN)?;
        let notification_preferences: Option<Value> = row.try_get(NOTIFICATION_PREFERENCES_COLUMN)?;

        Ok(Self {
            id: AdminSettingsId(row.try_get(ID_COLUMN)?),
            whatsapp_business_number: row.try_get(WHATSAPP_BUSINESS_NUMBER_COLUMN)?,
            business_hours,
            message_templates: row.try_get(MESSAGE_TEMPLATES_COLUMN)?,
            auto_response_enabled: auto_response_enabled.unwrap_or(true),
            notification_email: row.try_get(NOTIFICATION_EMAIL_COLUMN)?,
            notification_preferences: notification_preferences.unwrap_or(Value::Null),
            created_at: row.try_get(CREATED_AT_COLUMN)?,
            updated_at: row.try_get(UPDATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.admin_settings
    }
}

impl Inserter<AdminSettings> for NewAdminSettings {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, self.id.0)
            .with_value(WHATSAPP_BUSINESS_NUMBER_COLUMN, self.whatsapp_business_number)
            .with_value(BUSINESS_HOURS_COLUMN, Json(self.business_hours))
            .with_value(MESSAGE_TEMPLATES_COLUMN, self.message_templates)
            .with_value(AUTO_RESPONSE_ENABLED_COLUMN, self.auto_response_enabled)
            .with_value(NOTIFICATION_EMAIL_COLUMN, self.notification_email)
            .with_value(NOTIFICATION_PREFERENCES_COLUMN, self.notification_preferences)
            .with_value(CREATED_AT_COLUMN, self.created_at)
            .with_value(UPDATED_AT_COLUMN, self.created_at)
    }

    fn into_entity(self) -> AdminSettings {
        self.into()
    }
}

impl Filter<AdminSettings> for AdminSettingsFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(id) = self.id {
            b = b.with_filter(ID_COLUMN, id.0);
        }
        b
    }

    fn matches(&self, settings: &AdminSettings) -> bool {
        self.id.map(|id| id == settings.id).unwrap_or(true)
    }
}

impl Updater<AdminSettings> for AdminSettingsUpdater {
    type Filter = AdminSettingsFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        let AdminSettingsUpdater { filter, data } = self;
        let mut b = QueryBuilder::update(table);

        if let Some(v) = data.whatsapp_business_number {
            b = b.with_value(WHATSAPP_BUSINESS_NUMBER_COLUMN, v);
        }
        if let Some(v) = data.business_hours {
            b = b.with_value(BUSINESS_HOURS_COLUMN, Json(v));
        }
        if let Some(v) = data.message_templates {
            b = b.with_value(MESSAGE_TEMPLATES_COLUMN, v);
        }
        if let Some(v) = data.auto_response_enabled {
            b = b.with_value(AUTO_RESPONSE_ENABLED_COLUMN, v);
        }
        if let Some(v) = data.notification_email {
            b = b.with_value(NOTIFICATION_EMAIL_COLUMN, v);
        }
        if let Some(v) = data.notification_preferences {
            b = b.with_value(NOTIFICATION_PREFERENCES_COLUMN, v);
        }

        filter.into_filtered_builder(b.with_value(UPDATED_AT_COLUMN, Utc::now()))
    }

    fn filter(&self) -> &AdminSettingsFilter {
        &self.filter
    }

    fn apply(&self, settings: &mut AdminSettings) {
        self.data.apply(settings);
    }
}

use chrono::Utc;
use postgres::Row;
use uuid::Uuid;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const USER_ID_COLUMN: &str = "user_id";
const FULL_NAME_COLUMN: &str = "full_name";
const EMAIL_COLUMN: &str = "email";
const PHONE_NUMBER_COLUMN: &str = "phone_number";
const JERSEY_NAME_COLUMN: &str = "jersey_name";
const TEAM_COLUMN: &str = "team";
const LEAGUE_COLUMN: &str = "league";
const SIZE_COLUMN: &str = "size";
const ADDITIONAL_NOTES_COLUMN: &str = "additional_notes";
const STATUS_COLUMN: &str = "status";
const ADMIN_RESPONSE_COLUMN: &str = "admin_response";
const WHATSAPP_CONTACTED_COLUMN: &str = "whatsapp_contacted";
const LAST_CONTACTED_AT_COLUMN: &str = "last_contacted_at";
const INQUIRY_ID_COLUMN: &str = "inquiry_id";
const CREATED_AT_COLUMN: &str = "created_at";
const UPDATED_AT_COLUMN: &str = "updated_at";

pub trait JerseyRequestRepo: DbRepo<JerseyRequest, NewJerseyRequest, JerseyRequestFilter, JerseyRequestUpdater> {}

impl<'a> JerseyRequestRepo for DbRepoImpl<'a> {}
impl JerseyRequestRepo for MemoryRepoImpl {}

impl DbEntity for JerseyRequest {
    const TABLE: &'static str = "jersey_requests";

    fn from_row(row: &Row) -> RepoResult<Self> {
        let user_id: Option<Uuid> = row.try_get(USER_ID_COLUMN)?;
        let inquiry_id: Option<Uuid> = row.try_get(INQUIRY_ID_COLUMN)?;

        Ok(Self {
            id: JerseyRequestId(row.try_get(ID_COLUMN)?),
            user_id: user_id.map(UserId),
            full_name: row.try_get(FULL_NAME_COLUMN)?,
            email: row.try_get(EMAIL_COLUMN)?,
            phone_number: row.try_get(PHONE_NUMBER_COLUMN)?,
            jersey_name: row.try_get(JERSEY_NAME_COLUMN)?,
            team: row.try_get(TEAM_COLUMN)?,
            league: row.try_get(LEAGUE_COLUMN)?,
            size: row.try_get(SIZE_COLUMN)?,
            additional_notes: row.try_get(ADDITIONAL_NOTES_COLUMN)?,
            status: parse_column(row, STATUS_COLUMN)?,
            admin_response: row.try_get(ADMIN_RESPONSE_COLUMN)?,
            whatsapp_contacted: row.try_get(WHATSAPP_CONTACTED_COLUMN)?,
            last_contacted_at: row.try_get(LAST_CONTACTED_AT_COLUMN)?,
            inquiry_id: inquiry_id.map(OrderId),
            created_at: row.try_get(CREATED_AT_COLUMN)?,
            updated_at: row.try_get(UPDATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.jersey_requests
    }
}

impl Inserter<JerseyRequest> for NewJerseyRequest {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, self.id.0)
            .with_value(USER_ID_COLUMN, self.user_id.map(|id| id.0))
            .with_value(FULL_NAME_COLUMN, self.full_name)
            .with_value(EMAIL_COLUMN, self.email)
            .with_value(PHONE_NUMBER_COLUMN, self.phone_number)
            .with_value(JERSEY_NAME_COLUMN, self.jersey_name)
            .with_value(TEAM_COLUMN, self.team)
            .with_value(LEAGUE_COLUMN, self.league)
            .with_value(SIZE_COLUMN, self.size)
            .with_value(ADDITIONAL_NOTES_COLUMN, self.additional_notes)
            .with_value(STATUS_COLUMN, self.status.as_str().to_string())
            .with_value(WHATSAPP_CONTACTED_COLUMN, self.whatsapp_contacted)
            .with_value(LAST_CONTACTED_AT_COLUMN, self.last_contacted_at)
            .with_value(CREATED_AT_COLUMN, self.created_at)
            .with_value(UPDATED_AT_COLUMN, self.created_at)
    }

    fn into_entity(self) -> JerseyRequest {
        self.into()
    }
}

impl Filter<JerseyRequest> for JerseyRequestFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(id) = self.id {
            b = b.with_filter(ID_COLUMN, id.0);
        }
        if let Some(user_id) = self.user_id {
            b = b.with_filter(USER_ID_COLUMN, user_id.0);
        }
        b
    }

    fn matches(&self, request: &JerseyRequest) -> bool {
        self.id.map(|id| id == request.id).unwrap_or(true)
            && self.user_id.map(|id| Some(id) == request.user_id).unwrap_or(true)
    }
}

impl Updater<JerseyRequest> for JerseyRequestUpdater {
    type Filter = JerseyRequestFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        let JerseyRequestUpdater { filter, data } = self;
        let mut b = QueryBuilder::update(table);

        if let Some(status) = data.status {
            b = b.with_value(STATUS_COLUMN, status.as_str().to_string());
        }
        if let Some(admin_response) = data.admin_response {
            b = b.with_value(ADMIN_RESPONSE_COLUMN, admin_response);
        }
        if let Some(last_contacted_at) = data.last_contacted_at {
            b = b.with_value(LAST_CONTACTED_AT_COLUMN, last_contacted_at);
        }

        filter.into_filtered_builder(b.with_value(UPDATED_AT_COLUMN, Utc::now()))
    }

    fn filter(&self) -> &JerseyRequestFilter {
        &self.filter
    }

    fn apply(&self, request: &mut JerseyRequest) {
        if let Some(status) = self.data.status {
            request.status = status;
        }
        if let Some(ref admin_response) = self.data.admin_response {
            request.admin_response = Some(admin_response.clone());
        }
        if let Some(last_contacted_at) = self.data.last_contacted_at {
            request.last_contacted_at = Some(last_contacted_at);
        }
        request.updated_at = Utc::now();
    }
}

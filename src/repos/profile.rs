use chrono::Utc;
use postgres::Row;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const USER_ID_COLUMN: &str = "user_id";
const FULL_NAME_COLUMN: &str = "full_name";
const PHONE_NUMBER_COLUMN: &str = "phone_number";
const DELIVERY_ADDRESS_COLUMN: &str = "delivery_address";
const CITY_COLUMN: &str = "city";
const STATE_COLUMN: &str = "state";
const AVATAR_URL_COLUMN: &str = "avatar_url";
const IS_ADMIN_COLUMN: &str = "is_admin";
const CREATED_AT_COLUMN: &str = "created_at";
const UPDATED_AT_COLUMN: &str = "updated_at";

pub trait ProfileRepo: DbRepo<Profile, NewProfile, ProfileFilter, ProfileUpdater> {}

impl<'a> ProfileRepo for DbRepoImpl<'a> {}
impl ProfileRepo for MemoryRepoImpl {}

impl DbEntity for Profile {
    const TABLE: &'static str = "profiles";

    fn from_row(row: &Row) -> RepoResult<Self> {
        let is_admin: Option<bool> = row.try_get(IS_ADMIN_COLUMN)?;

        Ok(Self {
            id: ProfileId(row.try_get(ID_COLUMN)?),
            user_id: UserId(row.try_get(USER_ID_COLUMN)?),
            full_name: row.try_get(FULL_NAME_COLUMN)?,
            phone_number: row.try_get(PHONE_NUMBER_COLUMN)?,
            delivery_address: row.try_get(DELIVERY_ADDRESS_COLUMN)?,
            city: row.try_get(CITY_COLUMN)?,
            state: row.try_get(STATE_COLUMN)?,
            avatar_url: row.try_get(AVATAR_URL_COLUMN)?,
            is_admin: is_admin.unwrap_or(false),
            created_at: row.try_get(CREATED_AT_COLUMN)?,
            updated_at: row.try_get(UPDATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.profiles
    }
}

fn with_profile_data(mut b: QueryBuilder, data: ProfileUpdateData) -> QueryBuilder {
    if let Some(v) = data.full_name {
        b = b.with_value(FULL_NAME_COLUMN, v);
    }
    if let Some(v) = data.phone_number {
        b = b.with_value(PHONE_NUMBER_COLUMN, v);
    }
    if let Some(v) = data.delivery_address {
        b = b.with_value(DELIVERY_ADDRESS_COLUMN, v);
    }
    if let Some(v) = data.city {
        b = b.with_value(CITY_COLUMN, v);
    }
    if let Some(v) = data.state {
        b = b.with_value(STATE_COLUMN, v);
    }
    b
}

impl Inserter<Profile> for NewProfile {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        let b = QueryBuilder::insert(table)
            .with_value(ID_COLUMN, self.id.0)
            .with_value(USER_ID_COLUMN, self.user_id.0)
            .with_value(CREATED_AT_COLUMN, self.created_at)
            .with_value(UPDATED_AT_COLUMN, self.created_at);

        with_profile_data(b, self.data)
    }

    fn into_entity(self) -> Profile {
        self.into()
    }
}

impl Filter<Profile> for ProfileFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(user_id) = self.user_id {
            b = b.with_filter(USER_ID_COLUMN, user_id.0);
        }
        b
    }

    fn matches(&self, profile: &Profile) -> bool {
        self.user_id.map(|id| id == profile.user_id).unwrap_or(true)
    }
}

impl Updater<Profile> for ProfileUpdater {
    type Filter = ProfileFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        let b = with_profile_data(QueryBuilder::update(table), self.data);
        self.filter
            .into_filtered_builder(b.with_value(UPDATED_AT_COLUMN, Utc::now()))
    }

    fn filter(&self) -> &ProfileFilter {
        &self.filter
    }

    fn apply(&self, profile: &mut Profile) {
        self.data.apply(profile);
    }
}

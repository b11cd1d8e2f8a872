use postgres::Row;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const USER_ID_COLUMN: &str = "user_id";
const ROLE_COLUMN: &str = "role";
const CREATED_AT_COLUMN: &str = "created_at";

pub trait UserRoleRepo: DbRepo<UserRoleEntry, NewUserRole, UserRoleFilter, UserRoleUpdater> {}

impl<'a> UserRoleRepo for DbRepoImpl<'a> {}
impl UserRoleRepo for MemoryRepoImpl {}

impl DbEntity for UserRoleEntry {
    const TABLE: &'static str = "user_roles";

    fn from_row(row: &Row) -> RepoResult<Self> {
        Ok(Self {
            id: RoleId(row.try_get(ID_COLUMN)?),
            user_id: UserId(row.try_get(USER_ID_COLUMN)?),
            role: parse_column(row, ROLE_COLUMN)?,
            created_at: row.try_get(CREATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.user_roles
    }
}

impl Inserter<UserRoleEntry> for NewUserRole {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        let entry = self.into_entity();
        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, entry.id.0)
            .with_value(USER_ID_COLUMN, entry.user_id.0)
            .with_value(ROLE_COLUMN, entry.role.as_str().to_string())
            .with_value(CREATED_AT_COLUMN, entry.created_at)
    }

    fn into_entity(self) -> UserRoleEntry {
        self.into()
    }
}

impl Filter<UserRoleEntry> for UserRoleFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(id) = self.id {
            b = b.with_filter(ID_COLUMN, id.0);
        }
        if let Some(user_id) = self.user_id {
            b = b.with_filter(USER_ID_COLUMN, user_id.0);
        }
        if let Some(role) = self.role {
            b = b.with_filter(ROLE_COLUMN, role.as_str().to_string());
        }
        b
    }

    fn matches(&self, entry: &UserRoleEntry) -> bool {
        self.id.map(|id| id == entry.id).unwrap_or(true)
            && self.user_id.map(|id| id == entry.user_id).unwrap_or(true)
            && self.role.map(|role| role == entry.role).unwrap_or(true)
    }
}

impl Updater<UserRoleEntry> for UserRoleUpdater {
    type Filter = UserRoleFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        self.filter.into_filtered_builder(QueryBuilder::update(table))
    }

    fn filter(&self) -> &UserRoleFilter {
        &self.filter
    }

    fn apply(&self, _entry: &mut UserRoleEntry) {}
}

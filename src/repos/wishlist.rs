use postgres::Row;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const USER_ID_COLUMN: &str = "user_id";
const JERSEY_ID_COLUMN: &str = "jersey_id";
const CREATED_AT_COLUMN: &str = "created_at";

pub trait WishlistRepo: DbRepo<WishlistEntry, NewWishlistEntry, WishlistFilter, WishlistUpdater> {}

impl<'a> WishlistRepo for DbRepoImpl<'a> {}
impl WishlistRepo for MemoryRepoImpl {}

impl DbEntity for WishlistEntry {
    const TABLE: &'static str = "wishlists";

    fn from_row(row: &Row) -> RepoResult<Self> {
        Ok(Self {
            id: WishlistEntryId(row.try_get(ID_COLUMN)?),
            user_id: UserId(row.try_get(USER_ID_COLUMN)?),
            jersey_id: JerseyId(row.try_get(JERSEY_ID_COLUMN)?),
            created_at: row.try_get(CREATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.wishlists
    }
}

impl Inserter<WishlistEntry> for NewWishlistEntry {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, self.id.0)
            .with_value(USER_ID_COLUMN, self.user_id.0)
            .with_value(JERSEY_ID_COLUMN, self.jersey_id.0)
            .with_value(CREATED_AT_COLUMN, self.created_at)
    }

    fn into_entity(self) -> WishlistEntry {
        self.into()
    }
}

impl Filter<WishlistEntry> for WishlistFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(user_id) = self.user_id {
            b = b.with_filter(USER_ID_COLUMN, user_id.0);
        }
        if let Some(jersey_id) = self.jersey_id {
            b = b.with_filter(JERSEY_ID_COLUMN, jersey_id.0);
        }
        b
    }

    fn matches(&self, entry: &WishlistEntry) -> bool {
        self.user_id.map(|id| id == entry.user_id).unwrap_or(true)
            && self.jersey_id.map(|id| id == entry.jersey_id).unwrap_or(true)
    }
}

impl Updater<WishlistEntry> for WishlistUpdater {
    type Filter = WishlistFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        self.filter.into_filtered_builder(QueryBuilder::update(table))
    }

    fn filter(&self) -> &WishlistFilter {
        &self.filter
    }

    fn apply(&self, _entry: &mut WishlistEntry) {}
}

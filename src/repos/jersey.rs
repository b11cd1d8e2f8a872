use chrono::Utc;
use postgres::Row;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const NAME_COLUMN: &str = "name";
const TEAM_COLUMN: &str = "team";
const LEAGUE_COLUMN: &str = "league";
const SEASON_COLUMN: &str = "season";
const PRICE_NAIRA_COLUMN: &str = "price_naira";
const DESCRIPTION_COLUMN: &str = "description";
const IMAGE_URL_COLUMN: &str = "image_url";
const SIZES_COLUMN: &str = "sizes";
const AVAILABLE_SIZES_COLUMN: &str = "available_sizes";
const STOCK_QUANTITY_COLUMN: &str = "stock_quantity";
const IS_AVAILABLE_COLUMN: &str = "is_available";
const IS_FEATURED_COLUMN: &str = "is_featured";
const CREATED_AT_COLUMN: &str = "created_at";
const UPDATED_AT_COLUMN: &str = "updated_at";

pub trait JerseyRepo: DbRepo<Jersey, NewJersey, JerseyFilter, JerseyUpdater> {}

impl<'a> JerseyRepo for DbRepoImpl<'a> {}
impl JerseyRepo for MemoryRepoImpl {}

impl DbEntity for Jersey {
    const TABLE: &'static str = "jerseys";

    fn from_row(row: &Row) -> RepoResult<Self> {
        Ok(Self {
            id: JerseyId(row.try_get(ID_COLUMN)?),
            name: row.try_get(NAME_COLUMN)?,
            team: row.try_get(TEAM_COLUMN)?,
            league: row.try_get(LEAGUE_COLUMN)?,
            season: row.try_get(SEASON_COLUMN)?,
            price_naira: row.try_get(PRICE_NAIRA_COLUMN)?,
            description: row.try_get(DESCRIPTION_COLUMN)?,
            image_url: row.try_get(IMAGE_URL_COLUMN)?,
            sizes: row.try_get(SIZES_COLUMN)?,
            available_sizes: row.try_get(AVAILABLE_SIZES_COLUMN)?,
            stock_quantity: row.try_get(STOCK_QUANTITY_COLUMN)?,
            is_available: row.try_get(IS_AVAILABLE_COLUMN)?,
            is_featured: row.try_get(IS_FEATURED_COLUMN)?,
            created_at: row.try_get(CREATED_AT_COLUMN)?,
            updated_at: row.try_get(UPDATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.jerseys
    }
}

impl Inserter<Jersey> for NewJersey {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, self.id.0)
            .with_value(NAME_COLUMN, self.name)
            .with_value(TEAM_COLUMN, self.team)
            .with_value(LEAGUE_COLUMN, self.league)
            .with_value(SEASON_COLUMN, self.season)
            .with_value(PRICE_NAIRA_COLUMN, self.price_naira)
            .with_value(DESCRIPTION_COLUMN, self.description)
            .with_value(IMAGE_URL_COLUMN, self.image_url)
            .with_value(SIZES_COLUMN, self.sizes)
            .with_value(AVAILABLE_SIZES_COLUMN, self.available_sizes)
            .with_value(STOCK_QUANTITY_COLUMN, self.stock_quantity)
            .with_value(IS_AVAILABLE_COLUMN, self.is_available)
            .with_value(IS_FEATURED_COLUMN, self.is_featured)
            .with_value(CREATED_AT_COLUMN, self.created_at)
            .with_value(UPDATED_AT_COLUMN, self.created_at)
    }

    fn into_entity(self) -> Jersey {
        self.into()
    }
}

impl Filter<Jersey> for JerseyFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(id) = self.id {
            b = b.with_filter(ID_COLUMN, id.0);
        }
        if let Some(ids) = self.ids {
            b = b.with_any_filter(ID_COLUMN, ids.into_iter().map(|id| id.0).collect());
        }
        if let Some(is_available) = self.is_available {
            b = b.with_filter(IS_AVAILABLE_COLUMN, is_available);
        }
        if let Some(is_featured) = self.is_featured {
            b = b.with_filter(IS_FEATURED_COLUMN, is_featured);
        }
        b
    }

    fn matches(&self, jersey: &Jersey) -> bool {
        self.id.map(|id| id == jersey.id).unwrap_or(true)
            && self.ids.as_ref().map(|ids| ids.contains(&jersey.id)).unwrap_or(true)
            && self.is_available.map(|v| v == jersey.is_available).unwrap_or(true)
            && self.is_featured.map(|v| v == jersey.is_featured).unwrap_or(true)
    }
}

impl Updater<Jersey> for JerseyUpdater {
    type Filter = JerseyFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        let JerseyUpdater { filter, data } = self;
        let mut b = QueryBuilder::update(table);

        if let Some(v) = data.name {
            b = b.with_value(NAME_COLUMN, v);
        }
        if let Some(v) = data.team {
            b = b.with_value(TEAM_COLUMN, v);
        }
        if let Some(v) = data.league {
            b = b.with_value(LEAGUE_COLUMN, v);
        }
        if let Some(v) = data.season {
            b = b.with_value(SEASON_COLUMN, v);
        }
        if let Some(v) = data.price_naira {
            b = b.with_value(PRICE_NAIRA_COLUMN, v);
        }
        if let Some(v) = data.description {
            b = b.with_value(DESCRIPTION_COLUMN, v);
        }
        if let Some(v) = data.image_url {
            b = b.with_value(IMAGE_URL_COLUMN, v);
        }
        if let Some(v) = data.sizes {
            b = b.with_value(SIZES_COLUMN, v);
        }
        if let Some(v) = data.available_sizes {
            b = b.with_value(AVAILABLE_SIZES_COLUMN, v);
        }
        if let Some(v) = data.stock_quantity {
            b = b.with_value(STOCK_QUANTITY_COLUMN, v);
        }
        if let Some(v) = data.is_available {
            b = b.with_value(IS_AVAILABLE_COLUMN, v);
        }
        if let Some(v) = data.is_featured {
            b = b.with_value(IS_FEATURED_COLUMN, v);
        }

        filter.into_filtered_builder(b.with_value(UPDATED_AT_COLUMN, Utc::now()))
    }

    fn filter(&self) -> &JerseyFilter {
        &self.filter
    }

    fn apply(&self, jersey: &mut Jersey) {
        self.data.apply(jersey);
    }
}

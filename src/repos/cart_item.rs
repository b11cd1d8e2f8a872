use chrono::Utc;
use postgres::Row;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const USER_ID_COLUMN: &str = "user_id";
const JERSEY_ID_COLUMN: &str = "jersey_id";
const SIZE_COLUMN: &str = "size";
const QUANTITY_COLUMN: &str = "quantity";
const CREATED_AT_COLUMN: &str = "created_at";
const UPDATED_AT_COLUMN: &str = "updated_at";

/// Adding a line that already exists bumps its quantity in the same statement
const MERGE_LINE: &str = "ON CONFLICT (user_id, jersey_id, size) DO UPDATE \
                          SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = EXCLUDED.updated_at";

pub trait CartItemRepo: DbRepo<CartItem, NewCartItem, CartItemFilter, CartItemUpdater> {}

impl<'a> CartItemRepo for DbRepoImpl<'a> {}
impl CartItemRepo for MemoryRepoImpl {}

impl DbEntity for CartItem {
    const TABLE: &'static str = "cart_items";

    fn from_row(row: &Row) -> RepoResult<Self> {
        Ok(Self {
            id: CartItemId(row.try_get(ID_COLUMN)?),
            user_id: UserId(row.try_get(USER_ID_COLUMN)?),
            jersey_id: JerseyId(row.try_get(JERSEY_ID_COLUMN)?),
            size: row.try_get(SIZE_COLUMN)?,
            quantity: row.try_get(QUANTITY_COLUMN)?,
            created_at: row.try_get(CREATED_AT_COLUMN)?,
            updated_at: row.try_get(UPDATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.cart_items
    }
}

/// Inserting a cart item is an upsert on the `(user, jersey, size)` line
impl Inserter<CartItem> for NewCartItem {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, self.id.0)
            .with_value(USER_ID_COLUMN, self.user_id.0)
            .with_value(JERSEY_ID_COLUMN, self.jersey_id.0)
            .with_value(SIZE_COLUMN, self.size)
            .with_value(QUANTITY_COLUMN, self.quantity)
            .with_value(CREATED_AT_COLUMN, self.created_at)
            .with_value(UPDATED_AT_COLUMN, self.created_at)
            .with_extra(MERGE_LINE)
    }

    fn into_entity(self) -> CartItem {
        self.into()
    }

    fn merge_into(&self, existing: &mut CartItem) -> bool {
        if self.is_same_line(existing) {
            existing.absorb(self);
            true
        } else {
            false
        }
    }
}

impl Filter<CartItem> for CartItemFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(id) = self.id {
            b = b.with_filter(ID_COLUMN, id.0);
        }
        if let Some(ids) = self.ids {
            b = b.with_any_filter(ID_COLUMN, ids.into_iter().map(|id| id.0).collect());
        }
        if let Some(user_id) = self.user_id {
            b = b.with_filter(USER_ID_COLUMN, user_id.0);
        }
        if let Some(jersey_id) = self.jersey_id {
            b = b.with_filter(JERSEY_ID_COLUMN, jersey_id.0);
        }
        if let Some(size) = self.size {
            b = b.with_filter(SIZE_COLUMN, size);
        }
        b
    }

    fn matches(&self, item: &CartItem) -> bool {
        self.id.map(|id| id == item.id).unwrap_or(true)
            && self.ids.as_ref().map(|ids| ids.contains(&item.id)).unwrap_or(true)
            && self.user_id.map(|id| id == item.user_id).unwrap_or(true)
            && self.jersey_id.map(|id| id == item.jersey_id).unwrap_or(true)
            && self.size.as_ref().map(|size| size == &item.size).unwrap_or(true)
    }
}

impl Updater<CartItem> for CartItemUpdater {
    type Filter = CartItemFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        let b = QueryBuilder::update(table)
            .with_value(QUANTITY_COLUMN, self.quantity)
            .with_value(UPDATED_AT_COLUMN, Utc::now());
        self.filter.into_filtered_builder(b)
    }

    fn filter(&self) -> &CartItemFilter {
        &self.filter
    }

    fn apply(&self, item: &mut CartItem) {
        item.quantity = self.quantity;
        item.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(user_id: UserId, size: &str) -> CartItem {
        NewCartItem::new(user_id, JerseyId::new(), size.to_string(), 1).into()
    }

    #[test]
    fn insert_merges_on_line_conflict() {
        let new_item = NewCartItem::new(UserId::new(), JerseyId::new(), "M".to_string(), 2);
        let (query, args) = new_item.into_insert_builder(CartItem::TABLE).build();

        assert!(query.contains("ON CONFLICT (user_id, jersey_id, size) DO UPDATE"));
        assert!(query.ends_with("RETURNING *;"));
        assert_eq!(args.len(), 7);
    }

    #[test]
    fn ids_filter_leaves_other_lines() {
        let user_id = UserId::new();
        let loaded = item(user_id, "M");
        let added_later = item(user_id, "L");
        let filter = CartItemFilter {
            ids: Some(vec![loaded.id]),
            user_id: Some(user_id),
            ..Default::default()
        };

        assert!(filter.matches(&loaded));
        assert!(!filter.matches(&added_later));
    }

    #[test]
    fn update_touches_updated_at() {
        let mut cart_item = item(UserId::new(), "M");
        let before = cart_item.updated_at;
        let updater = CartItemUpdater {
            filter: CartItemFilter {
                id: Some(cart_item.id),
                ..Default::default()
            },
            quantity: 4,
        };

        updater.apply(&mut cart_item);
        assert_eq!(cart_item.quantity, 4);
        assert!(cart_item.updated_at >= before);

        let (query, _) = updater.into_update_builder(CartItem::TABLE).build();
        assert!(query.starts_with("UPDATE cart_items SET quantity = $1, updated_at = $2 WHERE id = $3"));
    }
}

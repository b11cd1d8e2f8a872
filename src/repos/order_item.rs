use postgres::Row;
use uuid::Uuid;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const ORDER_ID_COLUMN: &str = "order_id";
const JERSEY_ID_COLUMN: &str = "jersey_id";
const SIZE_COLUMN: &str = "size";
const QUANTITY_COLUMN: &str = "quantity";
const PRICE_COLUMN: &str = "price";
const CREATED_AT_COLUMN: &str = "created_at";

pub trait OrderItemRepo: DbRepo<OrderItem, NewOrderItem, OrderItemFilter, OrderItemUpdater> {}

impl<'a> OrderItemRepo for DbRepoImpl<'a> {}
impl OrderItemRepo for MemoryRepoImpl {}

impl DbEntity for OrderItem {
    const TABLE: &'static str = "order_items";

    fn from_row(row: &Row) -> RepoResult<Self> {
        let jersey_id: Option<Uuid> = row.try_get(JERSEY_ID_COLUMN)?;

        Ok(Self {
            id: OrderItemId(row.try_get(ID_COLUMN)?),
            order_id: OrderId(row.try_get(ORDER_ID_COLUMN)?),
            jersey_id: jersey_id.map(JerseyId),
            size: row.try_get(SIZE_COLUMN)?,
            quantity: row.try_get(QUANTITY_COLUMN)?,
            price: row.try_get(PRICE_COLUMN)?,
            created_at: row.try_get(CREATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.order_items
    }
}

impl Inserter<OrderItem> for NewOrderItem {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, self.id.0)
            .with_value(ORDER_ID_COLUMN, self.order_id.0)
            .with_value(JERSEY_ID_COLUMN, self.jersey_id.0)
            .with_value(SIZE_COLUMN, self.size)
            .with_value(QUANTITY_COLUMN, self.quantity)
            .with_value(PRICE_COLUMN, self.price)
            .with_value(CREATED_AT_COLUMN, self.created_at)
    }

    fn into_entity(self) -> OrderItem {
        self.into()
    }
}

impl Filter<OrderItem> for OrderItemFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(order_id) = self.order_id {
            b = b.with_filter(ORDER_ID_COLUMN, order_id.0);
        }
        b
    }

    fn matches(&self, item: &OrderItem) -> bool {
        self.order_id.map(|id| id == item.order_id).unwrap_or(true)
    }
}

impl Updater<OrderItem> for OrderItemUpdater {
    type Filter = OrderItemFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        self.filter.into_filtered_builder(QueryBuilder::update(table))
    }

    fn filter(&self) -> &OrderItemFilter {
        &self.filter
    }

    fn apply(&self, _item: &mut OrderItem) {}
}

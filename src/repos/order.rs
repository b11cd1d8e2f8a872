use chrono::Utc;
use postgres::types::Json;
use postgres::Row;
use uuid::Uuid;

use super::*;
use models::*;
use util::QueryBuilder;

const ID_COLUMN: &str = "id";
const ORDER_NUMBER_COLUMN: &str = "order_number";
const INQUIRY_NUMBER_COLUMN: &str = "inquiry_number";
const INQUIRY_TYPE_COLUMN: &str = "inquiry_type";
const USER_ID_COLUMN: &str = "user_id";
const CUSTOMER_NAME_COLUMN: &str = "customer_name";
const CUSTOMER_PHONE_COLUMN: &str = "customer_phone";
const CUSTOMER_EMAIL_COLUMN: &str = "customer_email";
const DELIVERY_ADDRESS_COLUMN: &str = "delivery_address";
const DELIVERY_CITY_COLUMN: &str = "delivery_city";
const DELIVERY_STATE_COLUMN: &str = "delivery_state";
const ITEMS_COLUMN: &str = "items";
const TOTAL_AMOUNT_COLUMN: &str = "total_amount";
const STATUS_COLUMN: &str = "status";
const NOTES_COLUMN: &str = "notes";
const ADMIN_NOTES_COLUMN: &str = "admin_notes";
const QUOTED_PRICE_COLUMN: &str = "quoted_price";
const PRIORITY_LEVEL_COLUMN: &str = "priority_level";
const RESPONSE_TIME_COLUMN: &str = "response_time";
const WHATSAPP_STATUS_COLUMN: &str = "whatsapp_status";
const WHATSAPP_SENT_AT_COLUMN: &str = "whatsapp_sent_at";
const CREATED_AT_COLUMN: &str = "created_at";
const UPDATED_AT_COLUMN: &str = "updated_at";

pub trait OrderRepo: DbRepo<Order, NewOrder, OrderFilter, OrderUpdater> {}

impl<'a> OrderRepo for DbRepoImpl<'a> {}
impl OrderRepo for MemoryRepoImpl {}

impl DbEntity for Order {
    const TABLE: &'static str = "orders";

    fn from_row(row: &Row) -> RepoResult<Self> {
        let user_id: Option<Uuid> = row.try_get(USER_ID_COLUMN)?;
        let Json(items): Json<Vec<OrderLineSnapshot>> = row.try_get(ITEMS_COLUMN)?;

        Ok(Self {
            id: OrderId(row.try_get(ID_COLUMN)?),
            order_number: row.try_get(ORDER_NUMBER_COLUMN)?,
            inquiry_number: row.try_get(INQUIRY_NUMBER_COLUMN)?,
            inquiry_type: parse_optional_column(row, INQUIRY_TYPE_COLUMN)?,
            user_id: user_id.map(UserId),
            customer_name: row.try_get(CUSTOMER_NAME_COLUMN)?,
            customer_phone: row.try_get(CUSTOMER_PHONE_COLUMN)?,
            customer_email: row.try_get(CUSTOMER_EMAIL_COLUMN)?,
            delivery_address: row.try_get(DELIVERY_ADDRESS_COLUMN)?,
            delivery_city: row.try_get(DELIVERY_CITY_COLUMN)?,
            delivery_state: row.try_get(DELIVERY_STATE_COLUMN)?,
            items,
            total_amount: row.try_get(TOTAL_AMOUNT_COLUMN)?,
            status: parse_column(row, STATUS_COLUMN)?,
            notes: row.try_get(NOTES_COLUMN)?,
            admin_notes: row.try_get(ADMIN_NOTES_COLUMN)?,
            quoted_price: row.try_get(QUOTED_PRICE_COLUMN)?,
            priority_level: row.try_get(PRIORITY_LEVEL_COLUMN)?,
            response_time: row.try_get(RESPONSE_TIME_COLUMN)?,
            whatsapp_status: parse_optional_column(row, WHATSAPP_STATUS_COLUMN)?,
            whatsapp_sent_at: row.try_get(WHATSAPP_SENT_AT_COLUMN)?,
            created_at: row.try_get(CREATED_AT_COLUMN)?,
            updated_at: row.try_get(UPDATED_AT_COLUMN)?,
        })
    }

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.orders
    }
}

impl Inserter<Order> for NewOrder {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder {
        let NewOrder {
            id,
            order_number,
            inquiry_number,
            inquiry_type,
            user_id,
            contact,
            items,
            total_amount,
            status,
            notes,
            whatsapp_status,
            whatsapp_sent_at,
            created_at,
        } = self;

        QueryBuilder::insert(table)
            .with_value(ID_COLUMN, id.0)
            .with_value(ORDER_NUMBER_COLUMN, order_number)
            .with_value(INQUIRY_NUMBER_COLUMN, inquiry_number)
            .with_value(INQUIRY_TYPE_COLUMN, inquiry_type.as_str().to_string())
            .with_value(USER_ID_COLUMN, user_id.map(|id| id.0))
            .with_value(CUSTOMER_NAME_COLUMN, contact.customer_name)
            .with_value(CUSTOMER_PHONE_COLUMN, contact.customer_phone)
            .with_value(CUSTOMER_EMAIL_COLUMN, contact.customer_email)
            .with_value(DELIVERY_ADDRESS_COLUMN, contact.delivery_address)
            .with_value(DELIVERY_CITY_COLUMN, contact.delivery_city)
            .with_value(DELIVERY_STATE_COLUMN, contact.delivery_state)
            .with_value(ITEMS_COLUMN, Json(items))
            .with_value(TOTAL_AMOUNT_COLUMN, total_amount)
            .with_value(STATUS_COLUMN, status.as_str().to_string())
            .with_value(NOTES_COLUMN, notes)
            .with_value(WHATSAPP_STATUS_COLUMN, whatsapp_status.map(|s| s.as_str().to_string()))
            .with_value(WHATSAPP_SENT_AT_COLUMN, whatsapp_sent_at)
            .with_value(CREATED_AT_COLUMN, created_at)
            .with_value(UPDATED_AT_COLUMN, created_at)
    }

    fn into_entity(self) -> Order {
        self.into()
    }
}

impl Filter<Order> for OrderFilter {
    fn into_filtered_builder(self, mut b: QueryBuilder) -> QueryBuilder {
        if let Some(id) = self.id {
            b = b.with_filter(ID_COLUMN, id.0);
        }
        if let Some(user_id) = self.user_id {
            b = b.with_filter(USER_ID_COLUMN, user_id.0);
        }
        b
    }

    fn matches(&self, order: &Order) -> bool {
        self.id.map(|id| id == order.id).unwrap_or(true)
            && self.user_id.map(|id| Some(id) == order.user_id).unwrap_or(true)
    }
}

impl Updater<Order> for OrderUpdater {
    type Filter = OrderFilter;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder {
        let OrderUpdater { filter, data } = self;
        let mut b = QueryBuilder::update(table);

        if let Some(status) = data.status {
            b = b.with_value(STATUS_COLUMN, status.as_str().to_string());
        }
        if let Some(v) = data.admin_notes {
            b = b.with_value(ADMIN_NOTES_COLUMN, v);
        }
        if let Some(v) = data.quoted_price {
            b = b.with_value(QUOTED_PRICE_COLUMN, v);
        }
        if let Some(v) = data.priority_level {
            b = b.with_value(PRIORITY_LEVEL_COLUMN, v);
        }
        if let Some(v) = data.response_time {
            b = b.with_value(RESPONSE_TIME_COLUMN, v);
        }
        if let Some(v) = data.whatsapp_status {
            b = b.with_value(WHATSAPP_STATUS_COLUMN, v.as_str().to_string());
        }

        filter.into_filtered_builder(b.with_value(UPDATED_AT_COLUMN, Utc::now()))
    }

    fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    fn apply(&self, order: &mut Order) {
        let data = &self.data;
        if let Some(status) = data.status {
            order.status = status;
        }
        if let Some(ref v) = data.admin_notes {
            order.admin_notes = Some(v.clone());
        }
        if let Some(v) = data.quoted_price {
            order.quoted_price = Some(v);
        }
        if let Some(ref v) = data.priority_level {
            order.priority_level = Some(v.clone());
        }
        if let Some(ref v) = data.response_time {
            order.response_time = Some(v.clone());
        }
        if let Some(v) = data.whatsapp_status {
            order.whatsapp_status = Some(v);
        }
        order.updated_at = Utc::now();
    }
}

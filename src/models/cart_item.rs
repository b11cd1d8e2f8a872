use chrono::prelude::*;

use super::common::*;
use errors::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub jersey_id: JerseyId,
    pub size: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Folds the quantity of a line added again into this one
    pub fn absorb(&mut self, new_item: &NewCartItem) {
        self.quantity = self.quantity.saturating_add(new_item.quantity);
        self.updated_at = new_item.created_at;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub jersey_id: JerseyId,
    pub size: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl NewCartItem {
    pub fn new(user_id: UserId, jersey_id: JerseyId, size: String, quantity: i32) -> Self {
        Self {
            user_id,
            jersey_id,
            size,
            quantity,

            id: CartItemId::new(),
            created_at: Utc::now(),
        }
    }

    /// Same `(user, jersey, size)` key, the key a cart line is unique on
    pub fn is_same_line(&self, item: &CartItem) -> bool {
        self.user_id == item.user_id && self.jersey_id == item.jersey_id && self.size == item.size
    }
}

impl From<NewCartItem> for CartItem {
    fn from(v: NewCartItem) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            jersey_id: v.jersey_id,
            size: v.size,
            quantity: v.quantity,
            created_at: v.created_at,
            updated_at: v.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartItemFilter {
    pub id: Option<CartItemId>,
    pub ids: Option<Vec<CartItemId>>,
    pub user_id: Option<UserId>,
    pub jersey_id: Option<JerseyId>,
    pub size: Option<String>,
}

impl CartItemFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CartItemUpdater {
    pub filter: CartItemFilter,
    pub quantity: i32,
}

pub fn check_quantity(quantity: i32) -> Result<i32, Error> {
    if quantity >= 1 {
        Ok(quantity)
    } else {
        Err(Error::invalid_input("quantity", "quantity must be at least 1"))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddToCartPayload {
    pub jersey_id: JerseyId,
    pub size: String,
    pub quantity: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetQuantityPayload {
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(quantity: i32) -> CartItem {
        NewCartItem::new(UserId::new(), JerseyId::new(), "M".to_string(), quantity).into()
    }

    #[test]
    fn same_line_is_absorbed() {
        let mut item = existing(2);
        let new_item = NewCartItem::new(item.user_id, item.jersey_id, "M".to_string(), 3);

        assert!(new_item.is_same_line(&item));
        item.absorb(&new_item);
        assert_eq!(item.quantity, 5);
        assert_eq!(item.updated_at, new_item.created_at);
    }

    #[test]
    fn other_size_is_another_line() {
        let item = existing(1);
        let new_item = NewCartItem::new(item.user_id, item.jersey_id, "L".to_string(), 1);

        assert!(!new_item.is_same_line(&item));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(check_quantity(0).is_err());
        assert_eq!(check_quantity(2).unwrap(), 2);
    }

    #[test]
    fn absorb_saturates() {
        let mut item = existing(i32::max_value());
        let new_item = NewCartItem::new(item.user_id, item.jersey_id, "M".to_string(), 1);

        item.absorb(&new_item);
        assert_eq!(item.quantity, i32::max_value());
    }
}

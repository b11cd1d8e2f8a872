use chrono::prelude::*;

use super::cart_item::CartItem;
use super::common::*;
use super::jersey::JerseySummary;

/// A cart item joined with its jersey
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub jersey_id: JerseyId,
    pub size: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub jersey: JerseySummary,
    pub line_total: f64,
}

impl CartLine {
    pub fn new(item: CartItem, jersey: JerseySummary) -> Self {
        let line_total = jersey.price_naira * f64::from(item.quantity);
        Self {
            id: item.id,
            jersey_id: item.jersey_id,
            size: item.size,
            quantity: item.quantity,
            created_at: item.created_at,
            jersey,
            line_total,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    /// Number of distinct lines
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: f64,
    pub total: f64,
    /// Set when a line's jersey went out of stock
    pub checkout_blocked: bool,
}

impl Cart {
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let subtotal = lines.iter().map(|line| line.line_total).sum::<f64>();
        let total_quantity = lines.iter().map(|line| i64::from(line.quantity)).sum::<i64>();
        let checkout_blocked = lines.iter().any(|line| !line.jersey.is_available);

        Self {
            item_count: lines.len(),
            total_quantity,
            subtotal,
            total: subtotal,
            checkout_blocked,
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartCount {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::cart_item::NewCartItem;

    fn line(price: f64, quantity: i32, is_available: bool) -> CartLine {
        let jersey_id = JerseyId::new();
        let item: CartItem = NewCartItem::new(UserId::new(), jersey_id, "L".to_string(), quantity).into();
        CartLine::new(
            item,
            JerseySummary {
                id: jersey_id,
                name: "Home Kit".to_string(),
                team: "Chelsea".to_string(),
                league: "Premier League".to_string(),
                price_naira: price,
                image_url: None,
                is_available,
            },
        )
    }

    #[test]
    fn totals_sum_line_totals() {
        let cart = Cart::from_lines(vec![line(15000.0, 2, true), line(20000.0, 1, true)]);

        assert_eq!(cart.lines[0].line_total, 30000.0);
        assert_eq!(cart.subtotal, 50000.0);
        assert_eq!(cart.total, 50000.0);
        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.total_quantity, 3);
        assert!(!cart.checkout_blocked);
    }

    #[test]
    fn unavailable_line_blocks_checkout() {
        let cart = Cart::from_lines(vec![line(15000.0, 1, true), line(20000.0, 1, false)]);

        assert!(cart.checkout_blocked);
    }

    #[test]
    fn empty_cart_is_zero() {
        let cart = Cart::from_lines(vec![]);

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal, 0.0);
        assert!(!cart.checkout_blocked);
    }
}

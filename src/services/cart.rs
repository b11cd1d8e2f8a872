use std::collections::HashMap;

use chrono::Utc;
use failure::Error as FailureError;
use rand::{self, Rng};

use super::contact::{business_number, link_for};
use super::types::{ServiceContext, ServiceFuture};
use acl;
use errors::Error;
use models::*;
use repos::*;
use whatsapp::{self, MessageLine};

/// Cart items of the user joined with their jerseys, newest first
pub fn load_cart(session: &mut RepoSession, user_id: UserId) -> RepoResult<Cart> {
    let items = session.cart_items().select(CartItemFilter::for_user(user_id))?;
    if items.is_empty() {
        return Ok(Cart::default());
    }

    let jersey_ids = items.iter().map(|item| item.jersey_id).collect::<Vec<_>>();
    let jerseys = session
        .jerseys()
        .select(JerseyFilter {
            ids: Some(jersey_ids),
            ..Default::default()
        })?
        .into_iter()
        .map(|jersey| (jersey.id, jersey))
        .collect::<HashMap<_, _>>();

    let mut lines = vec![];
    for item in items {
        match jerseys.get(&item.jersey_id) {
            Some(jersey) => lines.push(CartLine::new(item, JerseySummary::from(jersey))),
            None => warn!("Cart item {} points to missing jersey {}", item.id, item.jersey_id),
        }
    }
    Ok(Cart::from_lines(lines))
}

/// Service that provides operations for interacting with user carts
pub trait CartService {
    /// Get caller's cart contents
    fn get_cart(&self) -> ServiceFuture<Cart>;
    /// Add a jersey in a size, merging with an existing line
    fn add_item(&self, payload: AddToCartPayload) -> ServiceFuture<Cart>;
    /// Set line to desired quantity
    fn set_quantity(&self, item_id: CartItemId, quantity: i32) -> ServiceFuture<Cart>;
    /// Delete line from caller's cart
    fn remove_item(&self, item_id: CartItemId) -> ServiceFuture<Cart>;
    /// Clear caller's cart
    fn clear(&self) -> ServiceFuture<Cart>;
    /// Total quantity over all lines
    fn count(&self) -> ServiceFuture<CartCount>;
    /// Turns the cart into an order and hands it off to WhatsApp
    fn checkout(&self, payload: CheckoutPayload, user_agent: Option<String>) -> ServiceFuture<CheckoutResult>;
}

pub struct CartServiceImpl {
    pub ctx: ServiceContext,
}

fn own_item(session: &mut RepoSession, user_id: UserId, item_id: CartItemId) -> Result<CartItem, FailureError> {
    let item = session.cart_items().select_one(CartItemFilter {
        id: Some(item_id),
        ..Default::default()
    })?;

    match item {
        Some(ref item) if item.user_id != user_id => Err(Error::Forbidden.into()),
        Some(item) => Ok(item),
        None => Err(Error::NotFound.into()),
    }
}

/// Every checked-out line was removed with the quantity it was ordered with
fn removed_matches_cart(removed: &[CartItem], cart: &Cart) -> bool {
    removed.len() == cart.lines.len()
        && cart.lines.iter().all(|line| {
            removed
                .iter()
                .any(|item| item.id == line.id && item.quantity == line.quantity)
        })
}

impl CartService for CartServiceImpl {
    fn get_cart(&self) -> ServiceFuture<Cart> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            debug!("Getting cart for user {}", user_id);
            Ok(load_cart(session, user_id)?)
        })
    }

    fn add_item(&self, payload: AddToCartPayload) -> ServiceFuture<Cart> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_transaction(move |session| {
            let user_id = acl::caller_id(&login)?;
            let quantity = check_quantity(payload.quantity.unwrap_or(1))?;
            debug!(
                "Adding {} x jersey {} ({}) into cart for user {}",
                quantity, payload.jersey_id, payload.size, user_id
            );

            let jersey = session
                .jerseys()
                .select_one(payload.jersey_id.into())?
                .ok_or(Error::NotFound)?;
            jersey.ensure_available()?;
            let size = jersey.resolve_size(&payload.size)?;

            // Upserts on the (user, jersey, size) line
            session
                .cart_items()
                .insert(NewCartItem::new(user_id, jersey.id, size, quantity))?;

            Ok(load_cart(session, user_id)?)
        })
    }

    fn set_quantity(&self, item_id: CartItemId, quantity: i32) -> ServiceFuture<Cart> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            let quantity = check_quantity(quantity)?;
            debug!("Setting quantity of cart item {} for user {} to {}", item_id, user_id, quantity);

            own_item(session, user_id, item_id)?;
            session.cart_items().update(CartItemUpdater {
                filter: CartItemFilter {
                    id: Some(item_id),
                    ..Default::default()
                },
                quantity,
            })?;

            Ok(load_cart(session, user_id)?)
        })
    }

    fn remove_item(&self, item_id: CartItemId) -> ServiceFuture<Cart> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            debug!("Removing cart item {} for user {}", item_id, user_id);

            own_item(session, user_id, item_id)?;
            session.cart_items().delete(CartItemFilter {
                id: Some(item_id),
                ..Default::default()
            })?;

            Ok(load_cart(session, user_id)?)
        })
    }

    fn clear(&self) -> ServiceFuture<Cart> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            debug!("Clearing cart for user {}", user_id);

            session.cart_items().delete(CartItemFilter::for_user(user_id))?;
            Ok(Cart::default())
        })
    }

    fn count(&self) -> ServiceFuture<CartCount> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            let items = session.cart_items().select(CartItemFilter::for_user(user_id))?;
            Ok(CartCount {
                count: items.iter().map(|item| i64::from(item.quantity)).sum(),
            })
        })
    }

    fn checkout(&self, payload: CheckoutPayload, user_agent: Option<String>) -> ServiceFuture<CheckoutResult> {
        let login = self.ctx.login.clone();
        let whatsapp_config = self.ctx.whatsapp.clone();
        self.ctx.spawn_transaction(move |session| {
            let user_id = acl::caller_id(&login)?;
            let cart = load_cart(session, user_id)?;
            if cart.is_empty() {
                return Err(Error::EmptyCart.into());
            }
            if cart.checkout_blocked {
                return Err(Error::CheckoutBlocked.into());
            }

            let profile = session.profiles().select_one(ProfileFilter { user_id: Some(user_id) })?;
            let (contact, notes) = payload.resolve_contact(profile.as_ref())?;

            let now = Utc::now();
            let order_number = checkout_order_number(now, rand::thread_rng().gen_range(0, 10000));
            let snapshots = cart.lines.iter().map(OrderLineSnapshot::from).collect::<Vec<_>>();
            let customer_name = contact.customer_name.clone();

            info!("Checking out cart of user {} as order {}", user_id, order_number);
            let order = session
                .orders()
                .insert(NewOrder::checkout(user_id, contact, snapshots, notes, order_number, now))?;

            let mut items = vec![];
            for line in &order.items {
                items.push(session.order_items().insert(NewOrderItem::from_line(order.id, line, now))?);
            }
            // Only the ordered lines, a line bumped meanwhile aborts the checkout
            let removed = session.cart_items().delete(CartItemFilter {
                ids: Some(cart.lines.iter().map(|line| line.id).collect()),
                user_id: Some(user_id),
                ..Default::default()
            })?;
            if !removed_matches_cart(&removed, &cart) {
                warn!("Cart of user {} changed during checkout", user_id);
                return Err(Error::CartChanged.into());
            }

            let message = {
                let lines = order
                    .items
                    .iter()
                    .map(|line| MessageLine {
                        name: &line.name,
                        team: &line.team,
                        size: &line.size,
                        quantity: line.quantity,
                        line_total: line.total(),
                    })
                    .collect::<Vec<_>>();
                whatsapp::cart_inquiry_message(&order.order_number, &lines, order.total_amount, Some(&customer_name))
            };
            let number = business_number(session, &whatsapp_config)?;
            let whatsapp_link = link_for(&whatsapp_config, &number, &message, user_agent.as_ref().map(String::as_str));

            Ok(CheckoutResult {
                order,
                items,
                whatsapp_link,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_of(items: &[CartItem]) -> Cart {
        let lines = items
            .iter()
            .map(|item| {
                CartLine::new(
                    item.clone(),
                    JerseySummary {
                        id: item.jersey_id,
                        name: "Home Kit".to_string(),
                        team: "Rangers International".to_string(),
                        league: "NPFL".to_string(),
                        price_naira: 10000.0,
                        image_url: None,
                        is_available: true,
                    },
                )
            })
            .collect();
        Cart::from_lines(lines)
    }

    fn item(size: &str, quantity: i32) -> CartItem {
        NewCartItem::new(UserId::new(), JerseyId::new(), size.to_string(), quantity).into()
    }

    #[test]
    fn removed_lines_must_match_ordered_quantities() {
        let m = item("M", 1);
        let l = item("L", 2);
        let cart = cart_of(&[m.clone(), l.clone()]);

        assert!(removed_matches_cart(&[l.clone(), m.clone()], &cart));

        let mut bumped = l.clone();
        bumped.quantity = 3;
        assert!(!removed_matches_cart(&[m.clone(), bumped], &cart));
        assert!(!removed_matches_cart(&[m], &cart));
    }
}

use chrono::Utc;
use failure::Error as FailureError;

use super::contact::{business_number, link_for};
use super::types::{ServiceContext, ServiceFuture};
use acl;
use errors::Error;
use models::*;
use repos::*;
use whatsapp;

pub trait OrderService {
    /// WhatsApp hand-off for one jersey. Signed-in callers also get an inquiry order.
    fn inquire(&self, jersey_id: JerseyId, payload: InquiryPayload, user_agent: Option<String>) -> ServiceFuture<InquiryResult>;
    /// Caller's orders, newest first
    fn list_mine(&self) -> ServiceFuture<Vec<Order>>;
    /// Order with its items, for the owner or an admin
    fn get(&self, order_id: OrderId) -> ServiceFuture<OrderDetails>;
    fn list_all(&self) -> ServiceFuture<Vec<Order>>;
    fn set_status(&self, order_id: OrderId, status: OrderStatus) -> ServiceFuture<Order>;
    /// Admin notes, quoted price, priority and response time
    fn annotate(&self, order_id: OrderId, payload: OrderNotesPayload) -> ServiceFuture<Order>;
}

pub struct OrderServiceImpl {
    pub ctx: ServiceContext,
}

fn get_order(session: &mut RepoSession, order_id: OrderId) -> Result<Order, FailureError> {
    let order = session.orders().select_one(order_id.into())?;
    Ok(order.ok_or(Error::NotFound)?)
}

impl OrderService for OrderServiceImpl {
    fn inquire(&self, jersey_id: JerseyId, payload: InquiryPayload, user_agent: Option<String>) -> ServiceFuture<InquiryResult> {
        let login = self.ctx.login.clone();
        let whatsapp_config = self.ctx.whatsapp.clone();
        self.ctx.spawn_transaction(move |session| {
            let jersey = session.jerseys().select_one(jersey_id.into())?.ok_or(Error::NotFound)?;
            jersey.ensure_available()?;
            let size = jersey.resolve_size(payload.size.as_ref().map(String::as_str).unwrap_or(""))?;
            let quantity = check_quantity(payload.quantity.unwrap_or(1))?;

            let profile = match login.user_id() {
                Some(user_id) => session.profiles().select_one(ProfileFilter { user_id: Some(user_id) })?,
                None => None,
            };
            let customer_name = profile.as_ref().and_then(|profile| profile.full_name.clone());
            let message = whatsapp::jersey_inquiry_message(
                &jersey.name,
                &jersey.team,
                &size,
                quantity,
                customer_name.as_ref().map(String::as_str),
            );

            let order = match login.user_id() {
                Some(user_id) => {
                    let now = Utc::now();
                    let line = OrderLineSnapshot::new(&jersey, size, quantity);
                    let contact = CustomerContact::from_profile(profile.as_ref());
                    let order = session
                        .orders()
                        .insert(NewOrder::jersey_inquiry(user_id, contact, line, now))?;
                    for line in &order.items {
                        session.order_items().insert(NewOrderItem::from_line(order.id, line, now))?;
                    }
                    info!("Logged inquiry {} for jersey {} by user {}", order.order_number, jersey.id, user_id);
                    Some(order)
                }
                None => None,
            };

            let number = business_number(session, &whatsapp_config)?;
            Ok(InquiryResult {
                order,
                whatsapp_link: link_for(&whatsapp_config, &number, &message, user_agent.as_ref().map(String::as_str)),
                message,
            })
        })
    }

    fn list_mine(&self) -> ServiceFuture<Vec<Order>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            Ok(session.orders().select(OrderFilter {
                user_id: Some(user_id),
                ..Default::default()
            })?)
        })
    }

    fn get(&self, order_id: OrderId) -> ServiceFuture<OrderDetails> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::caller_id(&login)?;
            let order = get_order(session, order_id)?;
            if !acl::can_read_order(&login, &order) {
                return Err(Error::Forbidden.into());
            }

            let mut items = session.order_items().select(OrderItemFilter { order_id: Some(order_id) })?;
            items.reverse();
            Ok(OrderDetails { order, items })
        })
    }

    fn list_all(&self) -> ServiceFuture<Vec<Order>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            Ok(session.orders().select(OrderFilter::default())?)
        })
    }

    fn set_status(&self, order_id: OrderId, status: OrderStatus) -> ServiceFuture<Order> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_transaction(move |session| {
            acl::ensure_admin(&login)?;
            let order = get_order(session, order_id)?;
            let status = order.status.transition_to(status)?;
            info!("Order {} moves from {} to {}", order.order_number, order.status, status);

            let updated = session.orders().update(OrderUpdater {
                filter: order_id.into(),
                data: OrderUpdateData {
                    status: Some(status),
                    ..Default::default()
                },
            })?;
            Ok(updated.into_iter().next().ok_or(Error::NotFound)?)
        })
    }

    fn annotate(&self, order_id: OrderId, payload: OrderNotesPayload) -> ServiceFuture<Order> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            let data = payload.into_update_data()?;
            get_order(session, order_id)?;

            let updated = session.orders().update(OrderUpdater {
                filter: order_id.into(),
                data,
            })?;
            Ok(updated.into_iter().next().ok_or(Error::NotFound)?)
        })
    }
}

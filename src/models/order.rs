use std::fmt;
use std::str::FromStr;

use chrono::prelude::*;
use validator::Validate;

use super::cart::CartLine;
use super::common::*;
use super::jersey::Jersey;
use super::profile::Profile;
use errors::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use self::OrderStatus::*;

        match (*self, next) {
            (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Confirmed, Processing) | (Confirmed, Cancelled) => true,
            (Processing, Shipped) | (Processing, Cancelled) => true,
            (Shipped, Delivered) => true,
            _ => false,
        }
    }

    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, Error> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(Error::invalid_input("status", format!("unknown order status '{}'", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhatsAppStatus {
    Contacted,
    Responded,
}

impl WhatsAppStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhatsAppStatus::Contacted => "contacted",
            WhatsAppStatus::Responded => "responded",
        }
    }
}

impl FromStr for WhatsAppStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contacted" => Ok(WhatsAppStatus::Contacted),
            "responded" => Ok(WhatsAppStatus::Responded),
            other => Err(Error::invalid_input("whatsapp_status", format!("unknown value '{}'", other))),
        }
    }
}

/// How the order came in: a single jersey inquiry or a cart checkout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    Jersey,
    Cart,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::Jersey => "jersey",
            InquiryType::Cart => "cart",
        }
    }
}

impl FromStr for InquiryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jersey" => Ok(InquiryType::Jersey),
            "cart" => Ok(InquiryType::Cart),
            other => Err(Error::invalid_input("inquiry_type", format!("unknown value '{}'", other))),
        }
    }
}

/// Copy of a jersey line kept on the order itself
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLineSnapshot {
    pub jersey_id: JerseyId,
    pub name: String,
    pub team: String,
    pub size: String,
    pub quantity: i32,
    pub price: f64,
}

impl OrderLineSnapshot {
    pub fn new(jersey: &Jersey, size: String, quantity: i32) -> Self {
        Self {
            jersey_id: jersey.id,
            name: jersey.name.clone(),
            team: jersey.team.clone(),
            size,
            quantity,
            price: jersey.price_naira,
        }
    }

    pub fn total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl<'a> From<&'a CartLine> for OrderLineSnapshot {
    fn from(line: &'a CartLine) -> Self {
        Self {
            jersey_id: line.jersey_id,
            name: line.jersey.name.clone(),
            team: line.jersey.team.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            price: line.jersey.price_naira,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub inquiry_number: Option<String>,
    pub inquiry_type: Option<InquiryType>,
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub delivery_address: String,
    pub delivery_city: String,
    pub delivery_state: String,
    pub items: Vec<OrderLineSnapshot>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub quoted_price: Option<f64>,
    pub priority_level: Option<String>,
    pub response_time: Option<String>,
    pub whatsapp_status: Option<WhatsAppStatus>,
    pub whatsapp_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact and delivery details recorded on an order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub delivery_address: String,
    pub delivery_city: String,
    pub delivery_state: String,
}

impl CustomerContact {
    /// Whatever the profile knows, blanks elsewhere
    pub fn from_profile(profile: Option<&Profile>) -> Self {
        let field = |value: Option<&String>| value.cloned().unwrap_or_default();

        Self {
            customer_name: field(profile.and_then(|p| p.full_name.as_ref())),
            customer_phone: field(profile.and_then(|p| p.phone_number.as_ref())),
            customer_email: None,
            delivery_address: field(profile.and_then(|p| p.delivery_address.as_ref())),
            delivery_city: field(profile.and_then(|p| p.city.as_ref())),
            delivery_state: field(profile.and_then(|p| p.state.as_ref())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub id: OrderId,
    pub order_number: String,
    pub inquiry_number: Option<String>,
    pub inquiry_type: InquiryType,
    pub user_id: Option<UserId>,
    pub contact: CustomerContact,
    pub items: Vec<OrderLineSnapshot>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub whatsapp_status: Option<WhatsAppStatus>,
    pub whatsapp_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Order logged when a signed-in customer inquires about one jersey
    pub fn jersey_inquiry(user_id: UserId, contact: CustomerContact, line: OrderLineSnapshot, now: DateTime<Utc>) -> Self {
        let number = inquiry_number(now);
        Self {
            id: OrderId::new(),
            order_number: number.clone(),
            inquiry_number: Some(number),
            inquiry_type: InquiryType::Jersey,
            user_id: Some(user_id),
            contact,
            total_amount: line.total(),
            items: vec![line],
            status: OrderStatus::Pending,
            notes: None,
            whatsapp_status: Some(WhatsAppStatus::Contacted),
            whatsapp_sent_at: Some(now),
            created_at: now,
        }
    }

    /// Order created from the whole cart
    pub fn checkout(
        user_id: UserId,
        contact: CustomerContact,
        items: Vec<OrderLineSnapshot>,
        notes: Option<String>,
        order_number: String,
        now: DateTime<Utc>,
    ) -> Self {
        let total_amount = items.iter().map(OrderLineSnapshot::total).sum();
        Self {
            id: OrderId::new(),
            order_number,
            inquiry_number: None,
            inquiry_type: InquiryType::Cart,
            user_id: Some(user_id),
            contact,
            items,
            total_amount,
            status: OrderStatus::Pending,
            notes,
            whatsapp_status: Some(WhatsAppStatus::Contacted),
            whatsapp_sent_at: Some(now),
            created_at: now,
        }
    }
}

impl From<NewOrder> for Order {
    fn from(v: NewOrder) -> Self {
        Self {
            id: v.id,
            order_number: v.order_number,
            inquiry_number: v.inquiry_number,
            inquiry_type: Some(v.inquiry_type),
            user_id: v.user_id,
            customer_name: v.contact.customer_name,
            customer_phone: v.contact.customer_phone,
            customer_email: v.contact.customer_email,
            delivery_address: v.contact.delivery_address,
            delivery_city: v.contact.delivery_city,
            delivery_state: v.contact.delivery_state,
            items: v.items,
            total_amount: v.total_amount,
            status: v.status,
            notes: v.notes,
            admin_notes: None,
            quoted_price: None,
            priority_level: None,
            response_time: None,
            whatsapp_status: v.whatsapp_status,
            whatsapp_sent_at: v.whatsapp_sent_at,
            created_at: v.created_at,
            updated_at: v.created_at,
        }
    }
}

/// `INQ-<unix millis>`
pub fn inquiry_number(now: DateTime<Utc>) -> String {
    format!("INQ-{}", now.timestamp_millis())
}

/// `ORD-<yyyymmdd>-<4 digits>`
pub fn checkout_order_number(now: DateTime<Utc>, suffix: u16) -> String {
    format!("ORD-{}-{:04}", now.format("%Y%m%d"), suffix % 10000)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// Cleared when the jersey is deleted from the catalog
    pub jersey_id: Option<JerseyId>,
    pub size: String,
    pub quantity: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub jersey_id: JerseyId,
    pub size: String,
    pub quantity: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl NewOrderItem {
    pub fn from_line(order_id: OrderId, line: &OrderLineSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            id: OrderItemId::new(),
            order_id,
            jersey_id: line.jersey_id,
            size: line.size.clone(),
            quantity: line.quantity,
            price: line.price,
            created_at: now,
        }
    }
}

impl From<NewOrderItem> for OrderItem {
    fn from(v: NewOrderItem) -> Self {
        Self {
            id: v.id,
            order_id: v.order_id,
            jersey_id: Some(v.jersey_id),
            size: v.size,
            quantity: v.quantity,
            price: v.price,
            created_at: v.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderItemFilter {
    pub order_id: Option<OrderId>,
}

/// `order_items` rows never change after checkout
#[derive(Clone, Debug, PartialEq)]
pub struct OrderItemUpdater {
    pub filter: OrderItemFilter,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderFilter {
    pub id: Option<OrderId>,
    pub user_id: Option<UserId>,
}

impl From<OrderId> for OrderFilter {
    fn from(id: OrderId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderUpdateData {
    pub status: Option<OrderStatus>,
    pub admin_notes: Option<String>,
    pub quoted_price: Option<f64>,
    pub priority_level: Option<String>,
    pub response_time: Option<String>,
    pub whatsapp_status: Option<WhatsAppStatus>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderUpdater {
    pub filter: OrderFilter,
    pub data: OrderUpdateData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InquiryPayload {
    pub size: Option<String>,
    pub quantity: Option<i32>,
}

/// Result of a jersey inquiry. Anonymous callers get no order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InquiryResult {
    pub order: Option<Order>,
    pub message: String,
    pub whatsapp_link: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CheckoutPayload {
    #[validate(length(max = "100", message = "Name is too long"))]
    pub customer_name: Option<String>,
    #[validate(length(max = "20", message = "Phone number is too long"))]
    pub customer_phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub customer_email: Option<String>,
    #[validate(length(max = "500", message = "Address is too long"))]
    pub delivery_address: Option<String>,
    #[validate(length(max = "100", message = "City is too long"))]
    pub delivery_city: Option<String>,
    #[validate(length(max = "100", message = "State is too long"))]
    pub delivery_state: Option<String>,
    #[validate(length(max = "1000", message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl CheckoutPayload {
    /// Given fields win over the profile; name and phone must end up non-empty
    pub fn resolve_contact(self, profile: Option<&Profile>) -> Result<(CustomerContact, Option<String>), Error> {
        let payload = CheckoutPayload {
            customer_name: non_blank(self.customer_name),
            customer_phone: non_blank(self.customer_phone),
            customer_email: non_blank(self.customer_email),
            delivery_address: non_blank(self.delivery_address),
            delivery_city: non_blank(self.delivery_city),
            delivery_state: non_blank(self.delivery_state),
            notes: non_blank(self.notes),
        };
        payload.validate().map_err(Error::Validate)?;

        let defaults = CustomerContact::from_profile(profile);
        let contact = CustomerContact {
            customer_name: payload.customer_name.unwrap_or(defaults.customer_name),
            customer_phone: payload.customer_phone.unwrap_or(defaults.customer_phone),
            customer_email: payload.customer_email,
            delivery_address: payload.delivery_address.unwrap_or(defaults.delivery_address),
            delivery_city: payload.delivery_city.unwrap_or(defaults.delivery_city),
            delivery_state: payload.delivery_state.unwrap_or(defaults.delivery_state),
        };

        if contact.customer_name.is_empty() {
            return Err(Error::invalid_input("customer_name", "a name is required to place an order"));
        }
        if contact.customer_phone.is_empty() {
            return Err(Error::invalid_input("customer_phone", "a phone number is required to place an order"));
        }

        Ok((contact, payload.notes))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub whatsapp_link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusPayload {
    pub status: OrderStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderNotesPayload {
    #[validate(length(max = "2000", message = "Notes are too long"))]
    pub admin_notes: Option<String>,
    pub quoted_price: Option<f64>,
    #[validate(length(max = "20", message = "Priority is too long"))]
    pub priority_level: Option<String>,
    #[validate(length(max = "50", message = "Response time is too long"))]
    pub response_time: Option<String>,
}

impl OrderNotesPayload {
    pub fn into_update_data(self) -> Result<OrderUpdateData, Error> {
        self.validate().map_err(Error::Validate)?;

        if let Some(price) = self.quoted_price {
            if !price.is_finite() || price < 0.0 {
                return Err(Error::invalid_input("quoted_price", "price must be a non-negative number"));
            }
        }

        Ok(OrderUpdateData {
            admin_notes: non_blank(self.admin_notes),
            quoted_price: self.quoted_price,
            priority_level: non_blank(self.priority_level),
            response_time: non_blank(self.response_time),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_lifecycle() {
        use self::OrderStatus::*;

        let allowed = vec![
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, Processing),
            (Confirmed, Cancelled),
            (Processing, Shipped),
            (Processing, Cancelled),
            (Shipped, Delivered),
        ];
        let all = vec![Pending, Confirmed, Processing, Shipped, Delivered, Cancelled];

        for from in &all {
            for to in &all {
                assert_eq!(
                    from.can_transition_to(*to),
                    allowed.contains(&(*from, *to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
        assert!(Delivered.transition_to(Cancelled).is_err());
    }

    #[test]
    fn numbers_follow_their_formats() {
        let now = Utc.ymd(2024, 3, 7).and_hms_milli(10, 15, 0, 250);

        assert_eq!(inquiry_number(now), format!("INQ-{}", now.timestamp_millis()));
        assert_eq!(checkout_order_number(now, 42), "ORD-20240307-0042");
        assert_eq!(checkout_order_number(now, 9999), "ORD-20240307-9999");
    }

    #[test]
    fn contact_falls_back_to_profile() {
        let now = Utc::now();
        let profile = Profile {
            id: ProfileId::new(),
            user_id: UserId::new(),
            full_name: Some("Chidi Okeke".to_string()),
            phone_number: Some("08030000000".to_string()),
            delivery_address: Some("12 Marina".to_string()),
            city: Some("Lagos".to_string()),
            state: Some("Lagos".to_string()),
            avatar_url: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        };

        let payload = CheckoutPayload {
            delivery_city: Some("Ikeja".to_string()),
            ..Default::default()
        };
        let (contact, notes) = payload.resolve_contact(Some(&profile)).unwrap();

        assert_eq!(contact.customer_name, "Chidi Okeke");
        assert_eq!(contact.delivery_city, "Ikeja");
        assert_eq!(contact.delivery_state, "Lagos");
        assert_eq!(notes, None);
    }

    #[test]
    fn contact_requires_name_and_phone() {
        let payload = CheckoutPayload {
            customer_name: Some("Chidi".to_string()),
            ..Default::default()
        };

        match payload.resolve_contact(None) {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "customer_phone"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}

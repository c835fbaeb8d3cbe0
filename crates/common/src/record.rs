//! Order-shaped records as they are stored and sent over the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OrderId, OrderStatus, PrincipalId};

/// Money amount represented in cents to avoid floating point issues.
///
/// On the wire the amount is a decimal number (`12.5` is 1250 cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: i64) -> Money {
        Money {
            cents: self.cents.saturating_mul(quantity),
        }
    }
}

impl TryFrom<f64> for Money {
    type Error = String;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        if !amount.is_finite() {
            return Err(format!("amount must be a finite number, got {amount}"));
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return Err(format!("amount {amount} is out of range"));
        }
        Ok(Money {
            cents: cents as i64,
        })
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.cents as f64 / 100.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Catalog identifier of a purchased item. Opaque to this service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the item ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A line in an order or cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "id", default)]
    pub item_id: ItemId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Units ordered. Signed so that a bad payload decodes and is then
    /// rejected by validation with a precise message.
    pub quantity: i64,

    /// Price per unit.
    pub price: Money,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(
        item_id: impl Into<ItemId>,
        name: impl Into<String>,
        quantity: i64,
        price: Money,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            description: String::new(),
            quantity,
            price,
        }
    }

    /// Sets the item description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Delivery details attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryInfo {
    /// Agent who accepted the order. Bound exactly once, at acceptance.
    #[serde(rename = "deliveryAgentID", default)]
    pub delivery_agent_id: Option<PrincipalId>,

    #[serde(rename = "currentLocation", default)]
    pub current_location: String,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "id")]
    pub order_id: OrderId,

    #[serde(rename = "storeID")]
    pub store_id: PrincipalId,

    #[serde(rename = "userID")]
    pub user_id: PrincipalId,

    pub items: Vec<OrderItem>,

    #[serde(rename = "totalAmount")]
    pub total_amount: Money,

    pub status: OrderStatus,

    #[serde(rename = "deliveryInfo", default)]
    pub delivery_info: DeliveryInfo,
}

impl Order {
    /// Returns the bound delivery agent, if the order has been accepted.
    pub fn delivery_agent(&self) -> Option<PrincipalId> {
        self.delivery_info.delivery_agent_id
    }
}

/// Order-shaped payload submitted by a customer, for both carts and
/// placement.
///
/// Ownership and status fields a client might send are not part of the
/// draft; they are always derived server-side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(rename = "storeID", default)]
    pub store_id: Option<PrincipalId>,

    #[serde(default)]
    pub items: Vec<OrderItem>,

    #[serde(rename = "totalAmount", default)]
    pub total_amount: Money,

    #[serde(rename = "deliveryInfo", default)]
    pub delivery_info: DeliveryAddress,
}

/// Delivery details a customer may supply. Any agent binding a client
/// sends is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryAddress {
    #[serde(rename = "currentLocation", default)]
    pub current_location: String,
}

/// The single saved cart of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(rename = "userID")]
    pub user_id: PrincipalId,

    #[serde(rename = "storeID")]
    pub store_id: Option<PrincipalId>,

    pub items: Vec<OrderItem>,

    #[serde(rename = "totalAmount")]
    pub total_amount: Money,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl CartSnapshot {
    /// Builds the snapshot that replaces whatever the customer saved before.
    pub fn from_draft(user_id: PrincipalId, draft: OrderDraft) -> Self {
        Self {
            user_id,
            store_id: draft.store_id,
            items: draft.items,
            total_amount: draft.total_amount,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_decimal_wire_format() {
        let money: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(money.cents(), 1250);
        assert_eq!(
            serde_json::to_string(&Money::from_cents(1999)).unwrap(),
            "19.99"
        );
    }

    #[test]
    fn test_money_rounds_to_nearest_cent() {
        let money = Money::try_from(0.126).unwrap();
        assert_eq!(money.cents(), 13);
        let money = Money::try_from(10.0 / 3.0).unwrap();
        assert_eq!(money.cents(), 333);
    }

    #[test]
    fn test_money_rejects_non_finite() {
        assert!(Money::try_from(f64::NAN).is_err());
        assert!(Money::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1234).to_string(), "12.34");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-12.34");
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [Money::from_cents(100), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 350);
        assert_eq!(Money::from_cents(250).multiply(3).cents(), 750);
    }

    #[test]
    fn test_order_uses_source_field_names() {
        let order = Order {
            order_id: OrderId::new(),
            store_id: PrincipalId::new(9).unwrap(),
            user_id: PrincipalId::new(3).unwrap(),
            items: vec![OrderItem::new("sku-1", "Tea", 2, Money::from_cents(450))],
            total_amount: Money::from_cents(900),
            status: OrderStatus::Paid,
            delivery_info: DeliveryInfo::default(),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["storeID"], 9);
        assert_eq!(json["userID"], 3);
        assert_eq!(json["totalAmount"], 9.0);
        assert_eq!(json["status"], "Paid");
        assert_eq!(json["items"][0]["id"], "sku-1");
        assert_eq!(json["items"][0]["price"], 4.5);
        assert!(json["deliveryInfo"]["deliveryAgentID"].is_null());
    }

    #[test]
    fn test_draft_ignores_client_controlled_fields() {
        let draft: OrderDraft = serde_json::from_str(
            r#"{
                "id": "ignored",
                "userID": 999,
                "status": "Delivered",
                "storeID": 4,
                "deliveryInfo": {"deliveryAgentID": "", "currentLocation": "Gate 2"},
                "items": [{"id": "a", "name": "Rice", "quantity": 1, "price": 2.0}],
                "totalAmount": 2.0
            }"#,
        )
        .unwrap();

        assert_eq!(draft.store_id, PrincipalId::new(4));
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.total_amount.cents(), 200);
        assert_eq!(draft.delivery_info.current_location, "Gate 2");
    }

    #[test]
    fn test_draft_rejects_store_ids_outside_the_id_range() {
        for store in ["0", "9223372036854775808", "18446744073709551615"] {
            let body = format!(r#"{{"storeID": {store}, "items": [], "totalAmount": 0}}"#);
            assert!(serde_json::from_str::<OrderDraft>(&body).is_err(), "{store}");
        }

        let draft: OrderDraft =
            serde_json::from_str(r#"{"storeID": null, "items": [], "totalAmount": 0}"#).unwrap();
        assert_eq!(draft.store_id, None);
    }

    #[test]
    fn test_cart_snapshot_from_draft_takes_owner_from_caller() {
        let user = PrincipalId::new(5).unwrap();
        let draft = OrderDraft {
            store_id: PrincipalId::new(2),
            items: vec![OrderItem::new("x", "X", 1, Money::from_cents(100))],
            total_amount: Money::from_cents(100),
            delivery_info: DeliveryAddress::default(),
        };

        let cart = CartSnapshot::from_draft(user, draft);
        assert_eq!(cart.user_id, user);
        assert_eq!(cart.items.len(), 1);
    }
}

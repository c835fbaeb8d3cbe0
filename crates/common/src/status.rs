//! Order status values.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// ```text
/// Paid ──► Confirmed ──► Ready ──► Assigned ──► In-Transit ──► Delivered
///   │          │           │           │             │
///   └──────────┴───────────┴───────────┴─────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed and paid by the customer, awaiting the merchant.
    Paid,

    /// Accepted by the merchant, being prepared.
    Confirmed,

    /// Prepared and waiting for a delivery agent.
    Ready,

    /// Claimed by a delivery agent, awaiting pickup.
    Assigned,

    /// Picked up from the merchant.
    #[serde(rename = "In-Transit")]
    InTransit,

    /// Handed over to the customer (terminal state).
    Delivered,

    /// Cancelled by the customer (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Statuses along the forward path, in order.
    pub const FORWARD_PATH: [OrderStatus; 6] = [
        OrderStatus::Paid,
        OrderStatus::Confirmed,
        OrderStatus::Ready,
        OrderStatus::Assigned,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ];

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the next status on the forward path, if any.
    pub fn successor(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Paid => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Assigned),
            OrderStatus::Assigned => Some(OrderStatus::InTransit),
            OrderStatus::InTransit => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Returns the status name as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Paid => "Paid",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Ready => "Ready",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::InTransit => "In-Transit",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Parses a stored status name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Paid" => Some(OrderStatus::Paid),
            "Confirmed" => Some(OrderStatus::Confirmed),
            "Ready" => Some(OrderStatus::Ready),
            "Assigned" => Some(OrderStatus::Assigned),
            "In-Transit" => Some(OrderStatus::InTransit),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Paid.is_terminal());
        assert!(!OrderStatus::Confirmed.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert!(!OrderStatus::Assigned.is_terminal());
        assert!(!OrderStatus::InTransit.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_successor_walks_forward_path() {
        let mut walked = vec![OrderStatus::Paid];
        while let Some(next) = walked.last().and_then(|s| s.successor()) {
            walked.push(next);
        }
        assert_eq!(walked, OrderStatus::FORWARD_PATH.to_vec());
        assert_eq!(OrderStatus::Cancelled.successor(), None);
    }

    #[test]
    fn test_in_transit_wire_name() {
        let json = serde_json::to_string(&OrderStatus::InTransit).unwrap();
        assert_eq!(json, "\"In-Transit\"");
        let parsed: OrderStatus = serde_json::from_str("\"In-Transit\"").unwrap();
        assert_eq!(parsed, OrderStatus::InTransit);
    }

    #[test]
    fn test_parse_matches_display() {
        for status in OrderStatus::FORWARD_PATH
            .into_iter()
            .chain([OrderStatus::Cancelled])
        {
            assert_eq!(OrderStatus::parse(&status.to_string()), Some(status));
        }
        assert_eq!(OrderStatus::parse("InTransit"), None);
    }
}

//! Order transition table.

use common::{OrderStatus, Role};

use super::OrderError;

/// A named move of an order from one status to the next.
///
/// | Transition       | Actor          | Requires              | Results in   |
/// |------------------|----------------|-----------------------|--------------|
/// | `Cancel`         | customer       | any non-terminal      | `Cancelled`  |
/// | `Confirm`        | merchant       | `Paid`                | `Confirmed`  |
/// | `MarkReady`      | merchant       | `Confirmed`           | `Ready`      |
/// | `Accept`         | delivery agent | `Ready`               | `Assigned`   |
/// | `VerifyPickup`   | merchant       | `Assigned`            | `In-Transit` |
/// | `VerifyDelivery` | delivery agent | `In-Transit`          | `Delivered`  |
///
/// Placing an order is creation, not a transition; it always yields `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Cancel,
    Confirm,
    MarkReady,
    Accept,
    VerifyPickup,
    VerifyDelivery,
}

impl Transition {
    /// Every transition, in lifecycle order.
    pub const ALL: [Transition; 6] = [
        Transition::Cancel,
        Transition::Confirm,
        Transition::MarkReady,
        Transition::Accept,
        Transition::VerifyPickup,
        Transition::VerifyDelivery,
    ];

    /// Returns the only role allowed to trigger this transition.
    pub fn role(&self) -> Role {
        match self {
            Transition::Cancel => Role::Customer,
            Transition::Confirm | Transition::MarkReady | Transition::VerifyPickup => {
                Role::Merchant
            }
            Transition::Accept | Transition::VerifyDelivery => Role::DeliveryAgent,
        }
    }

    /// Returns the single status this transition requires, or `None` for
    /// cancellation, which is allowed from any non-terminal status.
    pub fn required_status(&self) -> Option<OrderStatus> {
        match self {
            Transition::Cancel => None,
            Transition::Confirm => Some(OrderStatus::Paid),
            Transition::MarkReady => Some(OrderStatus::Confirmed),
            Transition::Accept => Some(OrderStatus::Ready),
            Transition::VerifyPickup => Some(OrderStatus::Assigned),
            Transition::VerifyDelivery => Some(OrderStatus::InTransit),
        }
    }

    /// Returns the status an accepted transition moves the order to.
    pub fn target(&self) -> OrderStatus {
        match self {
            Transition::Cancel => OrderStatus::Cancelled,
            Transition::Confirm => OrderStatus::Confirmed,
            Transition::MarkReady => OrderStatus::Ready,
            Transition::Accept => OrderStatus::Assigned,
            Transition::VerifyPickup => OrderStatus::InTransit,
            Transition::VerifyDelivery => OrderStatus::Delivered,
        }
    }

    /// Returns true if this transition binds the acting delivery agent.
    pub fn binds_agent(&self) -> bool {
        matches!(self, Transition::Accept)
    }

    /// Returns true if an order in `current` may take this transition.
    pub fn permits(&self, current: OrderStatus) -> bool {
        match self.required_status() {
            Some(required) => current == required,
            None => !current.is_terminal(),
        }
    }

    /// Decides the next status for an order currently in `current`.
    pub fn decide(&self, current: OrderStatus) -> Result<OrderStatus, OrderError> {
        if self.permits(current) {
            Ok(self.target())
        } else {
            Err(OrderError::InvalidState {
                transition: *self,
                current,
            })
        }
    }

    /// Returns a stable lowercase name, used as a metric label.
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Cancel => "cancel",
            Transition::Confirm => "confirm",
            Transition::MarkReady => "mark_ready",
            Transition::Accept => "accept",
            Transition::VerifyPickup => "verify_pickup",
            Transition::VerifyDelivery => "verify_delivery",
        }
    }

    /// Human-readable reason for refusing this transition from `current`.
    pub fn rejection(&self, current: &OrderStatus) -> String {
        match (self, current) {
            (Transition::Cancel, OrderStatus::Cancelled) => {
                "Order status is already cancelled".to_string()
            }
            (Transition::Cancel, OrderStatus::Delivered) => {
                "Cannot cancel order. Order is already delivered".to_string()
            }
            _ => {
                let action = match self {
                    Transition::Cancel => "cancel order",
                    Transition::Confirm => "confirm order",
                    Transition::MarkReady => "mark order as ready for pickup",
                    Transition::Accept => "accept order",
                    Transition::VerifyPickup => "verify pickup",
                    Transition::VerifyDelivery => "verify delivery",
                };
                match self.required_status() {
                    Some(required) => format!(
                        "Cannot {action}. Order status is {current}, expected {required}"
                    ),
                    None => format!("Cannot {action}. Order status is {current}"),
                }
            }
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [OrderStatus; 7] = [
        OrderStatus::Paid,
        OrderStatus::Confirmed,
        OrderStatus::Ready,
        OrderStatus::Assigned,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn forward_transitions_follow_the_path_one_step_at_a_time() {
        for transition in Transition::ALL {
            if let Some(required) = transition.required_status() {
                assert_eq!(required.successor(), Some(transition.target()));
            }
        }
    }

    #[test]
    fn each_forward_transition_permits_exactly_one_status() {
        for transition in Transition::ALL
            .into_iter()
            .filter(|t| *t != Transition::Cancel)
        {
            let permitted: Vec<_> = ALL_STATUSES
                .into_iter()
                .filter(|s| transition.permits(*s))
                .collect();
            assert_eq!(permitted, vec![transition.required_status().unwrap()]);
        }
    }

    #[test]
    fn cancel_is_allowed_from_non_terminal_statuses_only() {
        for status in ALL_STATUSES {
            assert_eq!(Transition::Cancel.permits(status), !status.is_terminal());
        }
    }

    #[test]
    fn roles_match_the_table() {
        assert_eq!(Transition::Cancel.role(), Role::Customer);
        assert_eq!(Transition::Confirm.role(), Role::Merchant);
        assert_eq!(Transition::MarkReady.role(), Role::Merchant);
        assert_eq!(Transition::Accept.role(), Role::DeliveryAgent);
        assert_eq!(Transition::VerifyPickup.role(), Role::Merchant);
        assert_eq!(Transition::VerifyDelivery.role(), Role::DeliveryAgent);
    }

    #[test]
    fn only_accept_binds_an_agent() {
        let binding: Vec<_> = Transition::ALL
            .into_iter()
            .filter(|t| t.binds_agent())
            .collect();
        assert_eq!(binding, vec![Transition::Accept]);
    }

    #[test]
    fn decide_rejects_out_of_sequence() {
        let err = Transition::Accept.decide(OrderStatus::Paid).unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidState {
                transition: Transition::Accept,
                current: OrderStatus::Paid
            }
        );
        assert_eq!(
            err.to_string(),
            "Cannot accept order. Order status is Paid, expected Ready"
        );
    }

    #[test]
    fn decide_rejects_repeat_of_the_same_transition() {
        let next = Transition::Confirm.decide(OrderStatus::Paid).unwrap();
        assert_eq!(next, OrderStatus::Confirmed);
        assert!(Transition::Confirm.decide(next).is_err());
    }

    #[test]
    fn cancel_rejection_messages() {
        let err = Transition::Cancel.decide(OrderStatus::Cancelled).unwrap_err();
        assert_eq!(err.to_string(), "Order status is already cancelled");

        let err = Transition::Cancel.decide(OrderStatus::Delivered).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot cancel order. Order is already delivered"
        );
    }

    #[test]
    fn in_transit_is_named_with_its_wire_form() {
        let err = Transition::VerifyDelivery
            .decide(OrderStatus::Assigned)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot verify delivery. Order status is Assigned, expected In-Transit"
        );
    }
}

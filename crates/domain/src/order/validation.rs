//! Shape checks for carts and order drafts.

use common::{Money, OrderDraft, OrderItem};

use super::OrderError;

/// Checks every item has a positive quantity and a non-negative price.
pub fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
    for item in items {
        if item.quantity <= 0 {
            return Err(OrderError::InvalidQuantity {
                item_id: item.item_id.clone(),
                quantity: item.quantity,
            });
        }
        if item.price.is_negative() {
            return Err(OrderError::InvalidPrice {
                item_id: item.item_id.clone(),
                price: item.price,
            });
        }
    }
    Ok(())
}

fn validate_total(total: Money) -> Result<(), OrderError> {
    if total.is_negative() {
        return Err(OrderError::InvalidTotal(total));
    }
    Ok(())
}

/// Validates a cart snapshot. An empty cart is allowed.
pub fn validate_cart_draft(draft: &OrderDraft) -> Result<(), OrderError> {
    validate_items(&draft.items)?;
    validate_total(draft.total_amount)
}

/// Validates a draft about to be placed as an order.
pub fn validate_order_draft(draft: &OrderDraft) -> Result<(), OrderError> {
    if draft.store_id.is_none() {
        return Err(OrderError::StoreIdRequired);
    }
    if draft.items.is_empty() {
        return Err(OrderError::NoItems);
    }
    validate_items(&draft.items)?;
    validate_total(draft.total_amount)
}

#[cfg(test)]
mod tests {
    use common::PrincipalId;

    use super::*;

    fn draft(items: Vec<OrderItem>, total: i64) -> OrderDraft {
        OrderDraft {
            store_id: PrincipalId::new(3),
            items,
            total_amount: Money::from_cents(total),
            ..Default::default()
        }
    }

    #[test]
    fn empty_cart_is_fine_but_empty_order_is_not() {
        let empty = draft(vec![], 0);
        assert!(validate_cart_draft(&empty).is_ok());
        assert_eq!(validate_order_draft(&empty), Err(OrderError::NoItems));
    }

    #[test]
    fn order_requires_a_store() {
        let mut d = draft(vec![OrderItem::new("a", "A", 1, Money::from_cents(10))], 10);
        d.store_id = None;
        assert_eq!(validate_order_draft(&d), Err(OrderError::StoreIdRequired));

        // Out-of-range ids never reach validation
        let d = serde_json::from_str::<OrderDraft>(
            r#"{"storeID": 0, "items": [{"id": "a", "quantity": 1, "price": 1.0}], "totalAmount": 1.0}"#,
        );
        assert!(d.is_err());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let d = draft(vec![OrderItem::new("a", "A", 0, Money::from_cents(10))], 0);
        assert!(matches!(
            validate_cart_draft(&d),
            Err(OrderError::InvalidQuantity { quantity: 0, .. })
        ));
    }

    #[test]
    fn rejects_negative_price_and_total() {
        let d = draft(vec![OrderItem::new("a", "A", 1, Money::from_cents(-1))], 0);
        assert!(matches!(
            validate_order_draft(&d),
            Err(OrderError::InvalidPrice { .. })
        ));

        let d = draft(vec![OrderItem::new("a", "A", 1, Money::from_cents(1))], -5);
        assert_eq!(
            validate_cart_draft(&d),
            Err(OrderError::InvalidTotal(Money::from_cents(-5)))
        );
    }
}

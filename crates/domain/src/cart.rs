//! Cart snapshots.

use common::{CartSnapshot, OrderDraft, Role};
use order_store::CartStore;

use crate::error::DomainError;
use crate::identity::IdentityContext;
use crate::order::validate_cart_draft;

/// Saves and reads the one cart each customer keeps between sessions.
#[derive(Clone)]
pub struct CartService<C: CartStore> {
    store: C,
}

impl<C: CartStore> CartService<C> {
    pub fn new(store: C) -> Self {
        Self { store }
    }

    /// Replaces the customer's saved cart with `draft`.
    #[tracing::instrument(skip(self, draft), fields(actor = %identity.actor_id()))]
    pub async fn save_cart(
        &self,
        identity: &IdentityContext,
        draft: OrderDraft,
    ) -> Result<CartSnapshot, DomainError> {
        identity.require(Role::Customer)?;
        validate_cart_draft(&draft)?;

        let cart = CartSnapshot::from_draft(identity.actor_id(), draft);
        self.store.replace_cart(cart.clone()).await?;

        metrics::counter!("carts_saved_total").increment(1);
        tracing::debug!(items = cart.items.len(), "cart saved");
        Ok(cart)
    }

    /// Returns the customer's saved cart.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn get_cart(&self, identity: &IdentityContext) -> Result<CartSnapshot, DomainError> {
        identity.require(Role::Customer)?;
        self.store
            .find_cart(identity.actor_id())
            .await?
            .ok_or(DomainError::CartNotFound)
    }
}

#[cfg(test)]
mod tests {
    use common::{Money, OrderItem, PrincipalId};
    use order_store::InMemoryCartStore;

    use super::*;
    use crate::OrderError;

    fn customer(raw: u64) -> IdentityContext {
        IdentityContext::new(PrincipalId::new(raw).unwrap(), Role::Customer)
    }

    fn draft(items: Vec<OrderItem>, total: i64) -> OrderDraft {
        OrderDraft {
            store_id: PrincipalId::new(5),
            items,
            total_amount: Money::from_cents(total),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn get_before_save_is_not_found() {
        let service = CartService::new(InMemoryCartStore::new());
        let result = service.get_cart(&customer(1)).await;
        assert!(matches!(result, Err(DomainError::CartNotFound)));
    }

    #[tokio::test]
    async fn save_replaces_the_previous_cart() {
        let service = CartService::new(InMemoryCartStore::new());
        let me = customer(1);

        service
            .save_cart(
                &me,
                draft(
                    vec![
                        OrderItem::new("a", "A", 1, Money::from_cents(100)),
                        OrderItem::new("b", "B", 1, Money::from_cents(200)),
                    ],
                    300,
                ),
            )
            .await
            .unwrap();
        service.save_cart(&me, draft(vec![], 0)).await.unwrap();

        let cart = service.get_cart(&me).await.unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_amount, Money::zero());
        assert!(service.get_cart(&customer(2)).await.is_err());
    }

    #[tokio::test]
    async fn invalid_cart_is_not_saved() {
        let service = CartService::new(InMemoryCartStore::new());
        let me = customer(1);
        let result = service
            .save_cart(
                &me,
                draft(vec![OrderItem::new("a", "A", -1, Money::from_cents(1))], 0),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidQuantity { .. }))
        ));
        assert!(matches!(
            service.get_cart(&me).await,
            Err(DomainError::CartNotFound)
        ));
    }

    #[tokio::test]
    async fn merchants_have_no_cart() {
        let service = CartService::new(InMemoryCartStore::new());
        let merchant = IdentityContext::new(PrincipalId::new(1).unwrap(), Role::Merchant);
        assert!(matches!(
            service.get_cart(&merchant).await,
            Err(DomainError::Unauthorized(_))
        ));
    }
}

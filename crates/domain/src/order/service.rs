//! Order service driving the lifecycle against an [`OrderStore`].

use common::{DeliveryInfo, Order, OrderDraft, OrderId, OrderStatus, Role};
use order_store::{AgentMatch, OrderFilter, OrderPatch, OrderStore};

use super::{OrderError, Transition, ownership_filter, transition_filter, validate_order_draft};
use crate::error::DomainError;
use crate::identity::IdentityContext;

/// Service for placing, moving and reading orders.
///
/// Every transition is a read of the order under the caller's ownership
/// filter followed by a conditional write that re-asserts the same filter
/// plus the status that was read. Competing writers therefore cannot both
/// succeed.
#[derive(Clone)]
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service on top of the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Places a new order for the customer. The order starts out `Paid`.
    #[tracing::instrument(skip(self, draft), fields(actor = %identity.actor_id()))]
    pub async fn place_order(
        &self,
        identity: &IdentityContext,
        draft: OrderDraft,
    ) -> Result<Order, DomainError> {
        identity.require(Role::Customer)?;
        validate_order_draft(&draft)?;
        let store_id = draft.store_id.ok_or(OrderError::StoreIdRequired)?;

        let order = Order {
            order_id: OrderId::new(),
            store_id,
            user_id: identity.actor_id(),
            items: draft.items,
            total_amount: draft.total_amount,
            status: OrderStatus::Paid,
            delivery_info: DeliveryInfo {
                delivery_agent_id: None,
                current_location: draft.delivery_info.current_location,
            },
        };
        self.store.insert_one(order.clone()).await?;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(order_id = %order.order_id, store_id = %order.store_id, "order placed");
        Ok(order)
    }

    /// Cancels one of the customer's orders.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn cancel_order(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        self.apply(identity, order_id, Transition::Cancel).await
    }

    /// Merchant confirms a paid order.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn confirm_order(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        self.apply(identity, order_id, Transition::Confirm).await
    }

    /// Merchant marks a confirmed order as ready for pickup.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn mark_ready(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        self.apply(identity, order_id, Transition::MarkReady).await
    }

    /// Delivery agent claims a ready order.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn accept_order(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        self.apply(identity, order_id, Transition::Accept).await
    }

    /// Merchant hands the order over to the assigned agent.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn verify_pickup(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        self.apply(identity, order_id, Transition::VerifyPickup).await
    }

    /// Delivery agent completes the delivery.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn verify_delivery(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        self.apply(identity, order_id, Transition::VerifyDelivery).await
    }

    /// Returns the status of one of the customer's orders.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn track_order(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
    ) -> Result<OrderStatus, DomainError> {
        identity.require(Role::Customer)?;
        let filter = ownership_filter(Role::Customer, identity.actor_id()).order_id(order_id);
        self.store
            .find_one(&filter)
            .await?
            .map(|order| order.status)
            .ok_or(DomainError::OrderNotFound {
                role: Role::Customer,
            })
    }

    /// Returns every order placed with the merchant.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn orders_for_merchant(
        &self,
        identity: &IdentityContext,
    ) -> Result<Vec<Order>, DomainError> {
        identity.require(Role::Merchant)?;
        let filter = ownership_filter(Role::Merchant, identity.actor_id());
        Ok(self.store.find(&filter).await?)
    }

    /// Returns every order bound to the delivery agent.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn orders_for_agent(
        &self,
        identity: &IdentityContext,
    ) -> Result<Vec<Order>, DomainError> {
        identity.require(Role::DeliveryAgent)?;
        let filter = ownership_filter(Role::DeliveryAgent, identity.actor_id());
        Ok(self.store.find(&filter).await?)
    }

    /// Returns ready orders no agent has claimed yet.
    #[tracing::instrument(skip(self), fields(actor = %identity.actor_id()))]
    pub async fn available_orders(
        &self,
        identity: &IdentityContext,
    ) -> Result<Vec<Order>, DomainError> {
        identity.require(Role::DeliveryAgent)?;
        let filter = OrderFilter::new()
            .status(OrderStatus::Ready)
            .delivery_agent(AgentMatch::Unassigned);
        Ok(self.store.find(&filter).await?)
    }

    async fn apply(
        &self,
        identity: &IdentityContext,
        order_id: OrderId,
        transition: Transition,
    ) -> Result<Order, DomainError> {
        identity.require(transition.role())?;
        let filter = transition_filter(transition, identity, order_id);

        let Some(mut order) = self.store.find_one(&filter).await? else {
            record_rejection(transition, "not_found");
            return Err(DomainError::OrderNotFound {
                role: identity.role(),
            });
        };

        let next = transition.decide(order.status).inspect_err(|err| {
            record_rejection(transition, "invalid_state");
            tracing::debug!(%order_id, error = %err, "transition rejected");
        })?;

        let mut patch = OrderPatch::set_status(next);
        if transition.binds_agent() {
            patch = patch.bind_delivery_agent(identity.actor_id());
        }

        let guarded = filter.clone().status(order.status);
        let result = self.store.update_one(&guarded, &patch).await?;
        if !result.is_matched() {
            tracing::warn!(%order_id, %transition, "order changed between read and write");
            return Err(self.lost_race(&filter, transition, identity).await);
        }

        patch.apply_to(&mut order);
        metrics::counter!("order_transitions_total", "transition" => transition.name())
            .increment(1);
        tracing::info!(%order_id, %transition, status = %order.status, "order transitioned");
        Ok(order)
    }

    /// Classifies a conditional write that matched nothing.
    async fn lost_race(
        &self,
        filter: &OrderFilter,
        transition: Transition,
        identity: &IdentityContext,
    ) -> DomainError {
        match self.store.find_one(filter).await {
            Ok(Some(current)) if transition.permits(current.status) => {
                record_rejection(transition, "conflict");
                OrderError::ConcurrencyConflict {
                    transition,
                    current: current.status,
                }
                .into()
            }
            Ok(Some(current)) => {
                record_rejection(transition, "invalid_state");
                OrderError::InvalidState {
                    transition,
                    current: current.status,
                }
                .into()
            }
            Ok(None) => {
                record_rejection(transition, "not_found");
                DomainError::OrderNotFound {
                    role: identity.role(),
                }
            }
            Err(err) => err.into(),
        }
    }
}

fn record_rejection(transition: Transition, reason: &'static str) {
    metrics::counter!(
        "order_transitions_rejected_total",
        "transition" => transition.name(),
        "reason" => reason
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use common::{DeliveryAddress, Money, OrderItem, PrincipalId};
    use order_store::InMemoryOrderStore;

    use super::*;

    fn identity(raw: u64, role: Role) -> IdentityContext {
        IdentityContext::new(PrincipalId::new(raw).unwrap(), role)
    }

    fn draft(store: u64) -> OrderDraft {
        OrderDraft {
            store_id: PrincipalId::new(store),
            items: vec![OrderItem::new("sku-1", "Widget", 2, Money::from_cents(500))],
            total_amount: Money::from_cents(1000),
            delivery_info: DeliveryAddress {
                current_location: "4 Mill Lane".to_string(),
            },
        }
    }

    fn service() -> OrderService<InMemoryOrderStore> {
        OrderService::new(InMemoryOrderStore::new())
    }

    #[tokio::test]
    async fn place_order_starts_paid_and_owned_by_caller() {
        let service = service();
        let customer = identity(1, Role::Customer);

        let order = service.place_order(&customer, draft(2)).await.unwrap();

        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.user_id, customer.actor_id());
        assert_eq!(order.delivery_info.delivery_agent_id, None);
        assert_eq!(order.delivery_info.current_location, "4 Mill Lane");
        assert_eq!(service.store().order_count().await, 1);
    }

    #[tokio::test]
    async fn place_order_requires_customer() {
        let service = service();
        let result = service
            .place_order(&identity(1, Role::Merchant), draft(2))
            .await;
        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
        assert_eq!(service.store().order_count().await, 0);
    }

    #[tokio::test]
    async fn place_order_rejects_invalid_draft() {
        let service = service();
        let mut bad = draft(2);
        bad.items.clear();
        let result = service.place_order(&identity(1, Role::Customer), bad).await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::NoItems))
        ));
    }

    #[tokio::test]
    async fn merchant_cannot_skip_confirmation() {
        let service = service();
        let order = service
            .place_order(&identity(1, Role::Customer), draft(2))
            .await
            .unwrap();

        let result = service
            .mark_ready(&identity(2, Role::Merchant), order.order_id)
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidState {
                current: OrderStatus::Paid,
                ..
            }))
        ));

        let status = service
            .track_order(&identity(1, Role::Customer), order.order_id)
            .await
            .unwrap();
        assert_eq!(status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn foreign_merchant_sees_not_found() {
        let service = service();
        let order = service
            .place_order(&identity(1, Role::Customer), draft(2))
            .await
            .unwrap();

        let result = service
            .confirm_order(&identity(3, Role::Merchant), order.order_id)
            .await;
        assert!(matches!(
            result,
            Err(DomainError::OrderNotFound {
                role: Role::Merchant
            })
        ));

        let missing = service
            .confirm_order(&identity(2, Role::Merchant), OrderId::new())
            .await;
        assert!(matches!(missing, Err(DomainError::OrderNotFound { .. })));
    }

    #[tokio::test]
    async fn wrong_role_is_unauthorized_before_any_lookup() {
        let service = service();
        let result = service
            .confirm_order(&identity(2, Role::Customer), OrderId::new())
            .await;
        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn accept_binds_the_agent_and_excludes_others() {
        let service = service();
        let merchant = identity(2, Role::Merchant);
        let order = service
            .place_order(&identity(1, Role::Customer), draft(2))
            .await
            .unwrap();
        service.confirm_order(&merchant, order.order_id).await.unwrap();
        service.mark_ready(&merchant, order.order_id).await.unwrap();

        let agent = identity(7, Role::DeliveryAgent);
        let available = service.available_orders(&agent).await.unwrap();
        assert_eq!(available.len(), 1);

        let accepted = service.accept_order(&agent, order.order_id).await.unwrap();
        assert_eq!(accepted.status, OrderStatus::Assigned);
        assert_eq!(accepted.delivery_agent(), Some(agent.actor_id()));
        assert!(service.available_orders(&agent).await.unwrap().is_empty());

        let other = identity(8, Role::DeliveryAgent);
        let result = service.accept_order(&other, order.order_id).await;
        assert!(matches!(result, Err(DomainError::OrderNotFound { .. })));

        let again = service.accept_order(&agent, order.order_id).await;
        assert!(matches!(
            again,
            Err(DomainError::Order(OrderError::InvalidState { .. }))
        ));
    }

    #[tokio::test]
    async fn cancel_after_delivery_is_rejected() {
        let service = service();
        let customer = identity(1, Role::Customer);
        let merchant = identity(2, Role::Merchant);
        let agent = identity(7, Role::DeliveryAgent);
        let order = service.place_order(&customer, draft(2)).await.unwrap();
        let id = order.order_id;

        service.confirm_order(&merchant, id).await.unwrap();
        service.mark_ready(&merchant, id).await.unwrap();
        service.accept_order(&agent, id).await.unwrap();
        service.verify_pickup(&merchant, id).await.unwrap();
        let delivered = service.verify_delivery(&agent, id).await.unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);

        let err = service.cancel_order(&customer, id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot cancel order. Order is already delivered"
        );
    }

    #[tokio::test]
    async fn agent_lists_only_bound_orders() {
        let service = service();
        let merchant = identity(2, Role::Merchant);
        let agent = identity(7, Role::DeliveryAgent);
        for _ in 0..2 {
            let order = service
                .place_order(&identity(1, Role::Customer), draft(2))
                .await
                .unwrap();
            service.confirm_order(&merchant, order.order_id).await.unwrap();
            service.mark_ready(&merchant, order.order_id).await.unwrap();
        }
        let first = service.available_orders(&agent).await.unwrap()[0].order_id;
        service.accept_order(&agent, first).await.unwrap();

        let mine = service.orders_for_agent(&agent).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].order_id, first);
        assert_eq!(service.orders_for_merchant(&merchant).await.unwrap().len(), 2);
    }
}

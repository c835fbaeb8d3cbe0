use common::{Order, OrderId, OrderStatus, PrincipalId};

/// Constraint on the delivery agent bound to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMatch {
    /// The order is bound to exactly this agent.
    Is(PrincipalId),

    /// No agent has been bound yet.
    Unassigned,

    /// Either unbound, or bound to this agent.
    UnassignedOr(PrincipalId),
}

impl AgentMatch {
    /// Returns true if an order bound to `bound` satisfies this constraint.
    pub fn matches(&self, bound: Option<PrincipalId>) -> bool {
        match (self, bound) {
            (AgentMatch::Is(want), Some(got)) => *want == got,
            (AgentMatch::Is(_), None) => false,
            (AgentMatch::Unassigned, bound) => bound.is_none(),
            (AgentMatch::UnassignedOr(want), Some(got)) => *want == got,
            (AgentMatch::UnassignedOr(_), None) => true,
        }
    }
}

/// Builder for constructing order filters.
///
/// Every populated field must match for an order to be selected; an empty
/// filter selects every order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Filter by order ID.
    pub order_id: Option<OrderId>,

    /// Filter by owning customer.
    pub user_id: Option<PrincipalId>,

    /// Filter by owning merchant.
    pub store_id: Option<PrincipalId>,

    /// Filter by bound delivery agent.
    pub delivery_agent: Option<AgentMatch>,

    /// Filter by current status.
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter for a specific order.
    pub fn for_order(order_id: OrderId) -> Self {
        Self {
            order_id: Some(order_id),
            ..Default::default()
        }
    }

    /// Filters by order ID.
    pub fn order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Filters by owning customer.
    pub fn user_id(mut self, user_id: PrincipalId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Filters by owning merchant.
    pub fn store_id(mut self, store_id: PrincipalId) -> Self {
        self.store_id = Some(store_id);
        self
    }

    /// Filters by bound delivery agent.
    pub fn delivery_agent(mut self, agent: AgentMatch) -> Self {
        self.delivery_agent = Some(agent);
        self
    }

    /// Filters by current status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the order satisfies every populated field.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(id) = self.order_id
            && order.order_id != id
        {
            return false;
        }
        if let Some(user) = self.user_id
            && order.user_id != user
        {
            return false;
        }
        if let Some(store) = self.store_id
            && order.store_id != store
        {
            return false;
        }
        if let Some(agent) = self.delivery_agent
            && !agent.matches(order.delivery_agent())
        {
            return false;
        }
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }
        true
    }
}

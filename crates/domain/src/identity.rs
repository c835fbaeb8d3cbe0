//! Per-request identity.

use chrono::{DateTime, Utc};
use common::{PrincipalId, Role};
use order_store::SessionRecord;

use crate::error::DomainError;

/// The authenticated actor behind a request.
///
/// Only constructed from a well-formed, unexpired session, so holding one
/// means the actor id is non-zero and the role is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityContext {
    actor_id: PrincipalId,
    role: Role,
}

impl IdentityContext {
    pub fn new(actor_id: PrincipalId, role: Role) -> Self {
        Self { actor_id, role }
    }

    pub fn actor_id(&self) -> PrincipalId {
        self.actor_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Resolves a session record into an identity, failing closed.
    pub fn resolve(
        session: Option<&SessionRecord>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let session = session.ok_or(DomainError::Unauthorized("no session"))?;
        if session.is_expired(now) {
            return Err(DomainError::Unauthorized("session expired"));
        }

        let actor_id = session
            .user_id
            .and_then(|raw| u64::try_from(raw).ok())
            .and_then(PrincipalId::new)
            .ok_or(DomainError::Unauthorized("invalid user id"))?;

        let role = session
            .user_type
            .as_deref()
            .and_then(Role::parse)
            .ok_or(DomainError::Unauthorized("invalid user type"))?;

        Ok(Self { actor_id, role })
    }

    /// Fails unless the identity carries `role`.
    pub fn require(&self, role: Role) -> Result<(), DomainError> {
        if self.role != role {
            return Err(DomainError::Unauthorized("wrong role"));
        }
        Ok(())
    }
}

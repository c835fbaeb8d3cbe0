use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A session as written by the authentication service.
///
/// Fields are stored as they arrive and may be missing or malformed;
/// turning a record into a trusted identity is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Principal the session belongs to.
    pub user_id: Option<i64>,

    /// Kind of principal (`customer`, `merchant`, `delivery_agent`).
    pub user_type: Option<String>,

    /// Absolute expiry, if the session has one.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Creates a session for a principal of the given type, without expiry.
    pub fn new(user_id: i64, user_type: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            user_type: Some(user_type.into()),
            expires_at: None,
        }
    }

    /// Sets the expiry timestamp.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns true if the session has an expiry at or before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

//! Request context carrying the resolved caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cipherstudio_core::types::UserId;

/// Context for the current request.
///
/// The caller's identity is resolved by whatever fronts the services and
/// passed into every service method, so each operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The requesting user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context for `user_id`.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }
}

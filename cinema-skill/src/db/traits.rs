use async_trait::async_trait;

use crate::error::Result;
use crate::models::LocationState;

/// Per-user location state, keyed by the assistant's opaque user identifier.
///
/// Users are independent: implementations never need cross-user coordination.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Stored state for `user_id`, or an empty state for a user seen for the first time.
    async fn get(&self, user_id: &str) -> Result<LocationState>;

    /// Insert or replace the state for `user_id`.
    async fn save(&self, user_id: &str, state: &LocationState) -> Result<()>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}

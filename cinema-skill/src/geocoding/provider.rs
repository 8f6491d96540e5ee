use async_trait::async_trait;

use crate::error::Result;
use crate::models::ResolvedLocation;

/// Turns a free-text address phrase into a city and, where one exists, a subway station.
///
/// An address that cannot be resolved is reported as
/// [`SkillError::UnknownLocation`](crate::error::SkillError::UnknownLocation);
/// every other error means the lookup itself failed.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, phrase: &str) -> Result<ResolvedLocation>;
}

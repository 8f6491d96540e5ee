use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::db::traits::LocationStore;
use crate::error::{Result, SkillError};
use crate::models::LocationState;

/// Process-local location store. State is lost on restart.
#[derive(Default)]
pub struct InMemoryLocationStore {
    locations: RwLock<HashMap<String, LocationState>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn get(&self, user_id: &str) -> Result<LocationState> {
        let locations = self
            .locations
            .read()
            .map_err(|e| SkillError::Storage(format!("location map poisoned: {e}")))?;
        Ok(locations.get(user_id).cloned().unwrap_or_default())
    }

    async fn save(&self, user_id: &str, state: &LocationState) -> Result<()> {
        let mut locations = self
            .locations
            .write()
            .map_err(|e| SkillError::Storage(format!("location map poisoned: {e}")))?;
        locations.insert(user_id.to_string(), state.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::LocationRepository;
use crate::db::traits::LocationStore;
use crate::error::Result;
use crate::models::LocationState;

/// Durable location store on libsql (local file, remote, or embedded replica).
pub struct LibSqlLocationStore {
    db: Database,
}

impl LibSqlLocationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationStore for LibSqlLocationStore {
    async fn get(&self, user_id: &str) -> Result<LocationState> {
        let conn = self.db.connection().await?;
        Ok(LocationRepository::get(&conn, user_id)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, user_id: &str, state: &LocationState) -> Result<()> {
        let conn = self.db.connection().await?;
        LocationRepository::upsert(&conn, user_id, state).await
    }

    async fn ping(&self) -> Result<()> {
        let conn = self.db.connection().await?;
        conn.query("SELECT 1", ()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    async fn setup_test_store(dir: &tempfile::TempDir) -> LibSqlLocationStore {
        let path = dir.path().join("locations.db");
        let config = DatabaseConfig::local(format!("file:{}", path.display()));
        let db = Database::new(&config)
            .await
            .expect("Failed to create database");

        LibSqlLocationStore::new(db)
    }

    #[tokio::test]
    async fn test_unknown_user_gets_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = setup_test_store(&dir).await;

        let state = store.get("first-contact").await.unwrap();
        assert_eq!(state, LocationState::default());
    }

    #[tokio::test]
    async fn test_save_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = setup_test_store(&dir).await;
        let state = LocationState {
            in_progress: false,
            completed: true,
            city: "москва".to_string(),
            subway: "теплый стан".to_string(),
        };

        store.save("user-1", &state).await.unwrap();
        assert_eq!(store.get("user-1").await.unwrap(), state);
        assert_eq!(store.get("user-2").await.unwrap(), LocationState::default());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = LocationState::default();
        state.await_location();

        {
            let store = setup_test_store(&dir).await;
            store.save("user-1", &state).await.unwrap();
        }

        let store = setup_test_store(&dir).await;
        assert_eq!(store.get("user-1").await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_ping() {
        let dir = tempfile::tempdir().unwrap();
        let store = setup_test_store(&dir).await;
        store.ping().await.unwrap();
    }
}

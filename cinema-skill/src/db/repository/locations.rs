use chrono::Utc;
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::LocationState;

pub struct LocationRepository;

impl LocationRepository {
    pub async fn get(conn: &Connection, user_id: &str) -> Result<Option<LocationState>> {
        let mut rows = conn
            .query(
                r#"
                SELECT in_progress, completed, city, subway
                FROM locations
                WHERE user_id = ?1
                "#,
                params![user_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_state(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn upsert(conn: &Connection, user_id: &str, state: &LocationState) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO locations (
                user_id, in_progress, completed, city, subway, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6
            )
            ON CONFLICT(user_id) DO UPDATE SET
                in_progress = excluded.in_progress,
                completed = excluded.completed,
                city = excluded.city,
                subway = excluded.subway,
                updated_at = excluded.updated_at
            "#,
            params![
                user_id,
                i64::from(state.in_progress),
                i64::from(state.completed),
                state.city.as_str(),
                state.subway.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )
        .await?;
        Ok(())
    }

    fn row_to_state(row: &libsql::Row) -> Result<LocationState> {
        Ok(LocationState {
            in_progress: row.get::<i64>(0)? != 0,
            completed: row.get::<i64>(1)? != 0,
            city: row.get(2)?,
            subway: row.get(3)?,
        })
    }
}

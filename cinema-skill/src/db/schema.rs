use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Location collection state per assistant user
        CREATE TABLE IF NOT EXISTS locations (
            user_id TEXT PRIMARY KEY,
            in_progress INTEGER NOT NULL DEFAULT 0,
            completed INTEGER NOT NULL DEFAULT 0,
            city TEXT NOT NULL DEFAULT '',
            subway TEXT NOT NULL DEFAULT '',
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .await?;

    Ok(())
}

//! Table bootstrap for the students table

use sqlx::PgConnection;

/// Create the students table if it does not exist yet. Idempotent.
pub async fn ensure_schema(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    tracing::debug!("ensuring students table exists");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY,
            name TEXT,
            age INTEGER,
            course TEXT
        )
        "#,
    )
    .execute(conn)
    .await?;

    Ok(())
}

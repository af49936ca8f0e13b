//! Student repository
//!
//! Every operation acquires its own scoped connection, runs one
//! parameterized statement, releases the connection, then maps the outcome:
//! - add: INSERT ... ON CONFLICT DO NOTHING, zero rows means duplicate id
//! - update/delete: zero rows affected means not found

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::{debug, warn};

use studentctl_core::{Result, StoreError, Student, StudentStore};

use crate::connection::{Connector, ScopedConnection};
use crate::error::classify;
use crate::schema;

/// Postgres-backed student store
pub struct StudentRepo {
    connector: Connector,
}

impl StudentRepo {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    async fn acquire(&self) -> Result<ScopedConnection> {
        self.connector.acquire().await.map_err(|e| {
            warn!(error = %e, "failed to open database connection");
            StoreError::connection(e)
        })
    }
}

fn student_from_row(row: &PgRow) -> std::result::Result<Student, sqlx::Error> {
    // Columns are nullable in the table definition
    Ok(Student {
        id: row.try_get("id")?,
        name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
        age: row.try_get::<Option<i32>, _>("age")?.unwrap_or_default(),
        course: row
            .try_get::<Option<String>, _>("course")?
            .unwrap_or_default(),
    })
}

fn logged(err: StoreError, op: &'static str) -> StoreError {
    warn!(op, error = %err, "student store operation failed");
    err
}

#[async_trait]
impl StudentStore for StudentRepo {
    async fn add(&self, student: &Student) -> Result<()> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO students (id, name, age, course)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(student.id)
        .bind(&student.name)
        .bind(student.age)
        .bind(&student.course)
        .execute(&mut *conn)
        .await;
        conn.release().await;

        let done = result.map_err(|e| logged(classify(e, Some(student.id)), "add"))?;
        if done.rows_affected() == 0 {
            return Err(logged(StoreError::Duplicate { id: student.id }, "add"));
        }

        debug!(id = student.id, "added student");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Student>> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("SELECT id, name, age, course FROM students ORDER BY id")
            .fetch_all(&mut *conn)
            .await;
        conn.release().await;

        let students: Vec<Student> = result
            .and_then(|rows| rows.iter().map(student_from_row).collect())
            .map_err(|e| logged(classify(e, None), "list_all"))?;

        debug!(count = students.len(), "listed students");
        Ok(students)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Student>> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("SELECT id, name, age, course FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await;
        conn.release().await;

        let row = result.map_err(|e| logged(classify(e, None), "find_by_id"))?;
        row.as_ref()
            .map(student_from_row)
            .transpose()
            .map_err(|e| logged(classify(e, None), "find_by_id"))
    }

    async fn update(&self, student: &Student) -> Result<()> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE students
            SET name = $2, age = $3, course = $4
            WHERE id = $1
            "#,
        )
        .bind(student.id)
        .bind(&student.name)
        .bind(student.age)
        .bind(&student.course)
        .execute(&mut *conn)
        .await;
        conn.release().await;

        let done = result.map_err(|e| logged(classify(e, None), "update"))?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound { id: student.id });
        }

        debug!(id = student.id, "updated student");
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await;
        conn.release().await;

        let done = result.map_err(|e| logged(classify(e, None), "delete"))?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }

        debug!(id, "deleted student");
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.acquire().await?;
        let result = schema::ensure_schema(&mut *conn).await;
        conn.release().await;

        result.map_err(|e| logged(classify(e, None), "ensure_schema"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use crate::connection::ConnectionMode;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p studentctl-db -- --ignored
    //
    // Ids are picked per test so tests can share one database.

    fn repo(mode: ConnectionMode) -> StudentRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = DbConfig {
            mode,
            ..DbConfig::default().with_url(url)
        };
        StudentRepo::new(Connector::from_config(&config).expect("valid config"))
    }

    async fn fresh(repo: &StudentRepo, ids: &[i32]) {
        repo.ensure_schema().await.expect("schema");
        for &id in ids {
            let _ = repo.delete(id).await;
        }
    }

    #[tokio::test]
    async fn unreachable_database_is_connection_error() {
        let config = DbConfig {
            host: "127.0.0.1".into(),
            port: 1,
            ..DbConfig::default()
        };
        let repo = StudentRepo::new(Connector::from_config(&config).unwrap());

        let err = repo.list_all().await.unwrap_err();
        assert!(err.is_connection(), "unexpected error: {err}");

        let err = repo.find_by_id(1).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn add_find_delete_roundtrip() {
        let repo = repo(ConnectionMode::PerCall);
        fresh(&repo, &[90_001]).await;

        let alice = Student::new(90_001, "Alice", 20, "CS");
        repo.add(&alice).await.unwrap();
        assert_eq!(repo.find_by_id(90_001).await.unwrap(), Some(alice));

        repo.delete(90_001).await.unwrap();
        assert_eq!(repo.find_by_id(90_001).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_add_is_rejected() {
        let repo = repo(ConnectionMode::PerCall);
        fresh(&repo, &[90_002]).await;

        let original = Student::new(90_002, "Bob", 19, "History");
        repo.add(&original).await.unwrap();

        let err = repo
            .add(&Student::new(90_002, "Mallory", 50, "Law"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { id: 90_002 }));
        assert_eq!(repo.find_by_id(90_002).await.unwrap(), Some(original));

        repo.delete(90_002).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_and_delete_missing_are_not_found() {
        let repo = repo(ConnectionMode::Pooled { max_connections: 2 });
        fresh(&repo, &[90_003]).await;

        let err = repo
            .update(&Student::new(90_003, "Ghost", 1, "None"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 90_003 }));
        assert_eq!(repo.find_by_id(90_003).await.unwrap(), None);

        let err = repo.delete(90_003).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 90_003 }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_overwrites_fields() {
        let repo = repo(ConnectionMode::PerCall);
        fresh(&repo, &[90_004]).await;

        repo.add(&Student::new(90_004, "Carol", 22, "Biology"))
            .await
            .unwrap();
        let changed = Student::new(90_004, "Carol Jones", 23, "Chemistry");
        repo.update(&changed).await.unwrap();
        assert_eq!(repo.find_by_id(90_004).await.unwrap(), Some(changed));

        repo.delete(90_004).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_all_contains_added_records() {
        let repo = repo(ConnectionMode::PerCall);
        let ids = [90_010, 90_011, 90_012];
        fresh(&repo, &ids).await;

        let added: Vec<Student> = ids
            .iter()
            .map(|&id| Student::new(id, format!("Student {id}"), 18, "Maths"))
            .collect();
        for s in &added {
            repo.add(s).await.unwrap();
        }

        let listed: Vec<Student> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|s| ids.contains(&s.id))
            .collect();
        assert_eq!(listed, added);

        for id in ids {
            repo.delete(id).await.unwrap();
        }
    }
}

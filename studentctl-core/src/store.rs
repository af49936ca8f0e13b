//! Storage seam between the shell and a backend
//!
//! Every operation is one round trip: no batching, no transactions
//! spanning calls.

use async_trait::async_trait;

use crate::{Result, Student};

/// Record operations the shell needs from a backend.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a new record. Fails with `Duplicate` if the id is taken.
    async fn add(&self, student: &Student) -> Result<()>;

    /// All records, ordered by id. Empty when there are none.
    async fn list_all(&self) -> Result<Vec<Student>>;

    /// The record with this id, or `None`.
    async fn find_by_id(&self, id: i32) -> Result<Option<Student>>;

    /// Overwrite name, age and course of the record with `student.id`.
    /// Fails with `NotFound` and changes nothing if there is no such record.
    async fn update(&self, student: &Student) -> Result<()>;

    /// Remove the record with this id. Fails with `NotFound` if absent.
    async fn delete(&self, id: i32) -> Result<()>;

    /// Make sure the backing table exists. No-op for backends without one.
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }
}

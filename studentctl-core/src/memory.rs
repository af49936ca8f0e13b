//! In-process store with the same semantics as the database gateway

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::{Result, StoreError, Student, StudentStore};

/// Student records held in memory, keyed (and therefore ordered) by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i32, Student>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    fn rows(&self) -> MutexGuard<'_, BTreeMap<i32, Student>> {
        // A panic while holding the lock cannot leave a half-written map
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn add(&self, student: &Student) -> Result<()> {
        let mut rows = self.rows();
        if rows.contains_key(&student.id) {
            return Err(StoreError::Duplicate { id: student.id });
        }
        rows.insert(student.id, student.clone());
        debug!(id = student.id, "added student");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Student>> {
        Ok(self.rows().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Student>> {
        Ok(self.rows().get(&id).cloned())
    }

    async fn update(&self, student: &Student) -> Result<()> {
        match self.rows().get_mut(&student.id) {
            Some(row) => {
                row.name.clone_from(&student.name);
                row.age = student.age;
                row.course.clone_from(&student.course);
                debug!(id = student.id, "updated student");
                Ok(())
            }
            None => Err(StoreError::NotFound { id: student.id }),
        }
    }

    async fn delete(&self, id: i32) -> Result<()> {
        match self.rows().remove(&id) {
            Some(_) => {
                debug!(id, "deleted student");
                Ok(())
            }
            None => Err(StoreError::NotFound { id }),
        }
    }
}

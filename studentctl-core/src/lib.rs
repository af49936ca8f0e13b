//! studentctl-core: student records and the storage seam
//!
//! The shell talks to storage only through [`StudentStore`]. The Postgres
//! gateway lives in `studentctl-db`; [`MemoryStore`] backs tests and
//! ephemeral sessions.

pub mod error;
pub mod memory;
pub mod store;
pub mod student;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::StudentStore;
pub use student::Student;

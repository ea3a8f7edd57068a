//! Table Store Module
//!
//! The todo API talks to its table through the [`TableStore`] capability so
//! the backing service can be swapped, and tests can run against
//! [`MemoryTable`].

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::TodoRecord;

pub use memory::MemoryTable;

/// Largest number of rows a single partition query returns.
pub const MAX_PAGE_SIZE: usize = 1000;

// == Store Error ==
/// Failures reported by a table store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert of a key that already exists
    #[error("Entity already exists: {0}/{1}")]
    Conflict(String, String),

    /// Replace or delete of a key that does not exist
    #[error("Entity not found: {0}/{1}")]
    NotFound(String, String),

    /// Concurrency token did not match the stored version
    #[error("ETag mismatch for {0}/{1}")]
    PreconditionFailed(String, String),

    /// Continuation token was not issued for this partition
    #[error("Invalid continuation token")]
    InvalidContinuation,

    /// The store could not be reached or rejected the call
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Query Segment ==
/// Marks where the next page of a partition query starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken {
    pub partition_key: String,
    pub next_row_key: String,
}

/// One page of a partition query.
#[derive(Debug, Clone, Default)]
pub struct QuerySegment {
    pub records: Vec<TodoRecord>,
    /// Present when more rows remain
    pub continuation: Option<ContinuationToken>,
}

// == Table Store Trait ==
/// Point and partition operations on a todo table.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Name of the underlying table.
    fn table_name(&self) -> &str;

    /// Adds a new row. Fails with [`StoreError::Conflict`] if the key exists.
    ///
    /// Returns the row as stored, carrying its new ETag.
    async fn insert(&self, record: TodoRecord) -> Result<TodoRecord, StoreError>;

    /// Overwrites an existing row.
    ///
    /// A wildcard ETag replaces whatever is stored; any other value must match
    /// the stored version.
    async fn replace(&self, record: TodoRecord) -> Result<TodoRecord, StoreError>;

    /// Point lookup. A missing row is `Ok(None)`.
    async fn retrieve(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<TodoRecord>, StoreError>;

    /// Returns one page of the partition, ordered by row key.
    async fn query_partition(
        &self,
        partition_key: &str,
        continuation: Option<ContinuationToken>,
    ) -> Result<QuerySegment, StoreError>;

    /// Removes a row, checking `etag` the same way as [`TableStore::replace`].
    async fn delete(&self, partition_key: &str, row_key: &str, etag: &str)
        -> Result<(), StoreError>;

    /// Reads the whole partition, following continuation tokens.
    async fn query_all(&self, partition_key: &str) -> Result<Vec<TodoRecord>, StoreError> {
        let mut records = Vec::new();
        let mut continuation = None;

        loop {
            let segment = self.query_partition(partition_key, continuation).await?;
            records.extend(segment.records);
            match segment.continuation {
                Some(token) => continuation = Some(token),
                None => return Ok(records),
            }
        }
    }
}

//! In-memory table store
//!
//! Rows live in a BTreeMap keyed by (partition key, row key), which gives the
//! same ordering a table service uses for partition scans.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{TodoRecord, WILDCARD_ETAG};
use crate::storage::{ContinuationToken, QuerySegment, StoreError, TableStore, MAX_PAGE_SIZE};

type RowKey = (String, String);

#[derive(Debug, Default)]
struct Rows {
    entries: BTreeMap<RowKey, TodoRecord>,
    /// Bumped on every write; feeds the ETag of the written row
    version: u64,
}

impl Rows {
    fn next_etag(&mut self) -> String {
        self.version += 1;
        format!("W/\"{}\"", self.version)
    }
}

fn etag_matches(requested: &str, stored: &str) -> bool {
    requested == WILDCARD_ETAG || requested == stored
}

fn row_key(partition_key: &str, row_key: &str) -> RowKey {
    (partition_key.to_string(), row_key.to_string())
}

// == Memory Table ==
/// Table store held entirely in process memory.
#[derive(Debug)]
pub struct MemoryTable {
    name: String,
    page_size: usize,
    rows: RwLock<Rows>,
}

impl MemoryTable {
    // == Constructor ==
    /// Creates an empty table that pages queries at [`MAX_PAGE_SIZE`] rows.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_page_size(name, MAX_PAGE_SIZE)
    }

    /// Creates an empty table with a custom query page size.
    ///
    /// The page size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(name: impl Into<String>, page_size: usize) -> Self {
        Self {
            name: name.into(),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            rows: RwLock::new(Rows::default()),
        }
    }

    // == Length ==
    /// Returns the number of rows across all partitions.
    pub async fn len(&self) -> usize {
        self.rows.read().await.entries.len()
    }

    /// Returns true if the table holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.entries.is_empty()
    }
}

#[async_trait]
impl TableStore for MemoryTable {
    fn table_name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, mut record: TodoRecord) -> Result<TodoRecord, StoreError> {
        let mut rows = self.rows.write().await;
        let key = row_key(&record.partition_key, &record.row_key);
        if rows.entries.contains_key(&key) {
            return Err(StoreError::Conflict(key.0, key.1));
        }

        record.etag = rows.next_etag();
        rows.entries.insert(key, record.clone());
        Ok(record)
    }

    async fn replace(&self, mut record: TodoRecord) -> Result<TodoRecord, StoreError> {
        let mut rows = self.rows.write().await;
        let key = row_key(&record.partition_key, &record.row_key);
        match rows.entries.get(&key) {
            None => return Err(StoreError::NotFound(key.0, key.1)),
            Some(stored) if !etag_matches(&record.etag, &stored.etag) => {
                return Err(StoreError::PreconditionFailed(key.0, key.1));
            }
            Some(_) => {}
        }

        record.etag = rows.next_etag();
        rows.entries.insert(key, record.clone());
        Ok(record)
    }

    async fn retrieve(
        &self,
        partition_key: &str,
        row_key_value: &str,
    ) -> Result<Option<TodoRecord>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .entries
            .get(&row_key(partition_key, row_key_value))
            .cloned())
    }

    async fn query_partition(
        &self,
        partition_key: &str,
        continuation: Option<ContinuationToken>,
    ) -> Result<QuerySegment, StoreError> {
        let start = match continuation {
            Some(token) if token.partition_key != partition_key => {
                return Err(StoreError::InvalidContinuation);
            }
            Some(token) => token.next_row_key,
            None => String::new(),
        };

        let rows = self.rows.read().await;
        let mut partition = rows
            .entries
            .range((partition_key.to_string(), start)..)
            .take_while(|((pk, _), _)| pk.as_str() == partition_key)
            .map(|(_, record)| record);

        let records: Vec<TodoRecord> = partition
            .by_ref()
            .take(self.page_size)
            .cloned()
            .collect();
        let continuation = partition.next().map(|next| ContinuationToken {
            partition_key: partition_key.to_string(),
            next_row_key: next.row_key.clone(),
        });

        Ok(QuerySegment {
            records,
            continuation,
        })
    }

    async fn delete(
        &self,
        partition_key: &str,
        row_key_value: &str,
        etag: &str,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let key = row_key(partition_key, row_key_value);
        match rows.entries.get(&key) {
            None => return Err(StoreError::NotFound(key.0, key.1)),
            Some(stored) if !etag_matches(etag, &stored.etag) => {
                return Err(StoreError::PreconditionFailed(key.0, key.1));
            }
            Some(_) => {}
        }

        rows.entries.remove(&key);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Todo, TODO_PARTITION_KEY};
    use chrono::Utc;
    use uuid::Uuid;

    fn record(description: &str) -> TodoRecord {
        TodoRecord::create(&Todo::with_description(description), Uuid::new_v4(), Utc::now())
    }

    fn record_with_key(partition_key: &str, row_key: &str) -> TodoRecord {
        let mut record = record(row_key);
        record.partition_key = partition_key.to_string();
        record.row_key = row_key.to_string();
        record
    }

    #[tokio::test]
    async fn test_table_new() {
        let table = MemoryTable::new("todo");
        assert_eq!(table.table_name(), "todo");
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_and_retrieve() {
        let table = MemoryTable::new("todo");
        let stored = table.insert(record("buy milk")).await.unwrap();

        assert_ne!(stored.etag, WILDCARD_ETAG);
        let found = table
            .retrieve(TODO_PARTITION_KEY, &stored.row_key)
            .await
            .unwrap();
        assert_eq!(found, Some(stored));
        assert_eq!(table.len().await, 1);
    }

    #[tokio::test]
    async fn test_retrieve_missing_is_none() {
        let table = MemoryTable::new("todo");
        let found = table.retrieve(TODO_PARTITION_KEY, "missing").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_existing_key_conflicts() {
        let table = MemoryTable::new("todo");
        let stored = table.insert(record("a")).await.unwrap();

        let result = table.insert(stored).await;
        assert!(matches!(result, Err(StoreError::Conflict(_, _))));
        assert_eq!(table.len().await, 1);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let table = MemoryTable::new("todo");
        let result = table.replace(record("a")).await;
        assert!(matches!(result, Err(StoreError::NotFound(_, _))));
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_replace_with_wildcard_overwrites() {
        let table = MemoryTable::new("todo");
        let stored = table.insert(record("a")).await.unwrap();

        let mut changed = stored.clone();
        changed.task_description = "b".to_string();
        changed.etag = WILDCARD_ETAG.to_string();
        let replaced = table.replace(changed).await.unwrap();

        assert_ne!(replaced.etag, stored.etag);
        let found = table
            .retrieve(TODO_PARTITION_KEY, &stored.row_key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.task_description, "b");
    }

    #[tokio::test]
    async fn test_replace_with_stale_etag_fails() {
        let table = MemoryTable::new("todo");
        let stored = table.insert(record("a")).await.unwrap();

        let mut first = stored.clone();
        first.task_description = "first".to_string();
        table.replace(first).await.unwrap();

        let mut stale = stored;
        stale.task_description = "stale".to_string();
        let result = table.replace(stale).await;
        assert!(matches!(result, Err(StoreError::PreconditionFailed(_, _))));
    }

    #[tokio::test]
    async fn test_delete() {
        let table = MemoryTable::new("todo");
        let stored = table.insert(record("a")).await.unwrap();

        table
            .delete(TODO_PARTITION_KEY, &stored.row_key, WILDCARD_ETAG)
            .await
            .unwrap();
        assert!(table.is_empty().await);

        let result = table
            .delete(TODO_PARTITION_KEY, &stored.row_key, WILDCARD_ETAG)
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_, _))));
    }

    #[tokio::test]
    async fn test_query_partition_orders_by_row_key_and_skips_other_partitions() {
        let table = MemoryTable::new("todo");
        for key in ["c", "a", "b"] {
            table
                .insert(record_with_key(TODO_PARTITION_KEY, key))
                .await
                .unwrap();
        }
        table.insert(record_with_key("OTHER", "a")).await.unwrap();

        let segment = table.query_partition(TODO_PARTITION_KEY, None).await.unwrap();
        let keys: Vec<&str> = segment.records.iter().map(|r| r.row_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert!(segment.continuation.is_none());
    }

    #[tokio::test]
    async fn test_query_partition_pages_with_continuation() {
        let table = MemoryTable::with_page_size("todo", 2);
        for key in ["a", "b", "c", "d", "e"] {
            table
                .insert(record_with_key(TODO_PARTITION_KEY, key))
                .await
                .unwrap();
        }

        let first = table.query_partition(TODO_PARTITION_KEY, None).await.unwrap();
        assert_eq!(first.records.len(), 2);
        let token = first.continuation.unwrap();
        assert_eq!(token.next_row_key, "c");

        let second = table
            .query_partition(TODO_PARTITION_KEY, Some(token))
            .await
            .unwrap();
        assert_eq!(second.records[0].row_key, "c");
        assert!(second.continuation.is_some());

        let all = table.query_all(TODO_PARTITION_KEY).await.unwrap();
        let keys: Vec<&str> = all.iter().map(|r| r.row_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_query_partition_rejects_foreign_token() {
        let table = MemoryTable::new("todo");
        let token = ContinuationToken {
            partition_key: "OTHER".to_string(),
            next_row_key: "a".to_string(),
        };
        let result = table.query_partition(TODO_PARTITION_KEY, Some(token)).await;
        assert!(matches!(result, Err(StoreError::InvalidContinuation)));
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let table = MemoryTable::with_page_size("todo", 0);
        table
            .insert(record_with_key(TODO_PARTITION_KEY, "a"))
            .await
            .unwrap();
        table
            .insert(record_with_key(TODO_PARTITION_KEY, "b"))
            .await
            .unwrap();

        let segment = table.query_partition(TODO_PARTITION_KEY, None).await.unwrap();
        assert_eq!(segment.records.len(), 1);
        assert_eq!(table.query_all(TODO_PARTITION_KEY).await.unwrap().len(), 2);
    }
}

//! Todo models
//!
//! `Todo` is what clients send; `TodoRecord` is the row kept in the table.
//! Conversions between the two are pure and live here.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{TodoError, MISSING_DESCRIPTION};

/// Partition shared by every todo row.
pub const TODO_PARTITION_KEY: &str = "TODO";

/// Concurrency token that matches any stored version.
pub const WILDCARD_ETAG: &str = "*";

// == Todo ==
/// Todo payload as sent by clients on create and update.
///
/// Every field is optional on the wire; a missing `IsCompleted` reads as false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Todo {
    /// Unreadable timestamps decode to `None`; create never uses this field
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub task_description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Todo {
    /// Creates a payload with just a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            task_description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Returns the description when it holds something other than whitespace.
    pub fn description(&self) -> Option<&str> {
        self.task_description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Returns the description an update writes: anything but missing or `""`.
    pub fn replacement_description(&self) -> Option<&str> {
        self.task_description
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    // == Validate Create ==
    /// Checks that a create request carries a description.
    ///
    /// Updates skip this check: an empty description there leaves the stored
    /// one alone, while a whitespace one is written as given.
    pub fn validate_create(&self) -> Result<&str, TodoError> {
        self.description()
            .ok_or_else(|| TodoError::Validation(MISSING_DESCRIPTION.to_string()))
    }
}

// == Todo Record ==
/// A todo as persisted in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TodoRecord {
    pub partition_key: String,
    /// Server-generated id, never changed after insert
    pub row_key: String,
    pub created_time: DateTime<Utc>,
    pub task_description: String,
    pub is_completed: bool,
    #[serde(rename = "ETag")]
    pub etag: String,
}

impl TodoRecord {
    // == Create ==
    /// Builds the row for a new todo.
    ///
    /// The id and timestamp come from the caller so the mapping stays pure.
    /// `IsCompleted` and `CreatedTime` from the payload are ignored.
    pub fn create(todo: &Todo, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            partition_key: TODO_PARTITION_KEY.to_string(),
            row_key: id.to_string(),
            created_time: now,
            task_description: todo.task_description.clone().unwrap_or_default(),
            is_completed: false,
            etag: WILDCARD_ETAG.to_string(),
        }
    }

    // == With Update ==
    /// Returns a copy of this record with an update payload merged in.
    ///
    /// The completion flag is always taken from the payload. The description
    /// only changes when the payload carries a non-empty one. The ETag is reset
    /// to the wildcard, so the following replace overwrites unconditionally.
    pub fn with_update(&self, update: &Todo) -> Self {
        let mut updated = self.clone();
        updated.is_completed = update.is_completed;
        if let Some(description) = update.replacement_description() {
            updated.task_description = description.to_string();
        }
        updated.etag = WILDCARD_ETAG.to_string();
        updated
    }
}

/// Reads `CreatedTime` as RFC 3339, or as a zone-less timestamp taken as UTC.
/// Anything else becomes `None` instead of failing the whole body.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_timestamp))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|time| time.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            text.parse::<NaiveDateTime>()
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

//! Record-store seam.
//!
//! Herald persists nothing itself; the surrounding application owns a
//! record database and exposes it through [`RecordStore`]. Callers use
//! this interface to look up device tokens and build notification
//! payloads before scheduling; the scheduler itself never touches it.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error type for record-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No record in '{collection}' matched the filter")]
    NotFound { collection: String },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A stored record: an identifier plus loosely typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub collection: String,
    pub fields: HashMap<String, Value>,
}

impl StoredRecord {
    /// Create an empty record in `collection`.
    pub fn new(id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            fields: HashMap::new(),
        }
    }

    /// Set one field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Read a string field; empty string when absent or not a string.
    pub fn get_str(&self, name: &str) -> &str {
        self.fields.get(name).and_then(Value::as_str).unwrap_or("")
    }

    /// Read a list-of-strings field; empty when absent. Non-string list
    /// items are skipped.
    pub fn get_str_list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Conjunction of clauses a record must satisfy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    /// Field equals the given value.
    Eq { field: String, value: Value },
    /// Field is a list containing the given value.
    Contains { field: String, value: Value },
}

impl Filter {
    /// Filter with no clauses; matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    #[must_use]
    pub fn field_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Require the list field `field` to contain `value`.
    #[must_use]
    pub fn field_contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Contains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Evaluate the filter against a record. Missing fields never match.
    pub fn matches(&self, record: &StoredRecord) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Eq { field, value } => record.fields.get(field) == Some(value),
            Clause::Contains { field, value } => record
                .fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        })
    }

    /// Whether the filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Backend-agnostic record access.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record, returning it with its assigned identifier.
    async fn create(
        &self,
        collection: &str,
        fields: HashMap<String, Value>,
    ) -> Result<StoredRecord, StoreError>;

    /// First record in `collection` matching `filter`.
    async fn find_first(&self, collection: &str, filter: &Filter)
        -> Result<StoredRecord, StoreError>;

    /// All records in `collection` matching `filter`.
    async fn find_all(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    /// Replace the fields of an existing record.
    async fn update(&self, record: &StoredRecord) -> Result<(), StoreError>;

    /// Delete a record by identifier.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

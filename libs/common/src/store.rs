//! Document collection abstraction
//!
//! This module defines the capability every document store backend offers:
//! single-document insert, lookup, delete and field update, addressed by
//! simple equality filters. Documents are schema-free JSON objects.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreResult;

/// A schema-free document, stored as an ordered JSON object
pub type Document = Map<String, Value>;

/// Acknowledgment threshold required before a write is considered successful
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteConcern {
    /// The primary has applied the write
    #[default]
    Acknowledged,
    /// A majority of replicas have applied the write
    Majority,
}

/// Equality predicate on a single named field
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: String,
    value: Value,
}

impl Filter {
    /// Match documents whose `field` equals `value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Check whether a document satisfies this filter
    pub fn matches(&self, document: &Document) -> bool {
        document.get(&self.field) == Some(&self.value)
    }
}

/// Replacement of one top-level field of a document
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAssignment {
    field: String,
    value: Value,
}

impl FieldAssignment {
    /// Set `field` to `value`, replacing whatever was stored there
    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Apply the assignment to a document in place
    pub fn apply(&self, document: &mut Document) {
        document.insert(self.field.clone(), self.value.clone());
    }
}

/// Outcome of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    /// Whether the store acknowledged the request
    pub acknowledged: bool,
    /// Number of documents removed, zero when nothing matched
    pub deleted_count: u64,
}

/// A named collection of documents inside a document store
///
/// Each individual operation is atomic with respect to the document it
/// touches. Sequences of operations are not.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Name of the collection
    fn name(&self) -> &str;

    /// Insert a document, failing with `StoreError::DuplicateKey` when a
    /// uniqueness constraint of the collection is violated
    async fn insert_one(
        &self,
        document: Document,
        write_concern: WriteConcern,
    ) -> StoreResult<()>;

    /// Return the first document matching the filter, if any
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Delete the first document matching the filter
    async fn delete_one(&self, filter: &Filter) -> StoreResult<DeleteResult>;

    /// Atomically apply an assignment to the first matching document and
    /// return the updated document, or `None` when nothing matched
    async fn find_one_and_update(
        &self,
        filter: &Filter,
        assignment: &FieldAssignment,
    ) -> StoreResult<Option<Document>>;
}

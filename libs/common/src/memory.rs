//! In-memory document collection
//!
//! A process-local backend holding documents in insertion order. Every
//! operation takes the collection lock once, so single-document operations
//! are atomic just like they are on a real store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{
    DeleteResult, Document, DocumentCollection, FieldAssignment, Filter, WriteConcern,
};

/// In-memory collection with optional unique fields
#[derive(Debug, Clone)]
pub struct InMemoryCollection {
    /// Collection name
    name: String,
    /// Fields whose values must be unique across documents
    unique_fields: Vec<String>,
    /// Stored documents, oldest first
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryCollection {
    /// Create an empty collection without constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_unique(name, &[])
    }

    /// Create an empty collection enforcing uniqueness of the given fields
    pub fn with_unique(name: impl Into<String>, unique_fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            unique_fields: unique_fields.iter().map(|f| f.to_string()).collect(),
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the collection holds no documents
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Number of documents matching the filter
    pub async fn count(&self, filter: &Filter) -> usize {
        self.documents
            .read()
            .await
            .iter()
            .filter(|doc| filter.matches(doc))
            .count()
    }

    /// Reject `candidate` if it collides with a stored document other than the one at `skip`
    fn check_unique(
        &self,
        documents: &[Document],
        candidate: &Document,
        skip: Option<usize>,
    ) -> StoreResult<()> {
        for field in &self.unique_fields {
            let Some(value) = candidate.get(field) else {
                continue;
            };

            let collides = documents
                .iter()
                .enumerate()
                .any(|(i, doc)| Some(i) != skip && doc.get(field) == Some(value));

            if collides {
                return Err(StoreError::DuplicateKey {
                    collection: self.name.clone(),
                    message: format!("duplicate value {} for unique field {}", value, field),
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentCollection for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(
        &self,
        document: Document,
        write_concern: WriteConcern,
    ) -> StoreResult<()> {
        debug!("Inserting into {} with {:?}", self.name, write_concern);

        let mut documents = self.documents.write().await;
        self.check_unique(&documents, &document, None)?;
        documents.push(document);

        Ok(())
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|doc| filter.matches(doc)).cloned())
    }

    async fn delete_one(&self, filter: &Filter) -> StoreResult<DeleteResult> {
        let mut documents = self.documents.write().await;

        let deleted_count = match documents.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                documents.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        assignment: &FieldAssignment,
    ) -> StoreResult<Option<Document>> {
        let mut documents = self.documents.write().await;

        let Some(index) = documents.iter().position(|doc| filter.matches(doc)) else {
            return Ok(None);
        };

        let mut updated = documents[index].clone();
        assignment.apply(&mut updated);

        self.check_unique(&documents, &updated, Some(index))?;

        documents[index] = updated.clone();
        Ok(Some(updated))
    }
}

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{sort_summaries, DocumentStore, SaveRequest, StoreError, StoredDocument};
use crate::model::{Document, DocumentId, DocumentSummary};

/// In-process document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentId, StoredDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document directly, bypassing the save path.
    pub fn insert(&self, owner_id: &str, id: DocumentId, mut document: Document) {
        document.id = Some(id.clone());
        self.documents.write().insert(
            id,
            StoredDocument {
                owner_id: owner_id.to_string(),
                modified: Utc::now(),
                document,
            },
        );
    }

    /// Current stored copy of a document.
    pub fn get(&self, id: &DocumentId) -> Option<Document> {
        self.documents.read().get(id).map(|s| s.document.clone())
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.get(id))
    }

    async fn save_document(&self, request: SaveRequest) -> Result<DocumentId, StoreError> {
        let id = request.id.clone().unwrap_or_else(DocumentId::generate);
        let owner_id = request.owner_id.clone();
        let document = request.into_document(id.clone());
        self.documents.write().insert(
            id.clone(),
            StoredDocument {
                owner_id,
                modified: Utc::now(),
                document,
            },
        );
        Ok(id)
    }

    async fn list_documents(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        let mut summaries: Vec<DocumentSummary> = self
            .documents
            .read()
            .iter()
            .filter(|(_, stored)| stored.owner_id == owner_id)
            .map(|(id, stored)| stored.summary(id.clone()))
            .collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}

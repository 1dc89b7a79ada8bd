//! Document store collaborator.
//!
//! The engine treats persistence as opaque async I/O behind
//! [`DocumentStore`]. Two implementations ship with the crate:
//! - [`MemoryDocumentStore`]: in-process map, for tests and embedding
//! - [`FileDocumentStore`]: one JSON file per document in a directory

mod file;
mod memory;

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use threatkit_core::{ModelKind, SessionError};

use crate::model::{
    Component, Connection, Document, DocumentId, DocumentSummary, Report, ViewportState,
};

/// Persistence failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid document id: '{0}'")]
    InvalidId(String),

    #[error("Stored document '{id}' is malformed: {message}")]
    Malformed { id: String, message: String },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Maps this failure onto the session taxonomy for `operation`.
    pub fn into_session_error(self, operation: &str) -> SessionError {
        match self {
            StoreError::Malformed { message, .. } => SessionError::Malformed { message },
            other => SessionError::io(operation, other),
        }
    }
}

/// Everything a save hands to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub owner_id: String,
    /// `None` creates a new document.
    pub id: Option<DocumentId>,
    pub name: String,
    pub kind: ModelKind,
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
    pub viewport: ViewportState,
    pub reports: Vec<Report>,
}

impl SaveRequest {
    /// The document as it will be stored under `id`.
    pub fn into_document(self, id: DocumentId) -> Document {
        Document {
            id: Some(id),
            name: self.name,
            kind: self.kind,
            components: self.components,
            connections: self.connections,
            viewport: self.viewport,
            reports: self.reports,
        }
    }
}

/// A document together with its store metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub owner_id: String,
    pub modified: DateTime<Utc>,
    pub document: Document,
}

impl StoredDocument {
    pub fn summary(&self, id: DocumentId) -> DocumentSummary {
        DocumentSummary {
            id,
            name: self.document.name.clone(),
            kind: self.document.kind,
            modified: self.modified,
            component_count: self.document.components.len(),
        }
    }
}

/// Async document persistence.
///
/// Implementations only need read-your-writes on the same id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a document; `Ok(None)` when the id is unknown.
    async fn load_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// Saves a document, creating it when `request.id` is `None`.
    ///
    /// Returns the document's id.
    async fn save_document(&self, request: SaveRequest) -> Result<DocumentId, StoreError>;

    /// Lists an owner's documents, most recently modified first.
    async fn list_documents(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError>;
}

fn sort_summaries(summaries: &mut [DocumentSummary]) {
    summaries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.id.cmp(&b.id)));
}

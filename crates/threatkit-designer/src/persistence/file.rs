use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{sort_summaries, DocumentStore, SaveRequest, StoreError, StoredDocument};
use crate::model::{Document, DocumentId, DocumentSummary};

/// Directory-backed store: one pretty-printed JSON file per document.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &DocumentId) -> Result<PathBuf, StoreError> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    async fn read_stored(
        &self,
        path: &Path,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                id: id.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let path = self.path_for(id)?;
        let stored = self.read_stored(&path, id.as_str()).await?;
        Ok(stored.map(|s| {
            let mut document = s.document;
            document.id = Some(id.clone());
            document
        }))
    }

    async fn save_document(&self, request: SaveRequest) -> Result<DocumentId, StoreError> {
        let id = request.id.clone().unwrap_or_else(DocumentId::generate);
        let path = self.path_for(&id)?;

        let stored = StoredDocument {
            owner_id: request.owner_id.clone(),
            modified: Utc::now(),
            document: request.into_document(id.clone()),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        tokio::fs::create_dir_all(&self.root).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(document_id = %id, path = %path.display(), "Document written");
        Ok(id)
    }

    async fn list_documents(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.read_stored(&path, stem).await {
                Ok(Some(stored)) if stored.owner_id == owner_id => {
                    summaries.push(stored.summary(DocumentId::new(stem)));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping unreadable document: {}", e)
                }
            }
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, PropertyBag, ViewportState};
    use threatkit_core::ModelKind;

    fn request(id: Option<DocumentId>, name: &str) -> SaveRequest {
        SaveRequest {
            owner_id: "local".into(),
            id,
            name: name.into(),
            kind: ModelKind::Infrastructure,
            components: vec![Component::new("a", "server", PropertyBag::new())],
            connections: Vec::new(),
            viewport: ViewportState {
                x: 10.0,
                y: 20.0,
                zoom: 1.5,
            },
            reports: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("docs"));

        let id = store.save_document(request(None, "Payments")).await.unwrap();
        let doc = store.load_document(&id).await.unwrap().unwrap();

        assert_eq!(doc.id, Some(id.clone()));
        assert_eq!(doc.name, "Payments");
        assert_eq!(doc.components.len(), 1);
        assert_eq!(doc.viewport.zoom, 1.5);
        assert!(dir.path().join("docs").join(format!("{}.json", id)).exists());
    }

    #[tokio::test]
    async fn test_missing_document_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("absent"));
        assert!(store.load_document(&"abc".into()).await.unwrap().is_none());
        assert!(store.list_documents("local").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let err = store.load_document(&"../etc/passwd".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let store = FileDocumentStore::new(dir.path());

        let err = store.load_document(&"bad".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert!(store.list_documents("local").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());

        let first = store.save_document(request(None, "Older")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.save_document(request(None, "Newer")).await.unwrap();

        let listed = store.list_documents("local").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![second, first]);
        assert!(store.list_documents("someone-else").await.unwrap().is_empty());
    }
}

//! Collaborator interfaces for document storage and analysis persistence.
//!
//! The pipeline never talks to a database. Callers plug in whatever storage
//! they have through these traits; [`InMemoryStore`] backs the HTTP front
//! and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::AnalysisRecord;

/// Result type for collaborator operations.
pub type StoreResult<T> = Result<T, String>;

/// Supplies raw document bytes and caches extracted text.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Raw bytes of a document owned by `user_id`.
    async fn raw_bytes(&self, document_id: &str, user_id: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Previously extracted text, if any.
    async fn extracted_text(&self, document_id: &str, user_id: &str)
        -> StoreResult<Option<String>>;

    /// Remember extracted text for later reuse.
    async fn save_extracted_text(&self, document_id: &str, text: &str) -> StoreResult<()>;
}

/// Accepts finished analyses.
#[async_trait]
pub trait AnalysisSink: Send + Sync {
    async fn save_analysis(&self, record: &AnalysisRecord) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
struct StoredDocument {
    user_id: String,
    bytes: Vec<u8>,
    text: Option<String>,
}

/// In-memory document store and analysis sink.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
    analyses: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document owned by `user_id`.
    pub async fn insert_document(&self, document_id: &str, user_id: &str, bytes: Vec<u8>) {
        self.documents.write().await.insert(
            document_id.to_string(),
            StoredDocument {
                user_id: user_id.to_string(),
                bytes,
                text: None,
            },
        );
    }

    /// Number of documents currently held.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// All analyses for a user, newest first.
    pub async fn analyses_for_user(&self, user_id: &str) -> Vec<AnalysisRecord> {
        let mut records: Vec<_> = self
            .analyses
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    async fn owned<T>(
        &self,
        document_id: &str,
        user_id: &str,
        f: impl FnOnce(&StoredDocument) -> T,
    ) -> Option<T> {
        self.documents
            .read()
            .await
            .get(document_id)
            .filter(|d| d.user_id == user_id)
            .map(f)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn raw_bytes(&self, document_id: &str, user_id: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self
            .owned(document_id, user_id, |d| d.bytes.clone())
            .await)
    }

    async fn extracted_text(
        &self,
        document_id: &str,
        user_id: &str,
    ) -> StoreResult<Option<String>> {
        Ok(self
            .owned(document_id, user_id, |d| d.text.clone())
            .await
            .flatten())
    }

    async fn save_extracted_text(&self, document_id: &str, text: &str) -> StoreResult<()> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(document_id) {
            Some(doc) => {
                doc.text = Some(text.to_string());
                Ok(())
            }
            None => Err(format!("unknown document {}", document_id)),
        }
    }
}

#[async_trait]
impl AnalysisSink for InMemoryStore {
    async fn save_analysis(&self, record: &AnalysisRecord) -> StoreResult<()> {
        self.analyses.write().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisResult;

    #[tokio::test]
    async fn test_documents_scoped_to_owner() {
        let store = InMemoryStore::new();
        store.insert_document("d1", "alice", b"%PDF".to_vec()).await;

        assert!(store.raw_bytes("d1", "alice").await.unwrap().is_some());
        assert!(store.raw_bytes("d1", "bob").await.unwrap().is_none());
        assert!(store.raw_bytes("d2", "alice").await.unwrap().is_none());
        assert_eq!(store.document_count().await, 1);
    }

    #[tokio::test]
    async fn test_extracted_text_roundtrip() {
        let store = InMemoryStore::new();
        store.insert_document("d1", "alice", Vec::new()).await;
        assert_eq!(store.extracted_text("d1", "alice").await.unwrap(), None);

        store.save_extracted_text("d1", "hello").await.unwrap();
        assert_eq!(
            store.extracted_text("d1", "alice").await.unwrap().as_deref(),
            Some("hello")
        );
        assert!(store.save_extracted_text("missing", "x").await.is_err());
    }

    #[tokio::test]
    async fn test_analyses_filtered_by_user() {
        let store = InMemoryStore::new();
        let result = AnalysisResult {
            summary: "s".to_string(),
            topics: vec!["t".to_string()],
            insights: None,
        };
        store
            .save_analysis(&AnalysisRecord::new("d1", "alice", result.clone()))
            .await
            .unwrap();
        store
            .save_analysis(&AnalysisRecord::new("d2", "bob", result))
            .await
            .unwrap();

        let records = store.analyses_for_user("alice").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_id, "d1");
    }
}

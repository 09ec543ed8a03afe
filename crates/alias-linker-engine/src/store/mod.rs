//! The document store the linker works against.
//!
//! The store owns the notes. Listing and metadata are served from whatever
//! the store has already resolved, so they are synchronous; bodies are read
//! and written asynchronously and one document at a time.

pub mod memory;
pub mod vault;

use crate::io::IoError;
use crate::models::{DocumentRef, Frontmatter};
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use vault::VaultStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentRef),
    #[error("IO error on {document}: {source}")]
    Io {
        document: DocumentRef,
        #[source]
        source: IoError,
    },
    #[error("Store rejected write to {document}: {reason}")]
    Rejected { document: DocumentRef, reason: String },
}

impl StoreError {
    pub(crate) fn from_io(document: &DocumentRef, source: IoError) -> Self {
        match source {
            IoError::NotFound(_) => StoreError::NotFound(document.clone()),
            source => StoreError::Io {
                document: document.clone(),
                source,
            },
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in listing order
    fn list_documents(&self) -> Vec<DocumentRef>;

    /// Cached frontmatter for a document, `None` when it declares none
    fn metadata(&self, document: &DocumentRef) -> Option<Frontmatter>;

    async fn read_body(&self, document: &DocumentRef) -> Result<String, StoreError>;

    async fn write_body(&self, document: &DocumentRef, body: &str) -> Result<(), StoreError>;
}

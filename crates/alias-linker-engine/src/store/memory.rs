use super::{DocumentStore, StoreError};
use crate::models::{DocumentRef, Frontmatter};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Entry {
    document: DocumentRef,
    body: String,
    metadata: Option<Frontmatter>,
    writes: usize,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<Entry>,
    failing_reads: HashSet<DocumentRef>,
    failing_writes: HashSet<DocumentRef>,
}

impl Inner {
    fn entry(&self, document: &DocumentRef) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.document == document)
    }

    fn entry_mut(&mut self, document: &DocumentRef) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| &e.document == document)
    }
}

/// Document store held entirely in memory.
///
/// Documents are listed in insertion order. Metadata is parsed from each
/// body's frontmatter whenever the body changes, the way a host keeps its
/// metadata cache in step with saved files. Every successful `write_body`
/// is counted so callers can check which documents were rewritten.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryStore::insert`]
    pub fn with_document(self, path: &str, body: &str) -> Self {
        self.insert(path, body);
        self
    }

    /// Add a document, or replace the body of an existing one without
    /// counting it as a write
    pub fn insert(&self, path: &str, body: &str) -> DocumentRef {
        let document = DocumentRef::from(path);
        let mut inner = self.lock();
        let metadata = Frontmatter::parse(body);
        if let Some(entry) = inner.entry_mut(&document) {
            entry.body = body.to_string();
            entry.metadata = metadata;
        } else {
            inner.entries.push(Entry {
                document: document.clone(),
                body: body.to_string(),
                metadata,
                writes: 0,
            });
        }
        document
    }

    pub fn document(&self, path: &str) -> Option<DocumentRef> {
        let document = DocumentRef::from(path);
        self.lock().entry(&document).map(|e| e.document.clone())
    }

    pub fn body(&self, path: &str) -> Option<String> {
        self.lock()
            .entry(&DocumentRef::from(path))
            .map(|e| e.body.clone())
    }

    pub fn write_count(&self, path: &str) -> usize {
        self.lock()
            .entry(&DocumentRef::from(path))
            .map_or(0, |e| e.writes)
    }

    pub fn total_writes(&self) -> usize {
        self.lock().entries.iter().map(|e| e.writes).sum()
    }

    /// Make every later read of `path` fail
    pub fn fail_reads_from(&self, path: &str) {
        self.lock().failing_reads.insert(DocumentRef::from(path));
    }

    /// Make every later write to `path` be rejected
    pub fn fail_writes_to(&self, path: &str) {
        self.lock().failing_writes.insert(DocumentRef::from(path));
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn list_documents(&self) -> Vec<DocumentRef> {
        self.lock()
            .entries
            .iter()
            .map(|e| e.document.clone())
            .collect()
    }

    fn metadata(&self, document: &DocumentRef) -> Option<Frontmatter> {
        self.lock().entry(document).and_then(|e| e.metadata.clone())
    }

    async fn read_body(&self, document: &DocumentRef) -> Result<String, StoreError> {
        let inner = self.lock();
        if inner.failing_reads.contains(document) {
            return Err(StoreError::Rejected {
                document: document.clone(),
                reason: "read failure injected".to_string(),
            });
        }
        inner
            .entry(document)
            .map(|e| e.body.clone())
            .ok_or_else(|| StoreError::NotFound(document.clone()))
    }

    async fn write_body(&self, document: &DocumentRef, body: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.failing_writes.contains(document) {
            return Err(StoreError::Rejected {
                document: document.clone(),
                reason: "write failure injected".to_string(),
            });
        }
        let entry = inner
            .entry_mut(document)
            .ok_or_else(|| StoreError::NotFound(document.clone()))?;
        entry.body = body.to_string();
        entry.metadata = Frontmatter::parse(body);
        entry.writes += 1;
        Ok(())
    }
}

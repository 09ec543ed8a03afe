use super::{DocumentStore, StoreError};
use crate::io::{self, IoError};
use crate::models::{DocumentRef, Frontmatter};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A notes directory on disk.
///
/// Listing and frontmatter come from the cache built by
/// [`VaultStore::resolve_metadata`]; bodies always go to disk. Documents are
/// listed in relative-path order.
#[derive(Debug)]
pub struct VaultStore {
    notes_root: PathBuf,
    metadata: RwLock<BTreeMap<DocumentRef, Option<Frontmatter>>>,
}

impl VaultStore {
    /// Open a notes directory and resolve its metadata
    pub fn open(notes_root: impl Into<PathBuf>) -> Result<Self, IoError> {
        let store = Self {
            notes_root: notes_root.into(),
            metadata: RwLock::new(BTreeMap::new()),
        };
        store.resolve_metadata()?;
        Ok(store)
    }

    pub fn notes_root(&self) -> &Path {
        &self.notes_root
    }

    /// Rescan the directory and rebuild the listing and frontmatter cache.
    ///
    /// Returns the number of documents found. Files that cannot be read are
    /// listed without metadata.
    pub fn resolve_metadata(&self) -> Result<usize, IoError> {
        let files = io::scan_markdown_files(&self.notes_root)?;
        let mut resolved = BTreeMap::new();

        for relative_path in files {
            let absolute_path = relative_path.to_path(&self.notes_root);
            let frontmatter = match std::fs::read_to_string(&absolute_path) {
                Ok(content) => Frontmatter::parse(&content),
                Err(e) => {
                    log::warn!("Could not read {}: {e}", absolute_path.display());
                    None
                }
            };
            resolved.insert(DocumentRef::new(relative_path), frontmatter);
        }

        let count = resolved.len();
        *self.write_cache() = resolved;
        log::debug!(
            "Resolved metadata for {count} documents in {}",
            self.notes_root.display()
        );
        Ok(count)
    }

    /// Find a listed document by its relative path
    pub fn document(&self, relative_path: &str) -> Option<DocumentRef> {
        let wanted = DocumentRef::from(relative_path);
        self.read_cache().contains_key(&wanted).then_some(wanted)
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, BTreeMap<DocumentRef, Option<Frontmatter>>> {
        self.metadata.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, BTreeMap<DocumentRef, Option<Frontmatter>>> {
        self.metadata.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for VaultStore {
    fn list_documents(&self) -> Vec<DocumentRef> {
        self.read_cache().keys().cloned().collect()
    }

    fn metadata(&self, document: &DocumentRef) -> Option<Frontmatter> {
        self.read_cache().get(document).cloned().flatten()
    }

    async fn read_body(&self, document: &DocumentRef) -> Result<String, StoreError> {
        io::read_file(document.relative_path(), &self.notes_root)
            .await
            .map_err(|e| StoreError::from_io(document, e))
    }

    async fn write_body(&self, document: &DocumentRef, body: &str) -> Result<(), StoreError> {
        io::write_file(document.relative_path(), &self.notes_root, body)
            .await
            .map_err(|e| StoreError::from_io(document, e))?;

        self.write_cache()
            .insert(document.clone(), Frontmatter::parse(body));
        Ok(())
    }
}

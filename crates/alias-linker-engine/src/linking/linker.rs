use super::index::{AliasIndex, AliasPair, DuplicateAlias, DuplicateAliasPolicy};
use super::rewrite::{LinkRewriter, Outcome};
use crate::models::DocumentRef;
use crate::store::{DocumentStore, StoreError};

/// A document the batch pass could not read or write
#[derive(Debug)]
pub struct DocumentFailure {
    pub document: DocumentRef,
    pub error: StoreError,
}

/// Summary of one batch pass
#[derive(Debug, Default)]
pub struct PassReport {
    /// Documents the pass attempted, failed ones included
    pub scanned: usize,
    /// Documents written back, in listing order
    pub rewritten: Vec<DocumentRef>,
    pub failures: Vec<DocumentFailure>,
    /// Aliases claimed by more than one document at the time of the pass
    pub duplicates: Vec<DuplicateAlias>,
    /// Declared aliases that cannot be written as a bare link and were ignored
    pub unusable: Vec<AliasPair>,
}

impl PassReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Entry points the host calls when its document store changes.
///
/// The two notifications share no state between calls: every pass reads the
/// store's current listing and metadata afresh. Passes are awaited one
/// document at a time.
pub struct AliasLinker<S: DocumentStore> {
    store: S,
    policy: DuplicateAliasPolicy,
}

impl<S: DocumentStore> AliasLinker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: DuplicateAliasPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicateAliasPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> DuplicateAliasPolicy {
        self.policy
    }

    pub fn index(&self) -> AliasIndex<'_, S> {
        AliasIndex::new(&self.store)
    }

    fn rewriter(&self) -> LinkRewriter<'_, S> {
        LinkRewriter::new(&self.store, self.policy)
    }

    /// Collection metadata settled: qualify every known alias in every document.
    ///
    /// A document that fails to read or write is recorded in the report and
    /// the pass moves on to the next one.
    pub async fn on_metadata_resolved(&self) -> PassReport {
        let index = self.index();
        let mut report = PassReport {
            duplicates: index.duplicate_aliases(),
            unusable: index.unusable_aliases(),
            ..PassReport::default()
        };
        for pair in &report.unusable {
            log::debug!(
                "Ignoring unusable alias {:?} of {:?}",
                pair.alias,
                pair.canonical_name
            );
        }
        for duplicate in &report.duplicates {
            let owners: Vec<String> = duplicate.documents.iter().map(|d| d.to_string()).collect();
            log::warn!(
                "Alias {:?} is declared by {} documents: {}",
                duplicate.alias,
                owners.len(),
                owners.join(", ")
            );
        }

        let pairs = index.resolved_alias_pairs(self.policy);
        if pairs.is_empty() {
            log::debug!("No aliases declared, nothing to rewrite");
            return report;
        }

        let rewriter = self.rewriter();
        for document in self.store.list_documents() {
            report.scanned += 1;
            match rewriter.rewrite_all_aliases(&document, &pairs).await {
                Ok(Outcome::Rewritten) => report.rewritten.push(document),
                Ok(Outcome::Unchanged) => {}
                Err(error) => {
                    log::warn!("Skipping {document}: {error}");
                    report.failures.push(DocumentFailure { document, error });
                }
            }
        }

        log::info!(
            "Alias pass: {} aliases, {} documents scanned, {} rewritten, {} failed",
            pairs.len(),
            report.scanned,
            report.rewritten.len(),
            report.failures.len()
        );
        report
    }

    /// A document became active: resolve the bare links it contains
    pub async fn on_document_opened(&self, document: &DocumentRef) -> Result<Outcome, StoreError> {
        let outcome = self.rewriter().resolve_links_in_document(document).await?;
        if outcome == Outcome::Rewritten {
            log::info!("Resolved alias links in {document}");
        }
        Ok(outcome)
    }
}

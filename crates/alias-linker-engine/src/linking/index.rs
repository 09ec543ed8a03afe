use super::wikilink::WikiLink;
use crate::models::DocumentRef;
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// What to do when more than one document declares the same alias
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateAliasPolicy {
    /// The first declaring document in listing order owns the alias
    #[default]
    FirstWins,
    /// Ambiguous aliases resolve to nothing and their links stay bare
    Skip,
}

/// An alias and the canonical name of the document declaring it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPair {
    pub alias: String,
    pub canonical_name: String,
}

impl AliasPair {
    /// Whether `[[alias]]` and `[[canonical_name|alias]]` can both be written
    pub fn is_usable(&self) -> bool {
        WikiLink::is_linkable(&self.alias) && WikiLink::is_linkable(&self.canonical_name)
    }
}

/// An alias declared by several documents, with every claimant in listing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAlias {
    pub alias: String,
    pub documents: Vec<DocumentRef>,
}

/// Alias lookups over a document store.
///
/// Nothing is cached here: every call walks the store's current listing and
/// metadata, so answers always match what the host last resolved.
pub struct AliasIndex<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> AliasIndex<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// First document in listing order whose aliases contain `alias` exactly
    pub fn find_document_by_alias(&self, alias: &str) -> Option<DocumentRef> {
        self.store.list_documents().into_iter().find(|document| {
            self.store
                .metadata(document)
                .is_some_and(|fm| fm.declares_alias(alias))
        })
    }

    /// Every declared `(alias, canonical name)` pair, in listing order then
    /// declaration order
    pub fn all_alias_pairs(&self) -> Vec<AliasPair> {
        let mut pairs = Vec::new();
        for document in self.store.list_documents() {
            let Some(frontmatter) = self.store.metadata(&document) else {
                continue;
            };
            pairs.extend(frontmatter.aliases().map(|alias| AliasPair {
                alias: alias.to_string(),
                canonical_name: document.canonical_name().to_string(),
            }));
        }
        pairs
    }

    /// Declared pairs that can never appear as a bare link, in declaration order
    pub fn unusable_aliases(&self) -> Vec<AliasPair> {
        self.all_alias_pairs()
            .into_iter()
            .filter(|pair| !pair.is_usable())
            .collect()
    }

    /// Aliases claimed by more than one document
    pub fn duplicate_aliases(&self) -> Vec<DuplicateAlias> {
        let mut claims: Vec<DuplicateAlias> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for document in self.store.list_documents() {
            let Some(frontmatter) = self.store.metadata(&document) else {
                continue;
            };
            for alias in frontmatter.aliases() {
                match positions.get(alias) {
                    Some(&i) => {
                        if !claims[i].documents.contains(&document) {
                            claims[i].documents.push(document.clone());
                        }
                    }
                    None => {
                        positions.insert(alias.to_string(), claims.len());
                        claims.push(DuplicateAlias {
                            alias: alias.to_string(),
                            documents: vec![document.clone()],
                        });
                    }
                }
            }
        }

        claims.retain(|claim| claim.documents.len() > 1);
        claims
    }

    /// Resolve an alias under `policy`
    pub fn resolve(&self, alias: &str, policy: DuplicateAliasPolicy) -> Option<DocumentRef> {
        match policy {
            DuplicateAliasPolicy::FirstWins => self.find_document_by_alias(alias),
            DuplicateAliasPolicy::Skip => {
                let mut owners = self.store.list_documents().into_iter().filter(|document| {
                    self.store
                        .metadata(document)
                        .is_some_and(|fm| fm.declares_alias(alias))
                });
                let first = owners.next()?;
                owners.next().is_none().then_some(first)
            }
        }
    }

    /// One usable pair per alias as `policy` resolves it, in first-declaration
    /// order.
    ///
    /// An alias whose owner is unusable is dropped rather than handed to the
    /// next claimant, matching what a lookup through [`Self::resolve`] gives.
    pub fn resolved_alias_pairs(&self, policy: DuplicateAliasPolicy) -> Vec<AliasPair> {
        let ambiguous: HashSet<String> = match policy {
            DuplicateAliasPolicy::FirstWins => HashSet::new(),
            DuplicateAliasPolicy::Skip => self
                .duplicate_aliases()
                .into_iter()
                .map(|duplicate| duplicate.alias)
                .collect(),
        };

        let mut seen = HashSet::new();
        self.all_alias_pairs()
            .into_iter()
            .filter(|pair| !ambiguous.contains(&pair.alias))
            .filter(|pair| seen.insert(pair.alias.clone()))
            .filter(AliasPair::is_usable)
            .collect()
    }
}

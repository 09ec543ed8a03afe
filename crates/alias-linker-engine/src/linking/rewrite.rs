use super::index::{AliasIndex, AliasPair, DuplicateAliasPolicy};
use super::wikilink::{WikiLink, bare_links, qualify_bare_links};
use crate::models::DocumentRef;
use crate::store::{DocumentStore, StoreError};
use std::collections::HashSet;

/// Result of a rewrite against one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The body changed and was written back once
    Rewritten,
    /// Nothing matched; the store was not written
    Unchanged,
}

/// Qualify bare links to `alias` in `body`, `None` when nothing changed.
///
/// Pairs whose alias or target could not form a bare link are ignored.
pub fn rewrite_alias(body: &str, alias: &str, canonical_name: &str) -> Option<String> {
    if !WikiLink::is_linkable(alias) || !WikiLink::is_linkable(canonical_name) {
        log::debug!("Ignoring unlinkable alias {alias:?} -> {canonical_name:?}");
        return None;
    }
    qualify_bare_links(body, alias, canonical_name)
}

/// Apply every pair to `body` in order
pub fn rewrite_aliases(body: &str, pairs: &[AliasPair]) -> Option<String> {
    let mut current: Option<String> = None;
    for pair in pairs {
        let text = current.as_deref().unwrap_or(body);
        if let Some(rewritten) = rewrite_alias(text, &pair.alias, &pair.canonical_name) {
            current = Some(rewritten);
        }
    }
    current
}

/// Qualify every bare link in `body` that `resolve` can name a target for.
///
/// Links are discovered by scanning the original text left to right; each
/// distinct link text is resolved once and then replaced everywhere in the
/// accumulated result.
pub fn resolve_links<F>(body: &str, mut resolve: F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut seen = HashSet::new();
    let mut current: Option<String> = None;

    for text in bare_links(body) {
        if !seen.insert(text) {
            continue;
        }
        let Some(target) = resolve(text) else {
            continue;
        };
        let accumulated = current.as_deref().unwrap_or(body);
        if let Some(rewritten) = rewrite_alias(accumulated, text, &target) {
            current = Some(rewritten);
        }
    }
    current
}

/// Rewrites links in stored documents.
///
/// Every entry point reads the body once and writes it back at most once,
/// and only when the text actually changed. Writes can make the host
/// re-resolve metadata and fire another pass, so a pass that finds nothing
/// to do must leave the store untouched.
pub struct LinkRewriter<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    policy: DuplicateAliasPolicy,
}

impl<'a, S: DocumentStore + ?Sized> LinkRewriter<'a, S> {
    pub fn new(store: &'a S, policy: DuplicateAliasPolicy) -> Self {
        Self { store, policy }
    }

    /// Replace `[[alias]]` with `[[canonical_name|alias]]` throughout `document`
    pub async fn rewrite_alias_occurrences(
        &self,
        document: &DocumentRef,
        alias: &str,
        canonical_name: &str,
    ) -> Result<Outcome, StoreError> {
        let body = self.store.read_body(document).await?;
        let rewritten = rewrite_alias(&body, alias, canonical_name);
        self.commit(document, &body, rewritten).await
    }

    /// Apply a batch of alias pairs to `document` with a single write
    pub async fn rewrite_all_aliases(
        &self,
        document: &DocumentRef,
        pairs: &[AliasPair],
    ) -> Result<Outcome, StoreError> {
        let body = self.store.read_body(document).await?;
        let rewritten = rewrite_aliases(&body, pairs);
        self.commit(document, &body, rewritten).await
    }

    /// Resolve each bare link in `document` against the alias index
    pub async fn resolve_links_in_document(
        &self,
        document: &DocumentRef,
    ) -> Result<Outcome, StoreError> {
        let body = self.store.read_body(document).await?;
        let index = AliasIndex::new(self.store);
        let rewritten = resolve_links(&body, |text| {
            index
                .resolve(text, self.policy)
                .map(|owner| owner.canonical_name().to_string())
        });
        self.commit(document, &body, rewritten).await
    }

    async fn commit(
        &self,
        document: &DocumentRef,
        original: &str,
        rewritten: Option<String>,
    ) -> Result<Outcome, StoreError> {
        let Some(rewritten) = rewritten.filter(|text| text != original) else {
            return Ok(Outcome::Unchanged);
        };
        self.store.write_body(document, &rewritten).await?;
        log::debug!("Rewrote alias links in {document}");
        Ok(Outcome::Rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn pair(alias: &str, canonical_name: &str) -> AliasPair {
        AliasPair {
            alias: alias.to_string(),
            canonical_name: canonical_name.to_string(),
        }
    }

    #[test]
    fn test_rewrite_alias_ignores_unlinkable_pairs() {
        let body = "[[A|Apple]] [[]]";
        assert_eq!(rewrite_alias(body, "A|Apple", "X"), None);
        assert_eq!(rewrite_alias(body, "", "X"), None);
        assert_eq!(rewrite_alias("[[Apple]]", "Apple", "bad|name"), None);
    }

    #[test]
    fn test_rewrite_aliases_applies_pairs_in_order() {
        let body = "[[Apple]] and [[Rome]] but not [[Roman]]";
        let out = rewrite_aliases(body, &[pair("Apple", "A"), pair("Rome", "Italy")]);
        assert_eq!(
            out.as_deref(),
            Some("[[A|Apple]] and [[Italy|Rome]] but not [[Roman]]")
        );
    }

    #[test]
    fn test_rewrite_aliases_first_pair_wins_for_duplicates() {
        let pairs = [pair("Shared", "First"), pair("Shared", "Second")];
        let out = rewrite_aliases("[[Shared]]", &pairs);
        assert_eq!(out.as_deref(), Some("[[First|Shared]]"));
    }

    #[test]
    fn test_resolve_links_resolves_each_text_once() {
        let mut lookups = Vec::new();
        let out = resolve_links("[[Apple]] [[Pear]] [[Apple]] [[X|Apple]]", |text| {
            lookups.push(text.to_string());
            (text == "Apple").then(|| "A".to_string())
        });

        assert_eq!(
            out.as_deref(),
            Some("[[A|Apple]] [[Pear]] [[A|Apple]] [[X|Apple]]")
        );
        assert_eq!(lookups, vec!["Apple", "Pear"]);
    }

    #[test]
    fn test_resolve_links_unresolved_is_unchanged() {
        assert_eq!(resolve_links("[[NoSuchAlias]]", |_| None), None);
    }

    #[test]
    fn test_resolve_links_in_realistic_note() {
        let body = "\
# Trip notes

Flew into [[Rome]] on Monday. The [[Roman]] forum was closed.
Lunch: [[Apple]] pie, see [[Recipes|Apple]].

- [[Rome]] again
- [[Unknown place]]
";
        let out = resolve_links(body, |text| match text {
            "Rome" => Some("Italy".to_string()),
            "Apple" => Some("A".to_string()),
            _ => None,
        });

        assert_snapshot!(out.unwrap(), @r"
        # Trip notes

        Flew into [[Italy|Rome]] on Monday. The [[Roman]] forum was closed.
        Lunch: [[A|Apple]] pie, see [[Recipes|Apple]].

        - [[Italy|Rome]] again
        - [[Unknown place]]
        ");
    }

    #[tokio::test]
    async fn test_targeted_rewrite_writes_once() {
        let store = MemoryStore::new().with_document("B.md", "[[Apple]] [[Apple]] [[Apple]]");
        let doc = store.document("B.md").unwrap();
        let rewriter = LinkRewriter::new(&store, DuplicateAliasPolicy::FirstWins);

        let outcome = rewriter
            .rewrite_alias_occurrences(&doc, "Apple", "A")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Rewritten);
        assert_eq!(
            store.body("B.md").as_deref(),
            Some("[[A|Apple]] [[A|Apple]] [[A|Apple]]")
        );
        assert_eq!(store.write_count("B.md"), 1);
    }

    #[tokio::test]
    async fn test_targeted_rewrite_without_match_does_not_write() {
        let store = MemoryStore::new().with_document("B.md", "[[Target|Apple]] and [[Applesauce]]");
        let doc = store.document("B.md").unwrap();
        let rewriter = LinkRewriter::new(&store, DuplicateAliasPolicy::FirstWins);

        let outcome = rewriter
            .rewrite_alias_occurrences(&doc, "Apple", "A")
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(store.write_count("B.md"), 0);
    }

    #[tokio::test]
    async fn test_local_pass_respects_skip_policy() {
        let store = MemoryStore::new()
            .with_document("First.md", "---\naliases: [Shared]\n---\n")
            .with_document("Second.md", "---\naliases: [Shared]\n---\n")
            .with_document("D.md", "[[Shared]]");
        let doc = store.document("D.md").unwrap();

        let skip = LinkRewriter::new(&store, DuplicateAliasPolicy::Skip);
        assert_eq!(
            skip.resolve_links_in_document(&doc).await.unwrap(),
            Outcome::Unchanged
        );

        let first_wins = LinkRewriter::new(&store, DuplicateAliasPolicy::FirstWins);
        assert_eq!(
            first_wins.resolve_links_in_document(&doc).await.unwrap(),
            Outcome::Rewritten
        );
        assert_eq!(store.body("D.md").as_deref(), Some("[[First|Shared]]"));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let store = MemoryStore::new().with_document("B.md", "[[Apple]]");
        store.fail_writes_to("B.md");
        let doc = store.document("B.md").unwrap();
        let rewriter = LinkRewriter::new(&store, DuplicateAliasPolicy::FirstWins);

        let result = rewriter.rewrite_alias_occurrences(&doc, "Apple", "A").await;

        assert!(matches!(result, Err(StoreError::Rejected { .. })));
        assert_eq!(store.body("B.md").as_deref(), Some("[[Apple]]"));
    }
}

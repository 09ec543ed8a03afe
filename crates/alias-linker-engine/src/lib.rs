pub mod io;
pub mod linking;
pub mod models;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use linking::{
    AliasIndex, AliasLinker, AliasPair, DuplicateAlias, DuplicateAliasPolicy, LinkRewriter, Outcome,
    PassReport,
};
pub use models::{DocumentRef, Frontmatter};
pub use store::{DocumentStore, MemoryStore, StoreError, VaultStore};

//! Alias resolution and bare-link rewriting.
//!
//! [`AliasIndex`] answers which document declares an alias by walking the
//! store. [`LinkRewriter`] turns `[[Alias]]` into `[[Canonical|Alias]]`,
//! either for known alias pairs or by resolving the links found in one
//! document. [`AliasLinker`] wires both to the two host notifications.

pub mod index;
pub mod linker;
pub mod rewrite;
pub mod wikilink;

pub use index::{AliasIndex, AliasPair, DuplicateAlias, DuplicateAliasPolicy};
pub use linker::{AliasLinker, DocumentFailure, PassReport};
pub use rewrite::{LinkRewriter, Outcome, resolve_links, rewrite_alias, rewrite_aliases};
pub use wikilink::{WikiLink, bare_links, qualify_bare_links};

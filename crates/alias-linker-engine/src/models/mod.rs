pub mod document;
pub mod frontmatter;

pub use document::DocumentRef;
pub use frontmatter::Frontmatter;

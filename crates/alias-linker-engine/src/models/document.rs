use relative_path::{RelativePath, RelativePathBuf};
use std::fmt;

/// Identity of a note in the collection: where it lives and the name links use for it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentRef {
    relative_path: RelativePathBuf,
    canonical_name: String,
}

impl DocumentRef {
    /// Create a new DocumentRef from a relative path
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let canonical_name = Self::extract_canonical_name(&relative_path);
        Self {
            relative_path,
            canonical_name,
        }
    }

    /// Create from a relative path string
    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// The base filename without `.md`, used as the target of qualified links
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    fn extract_canonical_name(path: &RelativePath) -> String {
        path.file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string()
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.relative_path.as_str())
    }
}

impl From<RelativePathBuf> for DocumentRef {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for DocumentRef {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Apple.md", "Apple")]
    #[case("fruit/Apple.md", "Apple")]
    #[case("deep/nested/Rome (city).md", "Rome (city)")]
    #[case("notes.txt", "notes.txt")]
    #[case("Archive.2024.md", "Archive.2024")]
    fn test_canonical_name_is_stem(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(DocumentRef::from(path).canonical_name(), expected);
    }

    #[test]
    fn test_display_uses_relative_path() {
        let doc = DocumentRef::from("fruit/Apple.md");
        assert_eq!(doc.to_string(), "fruit/Apple.md");
        assert_eq!(doc.relative_path().as_str(), "fruit/Apple.md");
    }
}

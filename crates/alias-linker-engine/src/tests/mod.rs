use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary notes directory with test files
pub fn create_test_notes_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test markdown file with content, creating parent folders as needed
pub fn create_test_file(notes_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = notes_dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Frontmatter block declaring the given aliases
pub fn aliases_frontmatter(aliases: &[&str]) -> String {
    let mut out = String::from("---\naliases:\n");
    for alias in aliases {
        out.push_str(&format!("  - \"{alias}\"\n"));
    }
    out.push_str("---\n");
    out
}

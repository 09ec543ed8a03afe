use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Read a markdown file and return its content
pub async fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    match tokio::fs::read_to_string(&absolute_path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(IoError::NotFound(absolute_path))
        }
        Err(e) => Err(IoError::Io(e)),
    }
}

/// Overwrite an existing markdown file.
///
/// Unlike a general save this never creates files: a note that vanished
/// between listing and writing is reported rather than resurrected.
pub async fn write_file(
    relative_path: &RelativePath,
    notes_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !tokio::fs::try_exists(&absolute_path).await? {
        return Err(IoError::NotFound(absolute_path));
    }
    tokio::fs::write(&absolute_path, content)
        .await
        .map_err(IoError::Io)
}

/// Scan for markdown files in the notes directory, sorted by relative path
pub fn scan_markdown_files(notes_root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(notes_root, &mut files)?;

    let mut relative: Vec<RelativePathBuf> = files
        .iter()
        .filter_map(|path| path.strip_prefix(notes_root).ok())
        .filter_map(|path| RelativePathBuf::from_path(path).ok())
        .collect();
    relative.sort();
    Ok(relative)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if is_hidden(&path) {
            continue;
        }

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

// Dot-folders hold application state (.obsidian, .git, .trash), never notes.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(format!(
            "notes directory not found: {}",
            path.display()
        )));
    }

    Ok(())
}

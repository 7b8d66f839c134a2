//! Corpus discovery and document reading.

use std::path::{Path, PathBuf};

use tokio::fs;
use walkdir::WalkDir;

use crate::types::RagError;

/// File extensions read as corpus documents; everything else is skipped
/// silently.
const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Raw corpus unit: the full file contents plus a human-readable source
/// label (the file's basename). Documents are immutable once read; only
/// their chunks are persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub text: String,
    pub source: String,
}

/// Walks `root` recursively and reads every allow-listed file.
///
/// Files are decoded best-effort (invalid UTF-8 is replaced, not fatal), and
/// files that are empty after trimming are skipped. Unreadable entries are
/// logged and skipped rather than failing the walk; a missing or empty
/// corpus root simply yields no documents.
pub async fn read_corpus(root: &Path) -> Result<Vec<Document>, RagError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable corpus entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if has_allowed_extension(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = fs::read(&path).await?;
        let text = String::from_utf8_lossy(&bytes);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!(path = %path.display(), "skipping empty document");
            continue;
        }
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(Document {
            text: trimmed.to_string(),
            source,
        });
    }
    Ok(documents)
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| extension.eq_ignore_ascii_case(allowed))
        })
}

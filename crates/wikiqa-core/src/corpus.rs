//! Corpus enumeration and per-file parsing.
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::parser::DocumentParser;
use crate::types::ParsedDocument;

/// All `.txt` files under `root`, recursively, in sorted order.
pub fn list_source_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable corpus entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    txt_files
}

/// Read a file as text, replacing invalid UTF-8 rather than failing.
pub fn read_source(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path).map_err(|source| Error::SourceFileUnreadable {
        path: file_path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Parse one source file, handing each document to `on_document` as soon as
/// it is complete. Returns the number of documents emitted.
///
/// Stops at the first error returned by `on_document`.
pub fn parse_file<F>(file_path: &Path, mut on_document: F) -> Result<usize>
where
    F: FnMut(ParsedDocument) -> Result<()>,
{
    let content = read_source(file_path)?;
    let mut parser = DocumentParser::new();
    let mut emitted = 0usize;
    for line in content.lines() {
        if let Some(document) = parser.feed_line(line) {
            on_document(document)?;
            emitted += 1;
        }
    }
    if let Some(document) = parser.finish() {
        on_document(document)?;
        emitted += 1;
    }
    tracing::debug!(path = %file_path.display(), documents = emitted, "parsed source file");
    Ok(emitted)
}

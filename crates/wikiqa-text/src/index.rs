use std::path::{Path, PathBuf};

use tantivy::{doc, Index, IndexWriter};

use wikiqa_core::corpus::{list_source_files, parse_file};
use wikiqa_core::error::{Error, Result};
use wikiqa_core::indexer::Indexer;
use wikiqa_core::traits::IndexSink;
use wikiqa_core::types::IndexedDocument;

use crate::tantivy_utils::{build_schema, register_tokenizer, WikiFields};

pub const DEFAULT_WRITER_HEAP_BYTES: usize = 50_000_000;

fn open_failure(path: &Path, e: impl std::fmt::Display) -> Error {
	Error::IndexOpenFailure { path: path.to_path_buf(), reason: e.to_string() }
}

/// Write handle on a fresh on-disk index.
///
/// Records are buffered by tantivy and become visible to readers only after
/// [`close`](Self::close).
pub struct TantivyIndexer {
	index_dir: PathBuf,
	writer: IndexWriter,
	fields: WikiFields,
	written: usize,
}

impl TantivyIndexer {
	/// Create an empty index in `index_dir`, replacing whatever was there.
	pub fn create(index_dir: PathBuf, heap_bytes: usize) -> Result<Self> {
		if index_dir.exists() { std::fs::remove_dir_all(&index_dir).map_err(|e| open_failure(&index_dir, e))?; }
		std::fs::create_dir_all(&index_dir).map_err(|e| open_failure(&index_dir, e))?;
		let schema = build_schema();
		let index = Index::create_in_dir(&index_dir, schema.clone()).map_err(|e| open_failure(&index_dir, e))?;
		register_tokenizer(&index);
		let fields = WikiFields::from_schema(&schema).map_err(|e| open_failure(&index_dir, e))?;
		let writer = index.writer(heap_bytes).map_err(|e| open_failure(&index_dir, e))?;
		Ok(Self { index_dir, writer, fields, written: 0 })
	}

	pub fn index_dir(&self) -> &Path {
		&self.index_dir
	}

	/// Parse one source file and write every article in it.
	pub fn index_file(&mut self, path: &Path, indexer: &Indexer) -> Result<usize> {
		parse_file(path, |parsed| indexer.index_document(&parsed, &mut *self))
	}

	/// Commit everything written so far and release the writer.
	pub fn close(mut self) -> Result<usize> {
		self.writer.commit().map_err(|e| open_failure(&self.index_dir, e))?;
		self.writer.wait_merging_threads().map_err(|e| open_failure(&self.index_dir, e))?;
		Ok(self.written)
	}
}

impl IndexSink for TantivyIndexer {
	fn write_record(&mut self, record: IndexedDocument) -> Result<()> {
		let doc = doc!(
			self.fields.title => record.title,
			self.fields.categories => record.categories,
			self.fields.contents => record.contents,
		);
		self.writer.add_document(doc).map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
		self.written += 1;
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
	pub files: usize,
	pub skipped_files: usize,
	pub documents: usize,
}

/// Build a complete index for every `.txt` file under `corpus_dir`.
///
/// Unreadable files are logged and skipped. Failing to create or commit the
/// index is fatal.
pub fn build_index(corpus_dir: &Path, index_dir: PathBuf, indexer: &Indexer, heap_bytes: usize) -> Result<BuildStats> {
	build_index_with_progress(corpus_dir, index_dir, indexer, heap_bytes, |_, _| {})
}

/// [`build_index`], calling `on_file(done, total)` after each source file.
pub fn build_index_with_progress<F>(corpus_dir: &Path, index_dir: PathBuf, indexer: &Indexer, heap_bytes: usize, mut on_file: F) -> Result<BuildStats>
where
	F: FnMut(usize, usize),
{
	let files = list_source_files(corpus_dir);
	if files.is_empty() {
		tracing::warn!(corpus = %corpus_dir.display(), "no .txt files found");
	}
	let mut writer = TantivyIndexer::create(index_dir, heap_bytes)?;
	let mut stats = BuildStats { files: files.len(), ..BuildStats::default() };
	for (file_index, file_path) in files.iter().enumerate() {
		tracing::info!(mode = %indexer.mode(), "indexing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
		match writer.index_file(file_path, indexer) {
			Ok(_) => {}
			Err(e @ Error::SourceFileUnreadable { .. }) => {
				tracing::warn!(error = %e, "skipping source file");
				stats.skipped_files += 1;
			}
			Err(e) => return Err(e),
		}
		on_file(file_index + 1, files.len());
	}
	let index_dir = writer.index_dir().to_path_buf();
	stats.documents = writer.close()?;
	tracing::info!(index = %index_dir.display(), documents = stats.documents, skipped = stats.skipped_files, "index build complete");
	Ok(stats)
}

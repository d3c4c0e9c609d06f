use std::path::PathBuf;

use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Value};
use tantivy::tokenizer::TokenStream;
use tantivy::{DocAddress, Index, ReloadPolicy, Score, Searcher, TantivyDocument, Term};

use wikiqa_core::error::{Error, Result};
use wikiqa_core::normalize::TextNormalizer;
use wikiqa_core::traits::Retriever;
use wikiqa_core::types::{NormalizationMode, RankingFunction, RetrievedRecord, ScoredResult};

use crate::ranking::score_by_postings;
use crate::tantivy_utils::{register_tokenizer, WikiFields};

/// Characters with a meaning in the query grammar.
const QUERY_SYNTAX_CHARS: &[char] = &[
	'+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '\'', '`', '~', '*', '?', ':', '\\', '/', '<', '>', '=',
];

/// Backslash-escape every query syntax character so `text` is read as plain
/// terms.
pub fn escape_query(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		if QUERY_SYNTAX_CHARS.contains(&c) {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped
}

fn query_failure(e: impl std::fmt::Display) -> Error {
	Error::QueryExecutionFailure(e.to_string())
}

/// Read-only handle on one index built with a known normalization mode.
///
/// The ranking function is chosen per query. Each query takes a fresh
/// searcher, so nothing is cached between calls.
pub struct QueryEngine {
	index_dir: PathBuf,
	index: Index,
	fields: WikiFields,
	normalizer: TextNormalizer,
	mode: NormalizationMode,
}

impl QueryEngine {
	/// Open the index in `index_dir`. Fails if the directory does not hold
	/// a readable index with the expected fields.
	pub fn open(index_dir: PathBuf, mode: NormalizationMode, normalizer: TextNormalizer) -> Result<Self> {
		let open_failure = |e: &dyn std::fmt::Display| Error::IndexOpenFailure { path: index_dir.clone(), reason: e.to_string() };
		if !index_dir.is_dir() {
			return Err(open_failure(&"index directory does not exist"));
		}
		let index = Index::open_in_dir(&index_dir).map_err(|e| open_failure(&e))?;
		register_tokenizer(&index);
		let fields = WikiFields::from_schema(&index.schema()).map_err(|e| open_failure(&e))?;
		tracing::debug!(index = %index_dir.display(), %mode, "opened index");
		Ok(Self { index_dir, index, fields, normalizer, mode })
	}

	pub fn mode(&self) -> NormalizationMode {
		self.mode
	}

	pub fn num_docs(&self) -> Result<u64> {
		Ok(self.searcher()?.num_docs())
	}

	fn searcher(&self) -> Result<Searcher> {
		let reader = self.index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into().map_err(query_failure)?;
		Ok(reader.searcher())
	}

	/// Terms of `normalized` as the contents field indexes them, repeats kept.
	fn query_terms(&self, normalized: &str) -> Result<Vec<Term>> {
		let mut analyzer = self.index.tokenizer_for_field(self.fields.contents).map_err(query_failure)?;
		let mut stream = analyzer.token_stream(normalized);
		let mut terms = Vec::new();
		while stream.advance() {
			terms.push(Term::from_field_text(self.fields.contents, &stream.token().text));
		}
		Ok(terms)
	}

	fn retrieve(&self, searcher: &Searcher, score: Score, address: DocAddress) -> Result<ScoredResult> {
		let doc: TantivyDocument = searcher.doc(address).map_err(query_failure)?;
		let text = |field: Field| doc.get_first(field).and_then(|v| v.as_str()).unwrap_or("").to_string();
		let document = RetrievedRecord { title: text(self.fields.title), categories: text(self.fields.categories), contents: text(self.fields.contents) };
		Ok(ScoredResult { document, score })
	}

	/// Normalize `text` with this index's mode and return up to `top_k` hits
	/// ranked by `ranking`, best first.
	pub fn try_query(&self, text: &str, top_k: usize, ranking: RankingFunction) -> Result<Vec<ScoredResult>> {
		if top_k == 0 {
			return Ok(Vec::new());
		}
		let normalized = self.normalizer.normalize_joined(text, self.mode);
		if normalized.trim().is_empty() {
			tracing::debug!(query = text, "query has no searchable terms");
			return Ok(Vec::new());
		}
		let searcher = self.searcher()?;
		let hits = match ranking {
			RankingFunction::Bm25 => {
				let query_parser = QueryParser::for_index(&self.index, vec![self.fields.contents]);
				let query = query_parser.parse_query(&escape_query(&normalized)).map_err(query_failure)?;
				searcher.search(&query, &TopDocs::with_limit(top_k)).map_err(query_failure)?
			}
			other => {
				let terms = self.query_terms(&normalized)?;
				score_by_postings(&searcher, self.fields.contents, &terms, other, top_k).map_err(query_failure)?
			}
		};
		hits.into_iter().map(|(score, address)| self.retrieve(&searcher, score, address)).collect()
	}
}

impl Retriever for QueryEngine {
	fn query(&self, text: &str, top_k: usize, ranking: RankingFunction) -> Vec<ScoredResult> {
		match self.try_query(text, top_k, ranking) {
			Ok(results) => results,
			Err(e) => {
				tracing::error!(index = %self.index_dir.display(), %ranking, error = %e, "query failed: {}", text);
				Vec::new()
			}
		}
	}
}

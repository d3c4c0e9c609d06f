use crate::error::Result;
use crate::types::{IndexedDocument, RankingFunction, ScoredResult};

/// Word segmentation and lemmatization, the only language-aware pieces of
/// the pipeline.
///
/// `lemmas(text)` must return exactly one entry per entry of
/// `word_tokens(text)`, in the same order.
pub trait TextAnalyzer: Send + Sync {
    fn word_tokens(&self, text: &str) -> Vec<String>;
    fn lemmas(&self, text: &str) -> Vec<String>;
}

/// Write side of an index engine. Append-only.
pub trait IndexSink {
    fn write_record(&mut self, record: IndexedDocument) -> Result<()>;
}

impl IndexSink for Vec<IndexedDocument> {
    fn write_record(&mut self, record: IndexedDocument) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

/// Read side of an index engine as seen by the evaluator.
///
/// Failures are absorbed: an implementation returns an empty list for a
/// query it could not run.
pub trait Retriever {
    fn query(&self, text: &str, top_k: usize, ranking: RankingFunction) -> Vec<ScoredResult>;
}

//! Turns parsed articles into index records.

use crate::error::Result;
use crate::normalize::TextNormalizer;
use crate::traits::IndexSink;
use crate::types::{IndexedDocument, NormalizationMode, ParsedDocument, EMPTY_FIELD_PLACEHOLDER};

#[derive(Debug, Clone)]
pub struct Indexer {
    normalizer: TextNormalizer,
    mode: NormalizationMode,
}

impl Indexer {
    pub fn new(normalizer: TextNormalizer, mode: NormalizationMode) -> Self {
        Self { normalizer, mode }
    }

    pub fn mode(&self) -> NormalizationMode {
        self.mode
    }

    /// Build the record for `doc` without writing it anywhere.
    pub fn build_record(&self, doc: &ParsedDocument) -> IndexedDocument {
        let categories = non_empty_or_placeholder(&doc.categories);
        let body = non_empty_or_placeholder(&doc.body);
        // punctuation-only text normalizes to nothing; keep the placeholder
        let categories = self.normalizer.normalize_joined(categories, self.mode);
        let categories = non_empty_or_placeholder(&categories).to_string();
        let body = self.normalizer.normalize_joined(body, self.mode);
        let body = non_empty_or_placeholder(&body).to_string();
        let contents = format!("{} {} {}", doc.title, categories, body).trim().to_string();
        IndexedDocument { title: doc.title.clone(), categories, contents }
    }

    pub fn index_document<S>(&self, doc: &ParsedDocument, sink: &mut S) -> Result<()>
    where
        S: IndexSink + ?Sized,
    {
        sink.write_record(self.build_record(doc))
    }
}

fn non_empty_or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_FIELD_PLACEHOLDER
    } else {
        value
    }
}

use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer};
use tantivy::Index;

pub const TITLE_FIELD: &str = "title";
pub const CATEGORIES_FIELD: &str = "categories";
pub const CONTENTS_FIELD: &str = "contents";

/// Tokenizer for the searchable text fields. Terms arrive already
/// normalized, so it only splits, lower-cases and drops pathological tokens.
pub const WIKI_TOKENIZER: &str = "wiki_text";

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field(TITLE_FIELD, STRING | STORED);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(WIKI_TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing).set_stored();
	schema_builder.add_text_field(CATEGORIES_FIELD, text_options.clone());
	schema_builder.add_text_field(CONTENTS_FIELD, text_options);
	schema_builder.build()
}

pub fn register_tokenizer(index: &Index) {
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(64))
		.filter(LowerCaser)
		.build();
	index.tokenizers().register(WIKI_TOKENIZER, tokenizer);
}

#[derive(Debug, Clone, Copy)]
pub struct WikiFields {
	pub title: Field,
	pub categories: Field,
	pub contents: Field,
}

impl WikiFields {
	pub fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
		Ok(Self {
			title: schema.get_field(TITLE_FIELD)?,
			categories: schema.get_field(CATEGORIES_FIELD)?,
			contents: schema.get_field(CONTENTS_FIELD)?,
		})
	}
}

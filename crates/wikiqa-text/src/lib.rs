//! wikiqa-text
//!
//! Tantivy-backed index engine: schema and tokenizer setup, index build from
//! a wiki dump directory, and querying with a selectable ranking function.
pub mod tantivy_utils;
pub mod index;
pub mod ranking;
pub mod search;

pub use index::{build_index, build_index_with_progress, BuildStats, TantivyIndexer, DEFAULT_WRITER_HEAP_BYTES};
pub use search::{escape_query, QueryEngine};

//! wikiqa-core
//!
//! Shared building blocks for the wiki quiz retrieval harness: the
//! normalization contract (analyzer, Porter stemmer, normalizer), the wiki
//! dump parser, the engine-agnostic indexer and the configuration loader.

pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod indexer;
pub mod normalize;
pub mod parser;
pub mod stemmer;
pub mod traits;
pub mod types;

pub use error::{Error, Result};

//! wikiqa-eval
//!
//! Replays quiz questions against an index and reports precision-at-1 and
//! mean reciprocal rank, for one ranking function or a whole sweep.
pub mod quiz;
pub mod report;
pub mod runner;
pub mod sweep;

pub use quiz::{parse_quiz, read_quiz_file};
pub use report::{EvaluationReport, SweepRow};
pub use runner::{rank_of, EvaluationRunner, DEFAULT_TOP_K};
pub use sweep::sweep;

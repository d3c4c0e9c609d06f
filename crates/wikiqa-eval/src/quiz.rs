//! Quiz file reader.
//!
//! A quiz file is a sequence of 4-line records: category, clue, expected
//! answer title, and a separator line whose content is ignored. A record is
//! only complete once its separator line has been read.

use std::path::Path;

use wikiqa_core::corpus::read_source;
use wikiqa_core::error::{Error, Result};
use wikiqa_core::types::QuizItem;

const LINES_PER_RECORD: usize = 4;

/// Parse quiz records from `text`. A trailing partial record is dropped and
/// logged at debug level.
pub fn parse_quiz(text: &str) -> Vec<QuizItem> {
	let lines: Vec<&str> = text.lines().collect();
	let mut chunks = lines.chunks_exact(LINES_PER_RECORD);
	let items: Vec<QuizItem> = chunks
		.by_ref()
		.map(|record| QuizItem { category: record[0].to_string(), clue: record[1].to_string(), expected_answer_title: record[2].to_string() })
		.collect();
	let remainder = chunks.remainder();
	if !remainder.is_empty() {
		let e = Error::MalformedQuizRecord { line: items.len() * LINES_PER_RECORD + 1, found: remainder.len() };
		tracing::debug!(error = %e, "ignoring trailing quiz lines");
	}
	items
}

pub fn read_quiz_file(path: &Path) -> Result<Vec<QuizItem>> {
	let items = parse_quiz(&read_source(path)?);
	tracing::info!(quiz = %path.display(), questions = items.len(), "loaded quiz");
	Ok(items)
}

use wikiqa_core::traits::Retriever;
use wikiqa_core::types::{QuizItem, RankingFunction, ScoredResult};

use crate::report::EvaluationReport;

pub const DEFAULT_TOP_K: usize = 10;

/// 1-based rank of the first result titled `expected`.
pub fn rank_of(results: &[ScoredResult], expected: &str) -> Option<usize> {
	results.iter().position(|r| r.document.title == expected).map(|i| i + 1)
}

/// Replays quiz questions against a retriever and scores the answers.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationRunner {
	top_k: usize,
}

impl Default for EvaluationRunner {
	fn default() -> Self {
		Self { top_k: DEFAULT_TOP_K }
	}
}

impl EvaluationRunner {
	pub fn new(top_k: usize) -> Self {
		Self { top_k }
	}

	pub fn top_k(&self) -> usize {
		self.top_k
	}

	/// Ask every question with `ranking`. A question whose query fails counts
	/// as unanswered.
	pub fn run<R: Retriever + ?Sized>(&self, retriever: &R, ranking: RankingFunction, items: &[QuizItem]) -> EvaluationReport {
		let mut report = EvaluationReport::default();
		for item in items {
			let results = retriever.query(&item.query_text(), self.top_k, ranking);
			let rank = rank_of(&results, &item.expected_answer_title);
			tracing::debug!(%ranking, expected = %item.expected_answer_title, ?rank, hits = results.len(), "question answered");
			report.record(rank);
		}
		report
	}
}

use std::fmt;

use serde::{Deserialize, Serialize};

use wikiqa_core::types::{NormalizationMode, RankingFunction};

/// Retrieval quality over one quiz run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
	pub total_questions: usize,
	pub correct_at_one: usize,
	pub reciprocal_rank_sum: f64,
}

impl EvaluationReport {
	/// Record one answered question. `rank` is the 1-based position of the
	/// expected title in the results, if it was found.
	pub fn record(&mut self, rank: Option<usize>) {
		self.total_questions += 1;
		match rank {
			Some(1) => {
				self.correct_at_one += 1;
				self.reciprocal_rank_sum += 1.0;
			}
			Some(r) if r > 1 => self.reciprocal_rank_sum += 1.0 / r as f64,
			_ => {}
		}
	}

	/// `None` when no question was asked.
	pub fn precision_at_one(&self) -> Option<f64> {
		(self.total_questions > 0).then(|| self.correct_at_one as f64 / self.total_questions as f64)
	}

	pub fn mean_reciprocal_rank(&self) -> Option<f64> {
		(self.total_questions > 0).then(|| self.reciprocal_rank_sum / self.total_questions as f64)
	}

	pub fn to_json(&self) -> serde_json::Value {
		serde_json::json!({
			"total_questions": self.total_questions,
			"correct_at_one": self.correct_at_one,
			"reciprocal_rank_sum": self.reciprocal_rank_sum,
			"precision_at_one": self.precision_at_one(),
			"mean_reciprocal_rank": self.mean_reciprocal_rank(),
		})
	}
}

fn metric(value: Option<f64>) -> String {
	match value {
		Some(v) => format!("{:.4}", v),
		None => "n/a".to_string(),
	}
}

impl fmt::Display for EvaluationReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "P@1: {}/{} = {}", self.correct_at_one, self.total_questions, metric(self.precision_at_one()))?;
		write!(f, "MRR: {}", metric(self.mean_reciprocal_rank()))
	}
}

/// One cell of a sweep: an index, a ranking function and how it scored.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
	pub index: String,
	pub mode: NormalizationMode,
	pub ranking: RankingFunction,
	pub report: EvaluationReport,
}

impl SweepRow {
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::json!({
			"index": self.index,
			"mode": self.mode,
			"ranking": self.ranking,
			"report": self.report.to_json(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_metrics() {
		let mut report = EvaluationReport::default();
		report.record(Some(1));
		report.record(Some(4));
		report.record(None);
		report.record(Some(2));
		assert_eq!(report.to_string(), "P@1: 1/4 = 0.2500\nMRR: 0.4375");
	}

	#[test]
	fn empty_run_renders_not_available() {
		assert_eq!(EvaluationReport::default().to_string(), "P@1: 0/0 = n/a\nMRR: n/a");
		assert_eq!(EvaluationReport::default().to_json()["precision_at_one"], serde_json::Value::Null);
	}
}

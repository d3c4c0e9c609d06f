use wikiqa_core::config::IndexSpec;
use wikiqa_core::error::Result;
use wikiqa_core::traits::Retriever;
use wikiqa_core::types::{QuizItem, RankingFunction};

use crate::report::SweepRow;
use crate::runner::EvaluationRunner;

/// Evaluate every index in `indices` under every ranking function.
///
/// `open` turns a configured index into a retriever. An index that fails to
/// open is logged and skipped; the remaining indices are still evaluated.
/// Rows come out index-major, in configuration order.
pub fn sweep<R, F>(indices: &[IndexSpec], rankings: &[RankingFunction], runner: &EvaluationRunner, items: &[QuizItem], mut open: F) -> Vec<SweepRow>
where
	R: Retriever,
	F: FnMut(&IndexSpec) -> Result<R>,
{
	let mut rows = Vec::with_capacity(indices.len() * rankings.len());
	for spec in indices {
		let retriever = match open(spec) {
			Ok(retriever) => retriever,
			Err(e) => {
				tracing::error!(index = %spec.name, error = %e, "skipping index");
				continue;
			}
		};
		for &ranking in rankings {
			let report = runner.run(&retriever, ranking, items);
			tracing::info!(index = %spec.name, %ranking, p_at_1 = ?report.precision_at_one(), mrr = ?report.mean_reciprocal_rank(), "evaluated");
			rows.push(SweepRow { index: spec.name.clone(), mode: spec.mode(), ranking, report });
		}
	}
	rows
}

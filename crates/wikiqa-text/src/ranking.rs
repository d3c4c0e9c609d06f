//! Ranking functions other than the engine's native BM25.
//!
//! These read postings and field norms straight from the segments, collect
//! collection statistics, and score every document that contains at least
//! one query term, using the textbook formulation of each model.

use std::collections::HashMap;

use tantivy::postings::Postings;
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::{DocAddress, DocId, DocSet, Score, Searcher, Term, TERMINATED};

use wikiqa_core::types::RankingFunction;

const BM25_K1: f32 = 1.2;
const BM25_B: f32 = 0.75;

#[derive(Debug, Clone, Copy, Default)]
struct TermStats {
	doc_freq: u64,
	total_term_freq: u64,
	/// How many times the term occurs in the query.
	query_weight: f32,
}

#[derive(Debug, Clone, Copy)]
struct CollectionStats {
	num_docs: u64,
	total_tokens: u64,
}

impl CollectionStats {
	fn average_length(&self) -> f32 {
		if self.num_docs == 0 { 1.0 } else { self.total_tokens as f32 / self.num_docs as f32 }
	}

	/// Smoothed probability of the term in the whole collection.
	fn term_probability(&self, term: &TermStats) -> f32 {
		(term.total_term_freq as f32 + 1.0) / (self.total_tokens as f32 + 1.0)
	}
}

/// Contribution of one query term to one document's score.
fn term_score(ranking: RankingFunction, tf: f32, doc_len: f32, term: &TermStats, collection: &CollectionStats) -> f32 {
	let n = collection.num_docs as f32;
	let df = term.doc_freq as f32;
	match ranking {
		RankingFunction::Bm25 => {
			let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
			let norm = BM25_K1 * (1.0 - BM25_B + BM25_B * doc_len / collection.average_length());
			idf * (tf * (BM25_K1 + 1.0)) / (tf + norm)
		}
		RankingFunction::Classic => {
			let idf = 1.0 + ((n + 1.0) / (df + 1.0)).ln();
			tf.sqrt() * idf * idf / doc_len.sqrt()
		}
		RankingFunction::Boolean => 1.0,
		RankingFunction::Dfi => {
			let expected = (term.total_term_freq as f32 + 1.0) * doc_len / (collection.total_tokens as f32 + 1.0);
			if tf <= expected {
				0.0
			} else {
				let measure = (tf - expected) * (tf - expected) / expected;
				(measure + 1.0).log2()
			}
		}
		RankingFunction::Dfr => {
			let tfn = tf * collection.average_length() / doc_len;
			let f = term.total_term_freq as f32 + 1.0;
			let lambda = f / (n + f);
			let information = (1.0 + lambda).log2() + tfn * ((1.0 + lambda) / lambda).log2();
			let after_effect = (f + 1.0) / ((df + 1.0) * (tfn + 1.0));
			information * after_effect
		}
		RankingFunction::LmDirichlet { mu } => {
			let p = collection.term_probability(term);
			let score = (1.0 + tf / (mu * p)).ln() + (mu / (doc_len + mu)).ln();
			score.max(0.0)
		}
		RankingFunction::LmJelinekMercer { lambda } => {
			let p = collection.term_probability(term);
			(1.0 + ((1.0 - lambda) * tf / doc_len) / (lambda * p)).ln()
		}
	}
}

/// Collapse repeated query terms into one entry with a weight.
fn weigh_terms(terms: &[Term]) -> Vec<(Term, f32)> {
	let mut weighted: Vec<(Term, f32)> = Vec::new();
	for term in terms {
		match weighted.iter_mut().find(|(t, _)| t == term) {
			Some((_, weight)) => *weight += 1.0,
			None => weighted.push((term.clone(), 1.0)),
		}
	}
	weighted
}

/// Score all documents matching any of `terms` in `field` and return the
/// best `top_k`, highest score first. Equal scores keep index order.
pub fn score_by_postings(searcher: &Searcher, field: Field, terms: &[Term], ranking: RankingFunction, top_k: usize) -> tantivy::Result<Vec<(Score, DocAddress)>> {
	let weighted = weigh_terms(terms);
	if weighted.is_empty() || top_k == 0 {
		return Ok(Vec::new());
	}

	let mut term_stats: Vec<TermStats> = weighted.iter().map(|(_, w)| TermStats { query_weight: *w, ..TermStats::default() }).collect();
	let mut total_tokens = 0u64;
	// [segment][term] -> (doc, term frequency)
	let mut segment_postings: Vec<Vec<Vec<(DocId, u32)>>> = Vec::with_capacity(searcher.segment_readers().len());
	for segment_reader in searcher.segment_readers() {
		let inverted_index = segment_reader.inverted_index(field)?;
		total_tokens += inverted_index.total_num_tokens();
		let mut per_term = Vec::with_capacity(weighted.len());
		for ((term, _), stats) in weighted.iter().zip(term_stats.iter_mut()) {
			let mut entries = Vec::new();
			if let Some(mut postings) = inverted_index.read_postings(term, IndexRecordOption::WithFreqs)? {
				let mut doc = postings.doc();
				while doc != TERMINATED {
					let tf = postings.term_freq();
					entries.push((doc, tf));
					stats.total_term_freq += u64::from(tf);
					doc = postings.advance();
				}
			}
			stats.doc_freq += entries.len() as u64;
			per_term.push(entries);
		}
		segment_postings.push(per_term);
	}
	let collection = CollectionStats { num_docs: searcher.num_docs(), total_tokens };

	let mut scores: HashMap<(u32, DocId), f32> = HashMap::new();
	for (segment_ord, (segment_reader, per_term)) in searcher.segment_readers().iter().zip(segment_postings.iter()).enumerate() {
		let fieldnorms = segment_reader.get_fieldnorms_reader(field)?;
		for (entries, stats) in per_term.iter().zip(term_stats.iter()) {
			for &(doc, tf) in entries {
				let doc_len = (fieldnorms.fieldnorm(doc) as f32).max(1.0);
				let contribution = term_score(ranking, tf as f32, doc_len, stats, &collection) * stats.query_weight;
				*scores.entry((segment_ord as u32, doc)).or_insert(0.0) += contribution;
			}
		}
	}

	let mut ranked: Vec<((u32, DocId), f32)> = scores.into_iter().collect();
	ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
	ranked.truncate(top_k);
	Ok(ranked.into_iter().map(|((segment_ord, doc), score)| (score, DocAddress::new(segment_ord, doc))).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stats(doc_freq: u64, total_term_freq: u64) -> TermStats {
		TermStats { doc_freq, total_term_freq, query_weight: 1.0 }
	}

	const COLLECTION: CollectionStats = CollectionStats { num_docs: 100, total_tokens: 10_000 };

	#[test]
	fn rarer_terms_score_higher() {
		for ranking in [RankingFunction::Bm25, RankingFunction::Classic] {
			let rare = term_score(ranking, 1.0, 100.0, &stats(2, 2), &COLLECTION);
			let common = term_score(ranking, 1.0, 100.0, &stats(80, 200), &COLLECTION);
			assert!(rare > common, "{} should favour rare terms", ranking);
		}
	}

	#[test]
	fn boolean_ignores_frequencies() {
		let once = term_score(RankingFunction::Boolean, 1.0, 10.0, &stats(1, 1), &COLLECTION);
		let often = term_score(RankingFunction::Boolean, 9.0, 500.0, &stats(90, 900), &COLLECTION);
		assert_eq!(once, often);
	}

	#[test]
	fn dfi_is_zero_at_or_below_expectation() {
		// expected = (ttf + 1) * dl / (T + 1) = 10001 * 100 / 10001 = 100
		let term = stats(100, 10_000);
		assert_eq!(term_score(RankingFunction::Dfi, 50.0, 100.0, &term, &COLLECTION), 0.0);
		assert!(term_score(RankingFunction::Dfi, 150.0, 100.0, &term, &COLLECTION) > 0.0);
	}

	#[test]
	fn dfr_rewards_frequency_and_rarity() {
		let rare = stats(2, 3);
		let once = term_score(RankingFunction::Dfr, 1.0, 100.0, &rare, &COLLECTION);
		let thrice = term_score(RankingFunction::Dfr, 3.0, 100.0, &rare, &COLLECTION);
		assert!(once > 0.0);
		assert!(thrice > once);
		let common = term_score(RankingFunction::Dfr, 1.0, 100.0, &stats(90, 100), &COLLECTION);
		assert!(once > common);
		// longer documents dilute the same count
		assert!(term_score(RankingFunction::Dfr, 1.0, 400.0, &rare, &COLLECTION) < once);
	}

	#[test]
	fn language_models_never_go_negative() {
		let term = stats(99, 5_000);
		for ranking in [RankingFunction::LmDirichlet { mu: 2000.0 }, RankingFunction::LmJelinekMercer { lambda: 0.7 }] {
			let score = term_score(ranking, 1.0, 1_000.0, &term, &COLLECTION);
			assert!(score >= 0.0, "{} produced {}", ranking, score);
		}
	}

	#[test]
	fn repeated_query_terms_are_weighted() {
		let field = tantivy::schema::Field::from_field_id(0);
		let cat = Term::from_field_text(field, "cat");
		let dog = Term::from_field_text(field, "dog");
		let weighted = weigh_terms(&[cat.clone(), dog.clone(), cat.clone()]);
		assert_eq!(weighted, vec![(cat, 2.0), (dog, 1.0)]);
	}
}

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use wikiqa_core::config::IndexSpec;
use wikiqa_core::error::Error;
use wikiqa_core::traits::Retriever;
use wikiqa_core::types::{NormalizationMode, QuizItem, RankingFunction, RetrievedRecord, ScoredResult};
use wikiqa_eval::{parse_quiz, read_quiz_file, sweep, EvaluationRunner};

/// Answers every query with a fixed list of titles and remembers what it was asked.
struct FakeRetriever {
    answers: HashMap<String, Vec<&'static str>>,
    calls: RefCell<Vec<(String, usize, RankingFunction)>>,
}

impl FakeRetriever {
    fn new(answers: &[(&str, Vec<&'static str>)]) -> Self {
        Self { answers: answers.iter().map(|(q, titles)| (q.to_string(), titles.clone())).collect(), calls: RefCell::new(Vec::new()) }
    }
}

impl Retriever for FakeRetriever {
    fn query(&self, text: &str, top_k: usize, ranking: RankingFunction) -> Vec<ScoredResult> {
        self.calls.borrow_mut().push((text.to_string(), top_k, ranking));
        let titles = self.answers.get(text).cloned().unwrap_or_default();
        titles
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(i, title)| ScoredResult { document: RetrievedRecord { title: title.to_string(), ..RetrievedRecord::default() }, score: 10.0 - i as f32 })
            .collect()
    }
}

fn item(category: &str, clue: &str, answer: &str) -> QuizItem {
    QuizItem { category: category.to_string(), clue: clue.to_string(), expected_answer_title: answer.to_string() }
}

#[test]
fn answer_at_rank_two_adds_half() {
    let retriever = FakeRetriever::new(&[("PETS meows", vec!["Dogs", "Cats", "Birds"])]);
    let report = EvaluationRunner::default().run(&retriever, RankingFunction::Bm25, &[item("PETS", "meows", "Cats")]);
    assert_eq!(report.total_questions, 1);
    assert_eq!(report.correct_at_one, 0);
    assert_eq!(report.reciprocal_rank_sum, 0.5);
    assert_eq!(report.precision_at_one(), Some(0.0));
    assert_eq!(report.mean_reciprocal_rank(), Some(0.5));
}

#[test]
fn absent_answer_adds_nothing_but_counts() {
    let retriever = FakeRetriever::new(&[("PETS meows", vec!["Dogs", "Birds"])]);
    let report = EvaluationRunner::default().run(&retriever, RankingFunction::Classic, &[item("PETS", "meows", "Cats"), item("PETS", "barks", "Dogs")]);
    assert_eq!(report.total_questions, 2);
    assert_eq!(report.reciprocal_rank_sum, 0.0);
    assert_eq!(report.mean_reciprocal_rank(), Some(0.0));
}

#[test]
fn top_hit_counts_for_both_metrics() {
    let retriever = FakeRetriever::new(&[("PETS meows", vec!["Cats", "Cats"]), ("PETS barks", vec!["Birds", "Cats", "Wolves", "Dogs"])]);
    let report = EvaluationRunner::default().run(&retriever, RankingFunction::Boolean, &[item("PETS", "meows", "Cats"), item("PETS", "barks", "Dogs")]);
    assert_eq!(report.correct_at_one, 1);
    assert_eq!(report.reciprocal_rank_sum, 1.25);
    assert_eq!(report.to_string(), "P@1: 1/2 = 0.5000\nMRR: 0.6250");
}

#[test]
fn zero_questions_has_no_metrics() {
    let retriever = FakeRetriever::new(&[]);
    let report = EvaluationRunner::default().run(&retriever, RankingFunction::Bm25, &[]);
    assert_eq!(report.total_questions, 0);
    assert_eq!(report.precision_at_one(), None);
    assert_eq!(report.mean_reciprocal_rank(), None);
}

#[test]
fn runner_passes_query_text_top_k_and_ranking() {
    let retriever = FakeRetriever::new(&[]);
    let ranking = RankingFunction::LmDirichlet { mu: 1500.0 };
    EvaluationRunner::new(3).run(&retriever, ranking, &[item("OPERA", "Wrote Aida", "Giuseppe Verdi")]);
    assert_eq!(retriever.calls.borrow().as_slice(), &[("OPERA Wrote Aida".to_string(), 3, ranking)]);
}

#[test]
fn partial_quiz_cycle_is_ignored() {
    let items = parse_quiz("PETS\nmeows\nCats\n\nPETS\nbarks\nDogs");
    assert_eq!(items, vec![item("PETS", "meows", "Cats")]);
}

#[test]
fn quiz_file_round_trip_and_missing_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("questions.txt");
    std::fs::write(&path, "PETS\nmeows\nCats\n\nPETS\nbarks\nDogs\n\n").unwrap();
    assert_eq!(read_quiz_file(&path).expect("read").len(), 2);

    let missing = tmp.path().join("missing.txt");
    assert!(matches!(read_quiz_file(&missing), Err(Error::SourceFileUnreadable { .. })));
}

#[test]
fn sweep_skips_indices_that_fail_to_open() {
    let indices = vec![
        IndexSpec::for_mode(NormalizationMode::None, "idx"),
        IndexSpec::for_mode(NormalizationMode::Stem, "idx"),
        IndexSpec::for_mode(NormalizationMode::Lemmatize, "idx"),
    ];
    let rankings = [RankingFunction::Bm25, RankingFunction::Dfi];
    let items = [item("PETS", "meows", "Cats")];

    let rows = sweep(&indices, &rankings, &EvaluationRunner::default(), &items, |spec| {
        if spec.name == "stem" {
            return Err(Error::IndexOpenFailure { path: PathBuf::from(&spec.path), reason: "missing".to_string() });
        }
        Ok(FakeRetriever::new(&[("PETS meows", vec!["Cats"])]))
    });

    let cells: Vec<_> = rows.iter().map(|r| (r.index.as_str(), r.mode, r.ranking)).collect();
    assert_eq!(
        cells,
        vec![
            ("none", NormalizationMode::None, RankingFunction::Bm25),
            ("none", NormalizationMode::None, RankingFunction::Dfi),
            ("lemma", NormalizationMode::Lemmatize, RankingFunction::Bm25),
            ("lemma", NormalizationMode::Lemmatize, RankingFunction::Dfi),
        ]
    );
    assert!(rows.iter().all(|r| r.report.precision_at_one() == Some(1.0)));
    assert_eq!(rows[0].to_json()["ranking"], "bm25");
}

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use wikiqa_core::error::Error;
use wikiqa_core::indexer::Indexer;
use wikiqa_core::normalize::TextNormalizer;
use wikiqa_core::traits::Retriever;
use wikiqa_core::types::{NormalizationMode, RankingFunction};
use wikiqa_text::{build_index, QueryEngine, DEFAULT_WRITER_HEAP_BYTES};

const MODES: [NormalizationMode; 3] = [NormalizationMode::None, NormalizationMode::Stem, NormalizationMode::Lemmatize];
const TITLES: [&str; 4] = ["Aardvark", "Zeppelin", "Mount Vesuvius", "Saxophone"];

fn write_corpus(dir: &Path) {
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(
        dir.join("animals.txt"),
        "[[Aardvark]]\n\
         CATEGORIES: Mammals of Africa\n\
         The aardvark is a nocturnal burrowing mammal. Aardvarks eat ants and termites.\n\
         ==References==\n\
         Smith 2001.\n\
         [[Zeppelin]]\n\
         CATEGORIES: Airships\n\
         A zeppelin is a rigid airship. Zeppelins were flown over the ocean.\n",
    )
    .unwrap();
    fs::write(
        dir.join("nested/misc.txt"),
        "[[Mount Vesuvius]]\n\
         CATEGORIES: Volcanoes of Italy\n\
         Mount Vesuvius is a volcano near Naples. Vesuvius erupted in 79 AD.\n\
         [[Saxophone]]\n\
         CATEGORIES: Woodwind instruments\n\
         The saxophone is a woodwind instrument made of brass.\n",
    )
    .unwrap();
    fs::write(dir.join("README.md"), "[[Not indexed]]\n").unwrap();
}

fn build_all(tmp: &TempDir) -> Vec<QueryEngine> {
    let corpus = tmp.path().join("corpus");
    write_corpus(&corpus);
    let normalizer = TextNormalizer::default();
    MODES
        .iter()
        .map(|&mode| {
            let index_dir = tmp.path().join("index").join(mode.name());
            let stats = build_index(&corpus, index_dir.clone(), &Indexer::new(normalizer.clone(), mode), DEFAULT_WRITER_HEAP_BYTES).expect("build");
            assert_eq!(stats.files, 2);
            assert_eq!(stats.skipped_files, 0);
            assert_eq!(stats.documents, 4);
            QueryEngine::open(index_dir, mode, normalizer.clone()).expect("open")
        })
        .collect()
}

#[test]
fn titles_rank_first_for_every_mode_and_ranking() {
    let tmp = TempDir::new().unwrap();
    for engine in build_all(&tmp) {
        assert_eq!(engine.num_docs().expect("count"), 4);
        // one engine, every ranking function, no reopen in between
        for ranking in RankingFunction::ALL {
            for title in TITLES {
                let results = engine.query(title, 10, ranking);
                assert!(!results.is_empty(), "{} / {}: no hits for '{}'", engine.mode(), ranking, title);
                assert_eq!(results[0].document.title, title, "{} / {}", engine.mode(), ranking);
                assert!(results.windows(2).all(|w| w[0].score >= w[1].score), "{} / {}: scores not descending", engine.mode(), ranking);
            }
        }
    }
}

#[test]
fn stored_fields_come_back_normalized() {
    let tmp = TempDir::new().unwrap();
    let engines = build_all(&tmp);

    let raw = engines[0].query("Saxophone", 1, RankingFunction::Bm25);
    assert_eq!(raw[0].document.categories, "woodwind instruments");
    assert_eq!(raw[0].document.contents, "Saxophone woodwind instruments the saxophone is a woodwind instrument made of brass");

    let stemmed = engines[1].query("Saxophone", 1, RankingFunction::Bm25);
    assert_eq!(stemmed[0].document.categories, "woodwind instrument");

    // the ignored header line is gone but the text under it stays
    let aardvark = engines[0].query("Aardvark", 1, RankingFunction::Bm25);
    assert!(aardvark[0].document.contents.ends_with("termites smith 2001"));
    assert!(!aardvark[0].document.contents.contains("references"));
}

#[test]
fn query_honours_top_k() {
    let tmp = TempDir::new().unwrap();
    let engines = build_all(&tmp);
    for ranking in RankingFunction::ALL {
        assert!(engines[0].query("the", 0, ranking).is_empty());
        assert!(engines[0].query("is a", 2, ranking).len() <= 2);
    }
}

#[test]
fn punctuation_and_empty_queries_do_not_fail() {
    let tmp = TempDir::new().unwrap();
    let engines = build_all(&tmp);
    let results = engines[0].query("Zeppelin?! (airship) +rigid -[ocean]", 5, RankingFunction::Bm25);
    assert_eq!(results[0].document.title, "Zeppelin");
    assert!(engines[0].try_query("?!... ---", 5, RankingFunction::Bm25).expect("empty query").is_empty());
    assert!(engines[0].query("nothing matches xylophone", 5, RankingFunction::Classic).is_empty());
}

#[test]
fn opening_a_missing_index_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("no-such-index");
    let err = QueryEngine::open(missing.clone(), NormalizationMode::None, TextNormalizer::default()).err().expect("open must fail");
    assert!(matches!(err, Error::IndexOpenFailure { ref path, .. } if path == &missing));

    fs::create_dir_all(&missing).unwrap();
    assert!(QueryEngine::open(missing, NormalizationMode::None, TextNormalizer::default()).is_err());
}

#[test]
fn rebuilding_replaces_the_previous_index() {
    let tmp = TempDir::new().unwrap();
    let corpus = tmp.path().join("corpus");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("one.txt"), "[[Only]]\nsingle article\n").unwrap();
    let index_dir = tmp.path().join("index");
    let indexer = Indexer::new(TextNormalizer::default(), NormalizationMode::None);

    build_index(&corpus, index_dir.clone(), &indexer, DEFAULT_WRITER_HEAP_BYTES).expect("first build");
    let stats = build_index(&corpus, index_dir.clone(), &indexer, DEFAULT_WRITER_HEAP_BYTES).expect("second build");
    assert_eq!(stats.documents, 1);
    let engine = QueryEngine::open(index_dir, NormalizationMode::None, TextNormalizer::default()).expect("open");
    assert_eq!(engine.num_docs().expect("count"), 1);
}

fn build_single(tmp: &TempDir, text: &str) -> QueryEngine {
    let corpus = tmp.path().join("corpus");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("wiki.txt"), text).unwrap();
    let index_dir = tmp.path().join("index");
    let indexer = Indexer::new(TextNormalizer::default(), NormalizationMode::None);
    build_index(&corpus, index_dir.clone(), &indexer, DEFAULT_WRITER_HEAP_BYTES).expect("build");
    QueryEngine::open(index_dir, NormalizationMode::None, TextNormalizer::default()).expect("open")
}

#[test]
fn query_syntax_characters_are_matched_as_text() {
    let tmp = TempDir::new().unwrap();
    let engine = build_single(
        &tmp,
        "[[Flann O'Brien]]\n\
         CATEGORIES: Irish novelists\n\
         An Irish novelist who once wrote about title:zeppelin in a column.\n\
         [[Zeppelin]]\n\
         CATEGORIES: Airships\n\
         A rigid airship.\n",
    );
    for ranking in [RankingFunction::Bm25, RankingFunction::Classic, RankingFunction::Dfr] {
        for query in ["title:zeppelin", "O'Brien novelist"] {
            let results = engine.try_query(query, 5, ranking).expect("query runs");
            assert!(!results.is_empty(), "{}: no hits for '{}'", ranking, query);
            assert_eq!(results[0].document.title, "Flann O'Brien", "{}: '{}'", ranking, query);
        }
    }
}

#[test]
fn failed_query_is_logged_and_yields_no_results() {
    let tmp = TempDir::new().unwrap();
    let engine = build_single(&tmp, "[[Zeppelin]]\nA rigid airship.\n");
    assert_eq!(engine.query("airship", 5, RankingFunction::Bm25).len(), 1);

    // the index vanishes underneath an open engine
    fs::remove_dir_all(tmp.path().join("index")).unwrap();
    for ranking in [RankingFunction::Bm25, RankingFunction::LmDirichlet { mu: 2000.0 }] {
        assert!(matches!(engine.try_query("airship", 5, ranking), Err(Error::QueryExecutionFailure(_))));
        assert!(engine.query("airship", 5, ranking).is_empty());
    }
}

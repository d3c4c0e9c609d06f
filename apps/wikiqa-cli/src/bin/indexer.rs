use std::env;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use wikiqa_cli::{flag_value, init_logging};
use wikiqa_core::config::Config;
use wikiqa_core::indexer::Indexer;
use wikiqa_core::normalize::TextNormalizer;
use wikiqa_core::types::NormalizationMode;
use wikiqa_text::build_index_with_progress;

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut corpus_dir = None; let mut mode: Option<NormalizationMode> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--corpus" | "-c" => { corpus_dir = Some(PathBuf::from(flag_value(&args, i, "--corpus"))); i += 1; }
            "--mode" | "-m" => { mode = Some(flag_value(&args, i, "--mode").parse()?); i += 1; }
            "--help" | "-h" => {
                println!("Usage: wikiqa-indexer [--corpus DIR] [--mode none|stem|lemma]");
                return Ok(());
            }
            other => { eprintln!("Error: unexpected argument '{}'", other); std::process::exit(2); }
        }
        i += 1;
    }
    let corpus_dir = corpus_dir.unwrap_or_else(|| settings.corpus_dir());
    let specs: Vec<_> = settings.index.indices.iter().filter(|spec| mode.map_or(true, |m| spec.mode() == m)).collect();
    if specs.is_empty() {
        anyhow::bail!("no configured index uses mode {}", mode.map(|m| m.to_string()).unwrap_or_default());
    }

    println!("wikiqa indexer\n==============");
    println!("Corpus directory: {}", corpus_dir.display());
    let normalizer = TextNormalizer::default();
    for spec in specs {
        let index_dir = spec.resolved_path();
        println!("\nBuilding index '{}' ({}) at {}", spec.name, spec.mode(), index_dir.display());
        let indexer = Indexer::new(normalizer.clone(), spec.mode());
        let pb = ProgressBar::new(0);
        pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")?.progress_chars("#>-"));
        let stats = build_index_with_progress(&corpus_dir, index_dir, &indexer, settings.index.writer_heap_bytes, |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })?;
        pb.finish_and_clear();
        println!("Indexed {} documents from {} files ({} skipped)", stats.documents, stats.files, stats.skipped_files);
    }
    println!("\nIndexing completed. Evaluate with: cargo run --bin wikiqa-eval");
    Ok(())
}

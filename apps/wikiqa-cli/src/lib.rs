//! Glue shared by the wikiqa binaries.
use tracing_subscriber::{fmt, EnvFilter};

use wikiqa_core::config::IndexSpec;
use wikiqa_core::normalize::TextNormalizer;
use wikiqa_text::QueryEngine;

/// Log to stderr, `info` and above unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).try_init();
}

pub fn open_engine(spec: &IndexSpec) -> wikiqa_core::Result<QueryEngine> {
    QueryEngine::open(spec.resolved_path(), spec.mode(), TextNormalizer::default())
}

/// Value following a flag, or exit with a usage error.
pub fn flag_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(v) if !v.starts_with("--") => v.clone(),
        _ => {
            eprintln!("Error: {} requires a value", flag);
            std::process::exit(2);
        }
    }
}

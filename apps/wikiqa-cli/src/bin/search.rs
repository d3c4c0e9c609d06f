use std::env;

use wikiqa_cli::{flag_value, init_logging, open_engine};
use wikiqa_core::config::Config;
use wikiqa_core::types::RankingFunction;

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut query = None; let mut index_name = None; let mut ranking = RankingFunction::default(); let mut limit = settings.eval.top_k;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--index" | "-i" => { index_name = Some(flag_value(&args, i, "--index")); i += 1; }
            "--ranking" | "-r" => { ranking = flag_value(&args, i, "--ranking").parse()?; i += 1; }
            "--limit" | "-n" => { limit = flag_value(&args, i, "--limit").parse()?; i += 1; }
            _ if !args[i].starts_with('-') && query.is_none() => query = Some(args[i].clone()),
            other => { eprintln!("Error: unexpected argument '{}'", other); std::process::exit(2); }
        }
        i += 1;
    }
    let Some(query) = query else {
        eprintln!("Usage: wikiqa-search <query> [--index NAME] [--ranking NAME] [--limit N]");
        eprintln!("Example: wikiqa-search 'NEWSPAPERS The Daily Planet' --index stem --ranking lm_dirichlet");
        std::process::exit(1);
    };
    let spec = match &index_name {
        Some(name) => settings.index_named(name).ok_or_else(|| anyhow::anyhow!("unknown index '{}'", name))?,
        None => settings.index.indices.first().ok_or_else(|| anyhow::anyhow!("no index configured"))?,
    };

    println!("wikiqa search\n=============");
    println!("Query: {}", query);
    println!("Index: {} ({}) at {}", spec.name, spec.mode(), spec.resolved_path().display());
    println!("Ranking: {}", ranking);
    let engine = open_engine(spec)?;
    let results = engine.try_query(&query, limit, ranking)?;
    println!("\nFound {} results", results.len());
    for (rank, result) in results.iter().enumerate() {
        println!("  {}. score={:.4}  title={}  categories={}", rank + 1, result.score, result.document.title, result.document.categories);
    }
    Ok(())
}

use std::env;
use std::path::PathBuf;

use wikiqa_cli::{flag_value, init_logging, open_engine};
use wikiqa_core::config::Config;
use wikiqa_core::types::RankingFunction;
use wikiqa_eval::{read_quiz_file, sweep, EvaluationRunner};

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut quiz_file = None; let mut index_names: Vec<String> = Vec::new(); let mut rankings: Vec<RankingFunction> = Vec::new(); let mut json = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--quiz" | "-q" => { quiz_file = Some(PathBuf::from(flag_value(&args, i, "--quiz"))); i += 1; }
            "--index" | "-i" => { index_names.push(flag_value(&args, i, "--index")); i += 1; }
            "--ranking" | "-r" => { rankings.push(flag_value(&args, i, "--ranking").parse()?); i += 1; }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Usage: wikiqa-eval [--quiz FILE] [--index NAME]... [--ranking NAME]... [--json]");
                println!("Rankings: {}", RankingFunction::ALL.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", "));
                return Ok(());
            }
            other => { eprintln!("Error: unexpected argument '{}'", other); std::process::exit(2); }
        }
        i += 1;
    }

    let quiz_file = quiz_file.unwrap_or_else(|| settings.quiz_file());
    let indices = if index_names.is_empty() {
        settings.index.indices.clone()
    } else {
        index_names
            .iter()
            .map(|name| settings.index_named(name).cloned().ok_or_else(|| anyhow::anyhow!("unknown index '{}'", name)))
            .collect::<anyhow::Result<Vec<_>>>()?
    };
    if rankings.is_empty() { rankings = settings.eval.ranking_functions.clone(); }

    let items = read_quiz_file(&quiz_file)?;
    let runner = EvaluationRunner::new(settings.eval.top_k);
    let rows = sweep(&indices, &rankings, &runner, &items, open_engine);

    if json {
        let rows: Vec<_> = rows.iter().map(|row| row.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("wikiqa evaluation\n=================");
    println!("Quiz: {} ({} questions, top {})", quiz_file.display(), items.len(), runner.top_k());
    let mut current_index = None;
    for row in &rows {
        if current_index != Some(row.index.as_str()) {
            println!("\n======== index {} ({}) ========", row.index, row.mode);
            current_index = Some(row.index.as_str());
        }
        println!("---- ranking: {}", row.ranking);
        for line in row.report.to_string().lines() { println!("\t{}", line); }
    }
    if rows.is_empty() {
        anyhow::bail!("no index could be opened");
    }
    Ok(())
}

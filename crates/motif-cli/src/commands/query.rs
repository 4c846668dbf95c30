use anyhow::{Context, Result};
use motif_core::Embedder;
use motif_etl::{index_directory, query_file, Config};
use motif_search::checked_k;
use std::path::Path;

pub fn run_query(config: &Config, file: &Path, k: Option<i64>, json: bool) -> Result<()> {
    let k = match k {
        Some(k) => checked_k(k)?,
        None => config.top_k,
    };

    if !config.corpus_dir.is_dir() {
        if json {
            println!("[]");
        } else {
            print_empty_corpus_hint(config);
        }
        return Ok(());
    }

    let embedder = Embedder::new();
    let (index, report) = index_directory(&embedder, &config.corpus_dir)
        .with_context(|| format!("Failed to index corpus: {}", config.corpus_dir.display()))?;

    if !report.skipped.is_empty() {
        log::warn!(
            "{} files could not be decoded and were left out of the index",
            report.skipped.len()
        );
    }

    let hits = query_file(&embedder, &index, file, k)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if index.is_empty() {
        print_empty_corpus_hint(config);
        return Ok(());
    }

    println!(
        "Query: {} against {} indexed files",
        super::display_name(&file.display().to_string()),
        index.len()
    );
    println!("Top {} results:", hits.len());
    super::print_hits(&hits);

    Ok(())
}

fn print_empty_corpus_hint(config: &Config) {
    println!("No MIDI files found in {}", config.corpus_dir.display());
    println!("\nRun 'motif generate' to create a corpus.");
}

use anyhow::{Context, Result};
use motif_core::Embedder;
use motif_etl::{corpus_rng, embed_file, item_id, write_corpus, Config, Style};
use motif_search::SimilarityIndex;

/// Generate a happy/sad corpus, index it, and query it with one song of each
/// style.
pub fn run_demo(config: &Config, seed: Option<u64>) -> Result<()> {
    println!("--- Mini Music Embedding + Retrieval System ---");

    println!("\n[1] Generating Synthetic MIDI Data...");
    let dir = &config.corpus_dir;
    let per_style = config.songs_per_style;
    let mut rng = corpus_rng(seed.or(config.seed));
    let paths = write_corpus(
        dir,
        &[(Style::Happy, per_style), (Style::Sad, per_style)],
        config.notes_per_song,
        &mut rng,
    )?;
    println!("Generated {} MIDI files in {}.", paths.len(), dir.display());

    println!("\n[2] Initializing Embedder and Index...");
    let embedder = Embedder::new();
    let mut index = SimilarityIndex::with_dimension(embedder.dimension());

    println!("\n[3] Processing Dataset...");
    for path in &paths {
        let vector = embed_file(&embedder, path)?;
        index.add_item(item_id(path), &vector)?;
        println!(
            "Indexed {}: Vector {}",
            super::display_name(&item_id(path)),
            vector
        );
    }

    println!("\n[4] Performing Retrieval Demos...");
    for style in [Style::Happy, Style::Sad] {
        let query = dir.join(format!("{style}_0.mid"));
        if !query.is_file() {
            continue;
        }

        println!("\n--- Query: {} ({}_0.mid) ---", style.title(), style);
        let query_vector = embed_file(&embedder, &query)?;
        let hits = index
            .search(&query_vector, config.top_k)
            .with_context(|| format!("Query with {} failed", query.display()))?;

        println!("Query Vector: {query_vector}");
        println!("Top {} Results:", config.top_k);
        super::print_hits(&hits);
    }

    println!("\n[5] Trade-offs Analysis");
    println!("Why this works: the hand-crafted features capture 'mood' (register and tempo).");
    println!(
        "Where it fails: note sequences with the same statistics but different melodies embed identically."
    );
    println!(
        "Trade-offs: hand-crafted features are interpretable but rigid; learned embeddings are opaque but more expressive."
    );

    Ok(())
}

use anyhow::Result;
use motif_etl::{corpus_rng, write_corpus, Config, Style};

/// Styles generated when none are named on the command line.
pub const DEFAULT_STYLES: [Style; 2] = [Style::Happy, Style::Sad];

pub fn run_generate(
    config: &Config,
    per_style: Option<usize>,
    notes: Option<usize>,
    seed: Option<u64>,
    styles: Vec<Style>,
) -> Result<()> {
    let per_style = per_style.unwrap_or(config.songs_per_style);
    let notes = notes.unwrap_or(config.notes_per_song);
    let seed = seed.or(config.seed);
    let styles = if styles.is_empty() {
        DEFAULT_STYLES.to_vec()
    } else {
        styles
    };

    let plan: Vec<(Style, usize)> = styles.into_iter().map(|s| (s, per_style)).collect();
    let mut rng = corpus_rng(seed);

    println!("Generating synthetic MIDI data in {}", config.corpus_dir.display());
    if let Some(seed) = seed {
        println!("  Seed: {seed}");
    }

    let paths = write_corpus(&config.corpus_dir, &plan, notes, &mut rng)?;

    for path in &paths {
        println!("  {}", super::display_name(&path.display().to_string()));
    }
    println!("\n✓ Generated {} MIDI files", paths.len());

    Ok(())
}

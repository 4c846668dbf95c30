use anyhow::{Context, Result};
use motif_core::Embedder;
use motif_etl::midi::decode_midi;
use std::path::Path;

/// Print the raw features and normalized embedding of one file.
pub fn show_embedding(path: &Path) -> Result<()> {
    let notes = decode_midi(path)
        .with_context(|| format!("Failed to decode MIDI file: {}", path.display()))?;
    let embedder = Embedder::new();

    println!("{}", path.display());
    println!("  Notes: {}", notes.len());

    match embedder.features(&notes) {
        Some(features) => {
            println!("  Average pitch:    {:.4}", features.average_pitch);
            println!("  Pitch range:      {:.4}", features.pitch_range);
            println!("  Note density:     {:.4} notes/s", features.note_density);
            println!("  Average duration: {:.4} s", features.average_duration);
        }
        None => println!("  (no notes)"),
    }

    println!("  Vector: {}", embedder.embed(&notes));
    Ok(())
}

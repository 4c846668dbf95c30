use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether `path` looks like a Standard MIDI File.
pub fn is_midi_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        matches!(
            ext.to_string_lossy().to_lowercase().as_ref(),
            "mid" | "midi"
        )
    } else {
        false
    }
}

/// Recursively collect MIDI files under `dir`, sorted by path.
///
/// Sorting fixes the insertion order, and so the tie-breaking order, of an
/// index built from the result.
pub fn discover_midi_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_midi_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    log::debug!("Found {} MIDI files under {}", paths.len(), dir.display());
    Ok(paths)
}

use anyhow::{Context, Result};
use motif_core::{EmbeddingVector, Embedder};
use motif_search::{SearchHit, SimilarityIndex};
use std::path::{Path, PathBuf};

use crate::midi::decode_midi;
use crate::scan::discover_midi_files;

/// Outcome of indexing a batch of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Files embedded and added to the index.
    pub indexed: usize,
    /// Files that could not be decoded.
    pub skipped: Vec<PathBuf>,
}

/// Load a MIDI file and embed its notes.
pub fn embed_file(embedder: &Embedder, path: &Path) -> Result<EmbeddingVector> {
    let notes = decode_midi(path)
        .with_context(|| format!("Failed to decode MIDI file: {}", path.display()))?;
    Ok(embedder.embed(&notes))
}

/// Identifier under which a file is stored in the index.
pub fn item_id(path: &Path) -> String {
    path.display().to_string()
}

/// Load, embed and index each file in order.
///
/// Files that fail to decode are logged and listed in the report; the index
/// holds everything else.
pub fn build_index(embedder: &Embedder, paths: &[PathBuf]) -> Result<(SimilarityIndex, IndexReport)> {
    let mut index = SimilarityIndex::with_dimension(embedder.dimension());
    let mut report = IndexReport::default();

    for (idx, path) in paths.iter().enumerate() {
        let progress = format!("[{}/{}]", idx + 1, paths.len());

        match embed_file(embedder, path) {
            Ok(vector) => {
                log::debug!("{} Indexed {}: {}", progress, path.display(), vector);
                index.add_item(item_id(path), &vector)?;
                report.indexed += 1;
            }
            Err(e) => {
                log::warn!("{} Skipping {}: {:#}", progress, path.display(), e);
                report.skipped.push(path.clone());
            }
        }
    }

    log::info!(
        "Indexed {} files ({} skipped)",
        report.indexed,
        report.skipped.len()
    );
    Ok((index, report))
}

/// Index every MIDI file under `dir`.
pub fn index_directory(embedder: &Embedder, dir: &Path) -> Result<(SimilarityIndex, IndexReport)> {
    let paths = discover_midi_files(dir)?;
    build_index(embedder, &paths)
}

/// Embed `path` and return its `k` nearest neighbours in `index`.
pub fn query_file(
    embedder: &Embedder,
    index: &SimilarityIndex,
    path: &Path,
    k: usize,
) -> Result<Vec<SearchHit>> {
    let query = embed_file(embedder, path)?;
    let hits = index.search(&query, k).context("Similarity search failed")?;
    Ok(hits)
}

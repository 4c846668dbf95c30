//! Integration tests for the generate → load → embed → index → query flow.
//!
//! Corpora are generated with fixed seeds into temporary directories, so
//! every run sees the same files.

use motif_core::Embedder;
use motif_etl::midi::{decode_midi, encode_song, parse_midi};
use motif_etl::{
    corpus_rng, generate_song, index_directory, item_id, query_file, write_corpus, Style,
};
use motif_search::SearchHit;
use std::collections::HashMap;
use tempfile::TempDir;

fn mean_score(hits: &[SearchHit], prefix: &str, exclude: &str) -> f64 {
    let scores: Vec<f64> = hits
        .iter()
        .filter(|h| h.id != exclude)
        .filter(|h| {
            std::path::Path::new(&h.id)
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(prefix))
        })
        .map(|h| h.score)
        .collect();
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Generated songs survive the trip through a MIDI file.
#[test]
fn test_generated_songs_decode_to_their_notes() {
    let mut rng = corpus_rng(Some(2024));
    for style in Style::ALL {
        let song = generate_song(style, 20, &mut rng);
        let decoded = parse_midi(&encode_song(&song).unwrap()).unwrap();
        let expected = song.notes();

        assert_eq!(decoded.len(), 20, "{style}");
        for (got, want) in decoded.iter().zip(&expected) {
            assert_eq!(got.pitch, want.pitch);
            assert_eq!(got.velocity, want.velocity);
            assert!((got.start - want.start).abs() < 1e-6);
            assert!((got.duration - want.duration).abs() < 1e-6);
        }
    }
}

/// Decoded files embed exactly like the in-memory melody they came from.
#[test]
fn test_file_embedding_matches_song_embedding() {
    let temp_dir = TempDir::new().unwrap();
    let paths =
        write_corpus(temp_dir.path(), &[(Style::Happy, 1)], 20, &mut corpus_rng(Some(8))).unwrap();
    let song = generate_song(Style::Happy, 20, &mut corpus_rng(Some(8)));

    let embedder = Embedder::new();
    let from_file = embedder.embed(&decode_midi(&paths[0]).unwrap());
    let from_song = embedder.embed(&song.notes());
    for (a, b) in from_file.as_slice().iter().zip(from_song.as_slice()) {
        assert!((a - b).abs() < 1e-9);
    }
}

/// The happy/sad demo: each query finds itself first and scores its own
/// style higher on average than the other style.
#[test]
fn test_happy_and_sad_queries() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_corpus(dir, &[(Style::Happy, 5), (Style::Sad, 5)], 20, &mut corpus_rng(Some(1))).unwrap();

    let embedder = Embedder::new();
    let (index, report) = index_directory(&embedder, dir).unwrap();
    assert_eq!(report.indexed, 10);
    assert!(report.skipped.is_empty());

    for (own, other) in [("happy", "sad"), ("sad", "happy")] {
        // `<style>_0` is the earliest-inserted file of its style.
        let query = dir.join(format!("{own}_0.mid"));
        let query_id = item_id(&query);

        let top = query_file(&embedder, &index, &query, 5).unwrap();
        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
        assert!((top[0].score - 1.0).abs() < 1e-9);
        assert!(top.iter().any(|h| h.id == query_id));

        let all = query_file(&embedder, &index, &query, 100).unwrap();
        assert_eq!(all.len(), 10);
        assert!(
            mean_score(&all, own, &query_id) > mean_score(&all, other, &query_id),
            "{own} query should prefer {own} songs"
        );
    }
}

/// Rebuilding the index from the same files gives identical rankings.
#[test]
fn test_rankings_are_reproducible() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_corpus(
        dir,
        &[(Style::Happy, 3), (Style::Sad, 3), (Style::Chaotic, 3)],
        20,
        &mut corpus_rng(Some(77)),
    )
    .unwrap();

    let embedder = Embedder::new();
    let query = dir.join("chaotic_1.mid");

    let (first_index, _) = index_directory(&embedder, dir).unwrap();
    let (second_index, _) = index_directory(&embedder, dir).unwrap();
    let first = query_file(&embedder, &first_index, &query, 9).unwrap();
    let second = query_file(&embedder, &second_index, &query, 9).unwrap();

    let bits = |hits: &[SearchHit]| -> Vec<(String, u64)> {
        hits.iter().map(|h| (h.id.clone(), h.score.to_bits())).collect()
    };
    assert_eq!(bits(&first), bits(&second));

    let ids: HashMap<_, _> = first.iter().map(|h| (h.id.clone(), h.score)).collect();
    assert_eq!(ids.len(), 9);
}

/// Regenerating into the same directory overwrites files; re-indexing keeps
/// one entry per file.
#[test]
fn test_regenerated_corpus_overwrites_entries() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_corpus(dir, &[(Style::Happy, 2)], 20, &mut corpus_rng(Some(4))).unwrap();
    write_corpus(dir, &[(Style::Happy, 2)], 20, &mut corpus_rng(Some(5))).unwrap();

    let (index, report) = index_directory(&Embedder::new(), dir).unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(index.len(), 2);
}

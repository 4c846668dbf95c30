pub mod config;
pub mod demo;
pub mod embed;
pub mod generate;
pub mod query;

pub use demo::run_demo;
pub use embed::show_embedding;
pub use generate::run_generate;
pub use query::run_query;

use motif_search::SearchHit;
use std::path::Path;

/// Print ranked hits as `1. happy_0.mid (Similarity: 0.9998)`.
pub fn print_hits(hits: &[SearchHit]) {
    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{}. {} (Similarity: {:.4})",
            rank + 1,
            display_name(&hit.id),
            hit.score
        );
    }
}

/// File name of an index identifier, falling back to the whole identifier.
pub fn display_name(id: &str) -> String {
    Path::new(id)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string())
}

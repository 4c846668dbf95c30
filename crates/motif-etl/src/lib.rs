//! Loading, generation and indexing around the motif core.
//!
//! Decodes Standard MIDI Files into note sequences, writes synthetic
//! style-parameterized corpora, and drives the load → embed → index
//! pipeline that fills a [`SimilarityIndex`](motif_search::SimilarityIndex).

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod generate;
pub mod midi;
pub mod pipeline;
pub mod scan;

pub use config::Config;
pub use error::{MidiError, MidiResult};
pub use generate::{corpus_rng, generate_song, write_corpus, Style};
pub use pipeline::{build_index, embed_file, index_directory, item_id, query_file, IndexReport};
pub use scan::discover_midi_files;

//! Vector search for motif.
//!
//! An exact, in-memory similarity index over [`EmbeddingVector`]s keyed by
//! caller-supplied identifiers. Every query is a full linear scan, so the
//! ranking always reflects the whole index as of that call.
//!
//! [`EmbeddingVector`]: motif_core::EmbeddingVector

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod index;

pub use index::{checked_k, SearchHit, SimilarityIndex};
pub use motif_core::{Error, Result};

//! Core domain model for motif.
//!
//! This crate defines the note model consumed by the embedding pipeline,
//! the fixed-dimension [`EmbeddingVector`], and the [`Embedder`] that maps
//! a note sequence to a unit vector of coarse "mood" features.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod embed;
pub mod error;
pub mod model;

pub use embed::{Embedder, MoodFeatures, EMBEDDING_DIM};
pub use error::{Error, Result};
pub use model::{EmbeddingVector, Note};

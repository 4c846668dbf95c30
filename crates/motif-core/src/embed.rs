//! Hand-crafted feature embedding for note sequences.
//!
//! Four features summarize the "mood" of a passage: register (average
//! pitch), melodic spread (pitch range), rhythmic density (notes per second)
//! and articulation (average duration). The raw feature vector is scaled to
//! unit length so that a dot product between two embeddings is their cosine
//! similarity.
//!
//! The features deliberately collapse information: two melodies with the
//! same statistics embed identically.

use serde::{Deserialize, Serialize};

use crate::model::{EmbeddingVector, Note};

/// Number of features produced by [`Embedder::embed`].
pub const EMBEDDING_DIM: usize = 4;

/// Raw, unnormalized features of a non-empty note sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodFeatures {
    /// Mean MIDI pitch.
    pub average_pitch: f64,
    /// Highest pitch minus lowest pitch.
    pub pitch_range: f64,
    /// Notes per second over the sequence span, or 0 when the span is not
    /// positive.
    pub note_density: f64,
    /// Mean note duration in seconds.
    pub average_duration: f64,
}

impl MoodFeatures {
    /// Features in embedding order.
    #[must_use]
    pub fn to_raw_vector(&self) -> [f64; EMBEDDING_DIM] {
        [
            self.average_pitch,
            self.pitch_range,
            self.note_density,
            self.average_duration,
        ]
    }
}

/// Maps note sequences to unit-length [`EmbeddingVector`]s.
///
/// Stateless and deterministic: the same notes always produce a
/// bit-identical vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embedder {
    dimension: usize,
}

impl Default for Embedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dimension: EMBEDDING_DIM,
        }
    }

    /// Dimension of every vector this embedder returns.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Compute the raw features, or `None` for an empty sequence.
    #[must_use]
    pub fn features(&self, notes: &[Note]) -> Option<MoodFeatures> {
        let (first, last) = (notes.first()?, notes.last()?);
        let count = notes.len() as f64;

        let (mut min_pitch, mut max_pitch) = (u8::MAX, u8::MIN);
        let mut pitch_sum = 0.0;
        let mut duration_sum = 0.0;
        for note in notes {
            min_pitch = min_pitch.min(note.pitch);
            max_pitch = max_pitch.max(note.pitch);
            pitch_sum += f64::from(note.pitch);
            duration_sum += note.duration;
        }

        let span = last.end() - first.start;
        let note_density = if span > 0.0 { count / span } else { 0.0 };

        Some(MoodFeatures {
            average_pitch: pitch_sum / count,
            pitch_range: f64::from(max_pitch - min_pitch),
            note_density,
            average_duration: duration_sum / count,
        })
    }

    /// Embed a note sequence.
    ///
    /// Returns the all-zero vector for an empty sequence, and also when every
    /// raw feature is zero.
    #[must_use]
    pub fn embed(&self, notes: &[Note]) -> EmbeddingVector {
        match self.features(notes) {
            Some(features) => EmbeddingVector::normalized(features.to_raw_vector().to_vec()),
            None => EmbeddingVector::zeros(self.dimension),
        }
    }
}

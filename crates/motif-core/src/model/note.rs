use serde::{Deserialize, Serialize};

/// A single sounding note, in seconds.
///
/// Produced by the MIDI loader and consumed by the
/// [`Embedder`](crate::Embedder). Sequences handed to the embedder are
/// expected to be ordered by `start`; nothing else about the values is
/// validated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI note number (0-127).
    pub pitch: u8,

    /// Onset time in seconds from the start of the file.
    pub start: f64,

    /// Sounding length in seconds.
    pub duration: f64,

    /// Attack velocity (0-127).
    pub velocity: u8,
}

impl Note {
    #[must_use]
    pub const fn new(pitch: u8, start: f64, duration: f64, velocity: u8) -> Self {
        Self {
            pitch,
            start,
            duration,
            velocity,
        }
    }

    /// Time at which the note stops sounding.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

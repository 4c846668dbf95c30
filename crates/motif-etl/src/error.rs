//! MIDI decoding error types.

use thiserror::Error;

/// Errors that can occur while reading or writing a Standard MIDI File.
#[derive(Debug, Error)]
pub enum MidiError {
    /// The file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a well-formed Standard MIDI File.
    #[error("malformed MIDI data: {0}")]
    Parse(#[from] midly::Error),

    /// Only formats 0 and 1 are read.
    #[error("unsupported MIDI format {0}")]
    UnsupportedFormat(u16),

    /// SMPTE timecode or a zero ticks-per-quarter division.
    #[error("unsupported time division: {0}")]
    UnsupportedTiming(String),
}

/// Convenience alias for MIDI results.
pub type MidiResult<T> = std::result::Result<T, MidiError>;

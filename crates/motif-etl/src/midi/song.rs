use motif_core::Note;
use serde::{Deserialize, Serialize};

/// Resolution used when writing files.
pub const TICKS_PER_QUARTER: u16 = 960;

/// Tempo assumed until a file sets one (120 BPM).
pub const DEFAULT_TEMPO_MICROS: u32 = 500_000;

/// Largest tempo a set-tempo event can hold (24 bits).
pub const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;

/// A note positioned in ticks, as written to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongNote {
    pub pitch: u8,
    pub velocity: u8,
    pub start_tick: u64,
    pub duration_ticks: u64,
}

/// A single-track, single-tempo melody ready to be written as MIDI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Written as the track name.
    pub name: String,
    pub tempo_bpm: u32,
    /// General MIDI program for channel 0.
    pub program: u8,
    pub notes: Vec<SongNote>,
}

impl Song {
    #[must_use]
    pub fn new(name: impl Into<String>, tempo_bpm: u32, program: u8) -> Self {
        Self {
            name: name.into(),
            tempo_bpm,
            program,
            notes: Vec::new(),
        }
    }

    /// Tempo as stored in the file's set-tempo event.
    ///
    /// Below 4 BPM the value no longer fits the event and is clamped.
    #[must_use]
    pub fn micros_per_quarter(&self) -> u32 {
        if self.tempo_bpm == 0 {
            DEFAULT_TEMPO_MICROS
        } else {
            (60_000_000 / self.tempo_bpm).min(MAX_TEMPO_MICROS)
        }
    }

    /// Tick at which the last note ends.
    #[must_use]
    pub fn end_tick(&self) -> u64 {
        self.notes
            .iter()
            .map(|n| n.start_tick + n.duration_ticks)
            .max()
            .unwrap_or(0)
    }

    /// The melody in seconds, ordered by start.
    ///
    /// These are the values the loader recovers when the song is written
    /// and read back.
    #[must_use]
    pub fn notes(&self) -> Vec<Note> {
        let micros = self.micros_per_quarter();
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .map(|n| {
                let start = ticks_to_seconds(n.start_tick, micros, TICKS_PER_QUARTER);
                let end = ticks_to_seconds(
                    n.start_tick + n.duration_ticks,
                    micros,
                    TICKS_PER_QUARTER,
                );
                Note::new(n.pitch, start, end - start, n.velocity)
            })
            .collect();
        notes.sort_by(|a, b| a.start.total_cmp(&b.start));
        notes
    }
}

/// Convert a tick count at a fixed tempo to seconds.
pub(crate) fn ticks_to_seconds(ticks: u64, micros_per_quarter: u32, ticks_per_quarter: u16) -> f64 {
    ticks as f64 * f64::from(micros_per_quarter) / (1_000_000.0 * f64::from(ticks_per_quarter))
}

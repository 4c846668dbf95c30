//! Synthetic corpus generation.
//!
//! Each [`Style`] is a small bundle of parameters (scale, register, tempo,
//! instrument). Melodies are random walks over the style's scale, laid out
//! back-to-back, which is enough to make the styles separable by the
//! embedding's register and density features.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::midi::{write_song, Song, SongNote, TICKS_PER_QUARTER};

const BASE_VELOCITY: i16 = 100;
const VELOCITY_JITTER: i16 = 10;

/// Scale pitches are written relative to middle C and transposed so that
/// middle C lands on the style's base pitch.
const MIDDLE_C: i16 = 60;

const MAJOR: [u8; 8] = [60, 62, 64, 65, 67, 69, 71, 72];
const MINOR: [u8; 8] = [60, 62, 63, 65, 67, 68, 70, 72];

/// A named set of generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Major scale, high register, 120 BPM, piano.
    Happy,
    /// Minor scale, low register, 70 BPM, violin.
    Sad,
    /// Chromatic, mid register, 120 BPM, vibraphone, irregular durations.
    Chaotic,
}

impl Style {
    pub const ALL: [Self; 3] = [Self::Happy, Self::Sad, Self::Chaotic];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Chaotic => "chaotic",
        }
    }

    /// Scale degrees before transposition.
    #[must_use]
    pub fn scale(self) -> Vec<u8> {
        match self {
            Self::Happy => MAJOR.to_vec(),
            Self::Sad => MINOR.to_vec(),
            Self::Chaotic => (40..90).collect(),
        }
    }

    /// Where middle C of the scale is placed.
    #[must_use]
    pub const fn base_pitch(self) -> u8 {
        match self {
            Self::Happy => 72,
            Self::Sad => 48,
            Self::Chaotic => 60,
        }
    }

    #[must_use]
    pub const fn tempo_bpm(self) -> u32 {
        match self {
            Self::Happy | Self::Chaotic => 120,
            Self::Sad => 70,
        }
    }

    /// General MIDI program number.
    #[must_use]
    pub const fn program(self) -> u8 {
        match self {
            Self::Happy => 0,
            Self::Sad => 40,
            Self::Chaotic => 11,
        }
    }

    /// Title written into the track name, e.g. "Happy Song".
    #[must_use]
    pub fn title(self) -> String {
        match self {
            Self::Happy => String::from("Happy Song"),
            Self::Sad => String::from("Sad Song"),
            Self::Chaotic => String::from("Chaotic Song"),
        }
    }

    /// Scale shifted onto the style's register. Without the shift every
    /// style would sit in 60-72 and only tempo would separate them.
    fn pitches(self) -> Vec<u8> {
        let shift = i16::from(self.base_pitch()) - MIDDLE_C;
        self.scale()
            .into_iter()
            .map(|p| clamp_midi(i16::from(p) + shift))
            .collect()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "sad" => Ok(Self::Sad),
            "chaotic" | "random" => Ok(Self::Chaotic),
            other => Err(format!(
                "unknown style '{other}' (expected happy, sad or chaotic)"
            )),
        }
    }
}

/// Seeded generator for reproducible corpora, or an entropy-seeded one.
#[must_use]
pub fn corpus_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Generate one melody of `note_count` notes in `style`.
pub fn generate_song<R: Rng + ?Sized>(style: Style, note_count: usize, rng: &mut R) -> Song {
    let pitches = style.pitches();
    let mut song = Song::new(style.title(), style.tempo_bpm(), style.program());

    let mut tick = 0_u64;
    for _ in 0..note_count {
        let pitch = pitches[rng.gen_range(0..pitches.len())];
        let velocity = clamp_midi(BASE_VELOCITY + rng.gen_range(-VELOCITY_JITTER..=VELOCITY_JITTER));
        let beats = match style {
            Style::Chaotic => rng.gen_range(0.5..2.0),
            Style::Happy | Style::Sad => 1.0,
        };
        let duration_ticks = beats_to_ticks(beats);

        song.notes.push(SongNote {
            pitch,
            velocity,
            start_tick: tick,
            duration_ticks,
        });
        tick += duration_ticks;
    }

    song
}

/// Write `count` songs per style into `dir` as `<style>_<i>.mid`.
///
/// Returns the written paths in generation order.
pub fn write_corpus<R: Rng + ?Sized>(
    dir: &Path,
    plan: &[(Style, usize)],
    note_count: usize,
    rng: &mut R,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create corpus directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    for &(style, count) in plan {
        for i in 0..count {
            let path = dir.join(format!("{style}_{i}.mid"));
            let song = generate_song(style, note_count, rng);
            write_song(&path, &song)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::debug!("Generated {} MIDI: {}", style, path.display());
            paths.push(path);
        }
    }

    log::info!("Generated {} MIDI files in {}", paths.len(), dir.display());
    Ok(paths)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn beats_to_ticks(beats: f64) -> u64 {
    (beats * f64::from(TICKS_PER_QUARTER)).round().max(0.0) as u64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_midi(value: i16) -> u8 {
    value.clamp(0, 127) as u8
}

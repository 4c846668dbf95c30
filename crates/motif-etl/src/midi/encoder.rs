use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

use super::song::{Song, TICKS_PER_QUARTER};
use crate::error::MidiResult;

const CHANNEL: u8 = 0;
const NOTE_OFF_VELOCITY: u8 = 0x40;
const MAX_DELTA: u64 = 0x0FFF_FFFF;

/// Encode a song as a format-0 Standard MIDI File.
///
/// The single track carries the track name, tempo and program change at
/// tick 0, followed by note on/off pairs on channel 0. Note-offs sort ahead
/// of note-ons at the same tick so back-to-back notes of equal pitch do not
/// cut each other short.
pub fn encode_song(song: &Song) -> MidiResult<Vec<u8>> {
    let channel = u4::new(CHANNEL);

    // (tick, priority, event): setup events first, then offs, then ons.
    let mut events: Vec<(u64, u8, TrackEventKind<'_>)> =
        Vec::with_capacity(song.notes.len() * 2 + 3);
    events.push((
        0,
        0,
        TrackEventKind::Meta(MetaMessage::TrackName(song.name.as_bytes())),
    ));
    events.push((
        0,
        0,
        TrackEventKind::Meta(MetaMessage::Tempo(u24::new(song.micros_per_quarter()))),
    ));
    events.push((
        0,
        0,
        TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(song.program & 0x7F),
            },
        },
    ));

    for note in &song.notes {
        let key = u7::new(note.pitch & 0x7F);
        events.push((
            note.start_tick,
            2,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(note.velocity & 0x7F),
                },
            },
        ));
        events.push((
            note.start_tick + note.duration_ticks,
            1,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(NOTE_OFF_VELOCITY),
                },
            },
        ));
    }
    events.sort_by_key(|(tick, priority, _)| (*tick, *priority));

    let mut track = Vec::with_capacity(events.len() + 1);
    let mut last_tick = 0;
    for (tick, _, kind) in events {
        track.push(TrackEvent {
            delta: delta(tick - last_tick),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));
    smf.tracks.push(track);

    let mut out = Vec::new();
    smf.write_std(&mut out)?;
    Ok(out)
}

/// Write `song` to `path`, creating parent directories as needed.
pub fn write_song(path: &Path, song: &Song) -> MidiResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, encode_song(song)?)?;
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn delta(ticks: u64) -> u28 {
    u28::new(ticks.min(MAX_DELTA) as u32)
}

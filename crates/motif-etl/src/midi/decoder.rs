use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use motif_core::Note;
use std::collections::HashMap;
use std::path::Path;

use super::song::{ticks_to_seconds, DEFAULT_TEMPO_MICROS};
use crate::error::{MidiError, MidiResult};

/// Events that matter to the note model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
    Tempo(u32),
}

#[derive(Debug, Clone, Copy)]
struct TimedEvent {
    tick: u64,
    kind: EventKind,
}

/// Load the notes of a Standard MIDI File.
pub fn decode_midi(path: &Path) -> MidiResult<Vec<Note>> {
    let bytes = std::fs::read(path)?;
    parse_midi(&bytes)
}

/// Parse the notes out of an in-memory Standard MIDI File.
///
/// Formats 0 and 1 with metrical timing are supported. All tracks are merged
/// by tick and converted to seconds through the file's tempo map. A note
/// runs from a note-on with non-zero velocity to the next note-off (or
/// zero-velocity note-on) of the same pitch on any channel; notes still
/// sounding at the end of the file are dropped. The result is ordered by
/// start time.
pub fn parse_midi(bytes: &[u8]) -> MidiResult<Vec<Note>> {
    let smf = Smf::parse(bytes)?;

    if smf.header.format == Format::Sequential {
        return Err(MidiError::UnsupportedFormat(2));
    }
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) if tpq.as_int() > 0 => tpq.as_int(),
        Timing::Metrical(_) => {
            return Err(MidiError::UnsupportedTiming(String::from(
                "zero ticks per quarter note",
            )))
        }
        Timing::Timecode(fps, subframes) => {
            return Err(MidiError::UnsupportedTiming(format!(
                "SMPTE {fps:?}, {subframes} subframes"
            )))
        }
    };

    let mut events = Vec::new();
    for track in &smf.tracks {
        let mut tick = 0_u64;
        for event in track {
            tick += u64::from(event.delta.as_int());
            if let Some(kind) = note_event(event.kind) {
                events.push(TimedEvent { tick, kind });
            }
        }
    }

    // Stable: events at the same tick keep track order.
    events.sort_by_key(|e| e.tick);

    Ok(collect_notes(&events, ticks_per_quarter))
}

fn note_event(kind: TrackEventKind<'_>) -> Option<EventKind> {
    match kind {
        TrackEventKind::Midi { message, .. } => match message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => Some(EventKind::NoteOn {
                pitch: key.as_int(),
                velocity: vel.as_int(),
            }),
            MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                Some(EventKind::NoteOff {
                    pitch: key.as_int(),
                })
            }
            _ => None,
        },
        TrackEventKind::Meta(MetaMessage::Tempo(micros)) => Some(EventKind::Tempo(micros.as_int())),
        _ => None,
    }
}

/// Walk merged events, converting ticks to seconds through tempo changes.
fn collect_notes(events: &[TimedEvent], ticks_per_quarter: u16) -> Vec<Note> {
    let mut tempo = DEFAULT_TEMPO_MICROS;
    let mut segment_tick = 0_u64;
    let mut segment_secs = 0.0_f64;

    let mut active: HashMap<u8, (f64, u8)> = HashMap::new();
    let mut notes = Vec::new();

    for event in events {
        let secs = segment_secs + ticks_to_seconds(event.tick - segment_tick, tempo, ticks_per_quarter);
        match event.kind {
            EventKind::Tempo(micros) => {
                segment_tick = event.tick;
                segment_secs = secs;
                tempo = micros;
            }
            EventKind::NoteOn { pitch, velocity } => {
                active.insert(pitch, (secs, velocity));
            }
            EventKind::NoteOff { pitch } => {
                if let Some((start, velocity)) = active.remove(&pitch) {
                    notes.push(Note::new(pitch, start, secs - start, velocity));
                }
            }
        }
    }

    if !active.is_empty() {
        log::debug!("Dropping {} unterminated notes", active.len());
    }

    notes.sort_by(|a, b| a.start.total_cmp(&b.start));
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::encoder::encode_song;
    use crate::midi::song::{Song, SongNote};

    /// Build a file from raw track bodies.
    fn smf(format: u16, division: u16, tracks: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"MThd");
        out.extend_from_slice(&6_u32.to_be_bytes());
        out.extend_from_slice(&format.to_be_bytes());
        out.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
        out.extend_from_slice(&division.to_be_bytes());
        for body in tracks {
            out.extend_from_slice(b"MTrk");
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            out.extend_from_slice(body);
        }
        out
    }

    fn on(tick: u64, pitch: u8, velocity: u8) -> TimedEvent {
        TimedEvent {
            tick,
            kind: EventKind::NoteOn { pitch, velocity },
        }
    }

    fn off(tick: u64, pitch: u8) -> TimedEvent {
        TimedEvent {
            tick,
            kind: EventKind::NoteOff { pitch },
        }
    }

    fn tempo(tick: u64, micros: u32) -> TimedEvent {
        TimedEvent {
            tick,
            kind: EventKind::Tempo(micros),
        }
    }

    #[test]
    fn test_collect_single_note() {
        let notes = collect_notes(&[on(0, 60, 100), off(480, 60)], 480);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].pitch, 60);
        assert_eq!(notes[0].velocity, 100);
        assert!(notes[0].start.abs() < 1e-12);
        assert!((notes[0].duration - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_collect_tempo_change() {
        // Quarter at 120 BPM, then 60 BPM for the second quarter.
        let events = [
            on(0, 60, 100),
            off(480, 60),
            tempo(480, 1_000_000),
            on(480, 62, 100),
            off(960, 62),
        ];
        let notes = collect_notes(&events, 480);
        assert_eq!(notes.len(), 2);
        assert!((notes[1].start - 0.5).abs() < 1e-12);
        assert!((notes[1].duration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collect_tempo_change_inside_note() {
        let events = [on(0, 60, 100), tempo(480, 1_000_000), off(960, 60)];
        let notes = collect_notes(&events, 480);
        assert!((notes[0].duration - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_collect_unterminated_note_is_dropped() {
        let notes = collect_notes(&[on(0, 60, 100), on(0, 64, 100), off(480, 64)], 480);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].pitch, 64);
    }

    #[test]
    fn test_collect_restruck_pitch_restarts() {
        let notes = collect_notes(&[on(0, 60, 100), on(480, 60, 110), off(960, 60)], 480);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].velocity, 110);
        assert!((notes[0].start - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_collect_orders_by_start() {
        let notes = collect_notes(&[on(0, 60, 100), on(240, 64, 100), off(960, 60), off(480, 64)], 480);
        let pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![60, 64]);
    }

    #[test]
    fn test_running_status_and_zero_velocity_off() {
        let track = [
            0x00, 0x90, 60, 90, //
            0x00, 64, 80, // running status note-on
            0x83, 0x60, 60, 0, // note-on velocity 0 ends 60
            0x83, 0x60, 64, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let notes = parse_midi(&smf(0, 480, &[&track])).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].pitch, 60);
        assert!((notes[0].duration - 0.5).abs() < 1e-12);
        assert_eq!(notes[1].pitch, 64);
        assert!((notes[1].duration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_file_tempo_event() {
        let track = [
            0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, // 1_000_000 us
            0x00, 0x90, 60, 100, //
            0x83, 0x60, 0x80, 60, 0, // delta 480
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let notes = parse_midi(&smf(0, 480, &[&track])).unwrap();
        assert_eq!(notes.len(), 1);
        assert!((notes[0].duration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_one_tracks_merge() {
        let tempo_track = [
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 500_000 us
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let melody = [
            0x83, 0x60, 0x91, 67, 70, // delta 480, channel 1
            0x83, 0x60, 0x81, 67, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let bass = [
            0x00, 0x92, 36, 60, //
            0x87, 0x40, 0x82, 36, 0, // delta 960
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let notes = parse_midi(&smf(1, 480, &[&tempo_track, &melody, &bass])).unwrap();
        let pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![36, 67]);
        assert!((notes[1].start - 0.5).abs() < 1e-12);
        assert!((notes[0].duration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_meta_and_sysex_are_skipped() {
        let mut track = vec![0x00, 0xFF, 0x03, 0x04];
        track.extend_from_slice(b"Test");
        track.extend_from_slice(&[0x00, 0xF0, 0x02, 0x7E, 0xF7]);
        track.extend_from_slice(&[0x00, 0xB0, 7, 100]); // controller
        track.extend_from_slice(&[0x00, 0xC0, 40]); // program change
        track.extend_from_slice(&[0x00, 0x90, 72, 100, 0x60, 0x80, 72, 0]);
        track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
        let notes = parse_midi(&smf(0, 96, &[track.as_slice()])).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].pitch, 72);
        assert!((notes[0].duration - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_file_has_no_notes() {
        let track = [0x00, 0xFF, 0x2F, 0x00];
        assert!(parse_midi(&smf(0, 480, &[&track])).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_midi_bytes() {
        let err = parse_midi(b"definitely not a midi file").unwrap_err();
        assert!(matches!(err, MidiError::Parse(_)));
    }

    #[test]
    fn test_rejects_smpte_timing() {
        let err = parse_midi(&smf(0, 0xE728, &[&[0x00, 0xFF, 0x2F, 0x00]])).unwrap_err();
        assert!(matches!(err, MidiError::UnsupportedTiming(_)));
    }

    #[test]
    fn test_rejects_format_two() {
        let err = parse_midi(&smf(2, 480, &[&[0x00, 0xFF, 0x2F, 0x00]])).unwrap_err();
        assert!(matches!(err, MidiError::UnsupportedFormat(2)));
    }

    #[test]
    fn test_missing_file() {
        let err = decode_midi(Path::new("/nonexistent/song.mid")).unwrap_err();
        assert!(matches!(err, MidiError::Io(_)));
    }

    #[test]
    fn test_reads_encoded_song() {
        let mut song = Song::new("Sad Song", 70, 40);
        for (i, pitch) in [48_u8, 51, 55].into_iter().enumerate() {
            song.notes.push(SongNote {
                pitch,
                velocity: 95,
                start_tick: i as u64 * 960,
                duration_ticks: 960,
            });
        }
        let decoded = parse_midi(&encode_song(&song).unwrap()).unwrap();
        let expected = song.notes();
        assert_eq!(decoded.len(), expected.len());
        for (got, want) in decoded.iter().zip(&expected) {
            assert_eq!(got.pitch, want.pitch);
            assert_eq!(got.velocity, want.velocity);
            assert!((got.start - want.start).abs() < 1e-9);
            assert!((got.duration - want.duration).abs() < 1e-9);
        }
    }
}

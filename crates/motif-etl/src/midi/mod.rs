pub mod decoder;
pub mod encoder;
pub mod song;

pub use decoder::{decode_midi, parse_midi};
pub use encoder::{encode_song, write_song};
pub use song::{Song, SongNote, DEFAULT_TEMPO_MICROS, MAX_TEMPO_MICROS, TICKS_PER_QUARTER};

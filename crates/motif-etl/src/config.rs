use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for motif.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (MOTIF_* prefix)
/// 3. Config file (~/.config/motif/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the MIDI corpus.
    ///
    /// Can be set via:
    /// - CLI: --corpus-dir /path/to/corpus
    /// - ENV: MOTIF_CORPUS_DIR
    /// - Config: corpus_dir = "/path/to/corpus"
    /// - Default: ~/.local/share/motif/corpus
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,

    /// Number of results returned by a query.
    #[serde(default = "default_top_k", deserialize_with = "number_or_string")]
    pub top_k: usize,

    /// Songs generated per style.
    #[serde(default = "default_songs_per_style", deserialize_with = "number_or_string")]
    pub songs_per_style: usize,

    /// Notes per generated song.
    #[serde(default = "default_notes_per_song", deserialize_with = "number_or_string")]
    pub notes_per_song: usize,

    /// Seed for corpus generation. Unset means a fresh corpus every run.
    #[serde(default, deserialize_with = "optional_number_or_string")]
    pub seed: Option<u64>,

    /// Logger settings.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            top_k: default_top_k(),
            songs_per_style: default_songs_per_style(),
            notes_per_song: default_notes_per_song(),
            seed: None,
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/motif/config.toml
    /// Reads environment variables with MOTIF_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new()
            .context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder.add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("motif");
        builder.add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom corpus directory.
    ///
    /// This is used when the --corpus-dir CLI flag is provided.
    pub fn load_with_corpus_dir(corpus_dir: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.corpus_dir = corpus_dir;
        Ok(config)
    }
}

/// A numeric setting as written in TOML or as a `MOTIF_*` variable, which
/// arrives as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

impl NumberOrString {
    fn parse<T, E>(self) -> std::result::Result<T, E>
    where
        T: FromStr + TryFrom<u64>,
        <T as FromStr>::Err: Display,
        E: de::Error,
    {
        match self {
            Self::Number(n) => T::try_from(n)
                .map_err(|_| E::custom(format!("{n} is out of range"))),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| E::custom(format!("invalid number '{s}': {e}"))),
        }
    }
}

fn number_or_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64>,
    <T as FromStr>::Err: Display,
{
    NumberOrString::deserialize(deserializer)?.parse()
}

fn optional_number_or_string<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64>,
    <T as FromStr>::Err: Display,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

/// Returns: ~/.local/share/motif/corpus (or platform equivalent)
fn default_corpus_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("motif")
        .join("corpus")
}

const fn default_top_k() -> usize {
    5
}

const fn default_songs_per_style() -> usize {
    5
}

const fn default_notes_per_song() -> usize {
    20
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/motif/config.toml
/// - macOS: ~/Library/Application Support/motif/config.toml
/// - Windows: %APPDATA%\motif\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("motif")
        .join("config.toml")
}

/// Keys accepted by `motif config get` / `motif config set`.
pub const CONFIG_KEYS: [&str; 5] = [
    "corpus_dir",
    "top_k",
    "songs_per_style",
    "notes_per_song",
    "seed",
];

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Motif Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (MOTIF_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Directory holding the MIDI corpus
#
# `motif generate` writes here; `motif query` indexes every .mid file below it.
#
# Can also be set via:
# - CLI: motif --corpus-dir /custom/corpus query song.mid
# - Environment: MOTIF_CORPUS_DIR=/custom/corpus
#
# Default: Platform-specific data directory
#corpus_dir = "/path/to/corpus"

# Number of results returned by `motif query`
top_k = 5

# Corpus generation
songs_per_style = 5
notes_per_song = 20

# Fixed seed for reproducible corpora (omit for a fresh corpus every run)
#seed = 42
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config())
        .context("Failed to write config file")?;

    Ok(true)
}

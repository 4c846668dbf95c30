use anyhow::Result;
use clap::Parser;
use motif_etl::{Config, Style};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "motif", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the MIDI corpus (default: ~/.local/share/motif/corpus)
    #[arg(long, global = true)]
    corpus_dir: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Generate a synthetic MIDI corpus
    ///
    /// Writes `<style>_<n>.mid` files into the corpus directory. Each style
    /// fixes a scale, register, tempo and instrument; melodies are random
    /// walks over the scale. Pass --seed for a reproducible corpus.
    Generate {
        /// Songs per style (default: songs_per_style from config)
        #[arg(long)]
        per_style: Option<usize>,

        /// Notes per song (default: notes_per_song from config)
        #[arg(long)]
        notes: Option<usize>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Styles to generate (repeatable; default: happy and sad)
        #[arg(long = "style", value_name = "STYLE")]
        styles: Vec<Style>,
    },
    /// Show the features and embedding of a MIDI file
    Embed {
        /// Path to the MIDI file
        file: PathBuf,
    },
    /// Find the corpus files most similar to a MIDI file
    ///
    /// Every MIDI file under the corpus directory is loaded, embedded and
    /// added to an in-memory index, then the query file is embedded the same
    /// way and compared against all of them. Results are ranked by cosine
    /// similarity (highest first); equal scores keep corpus order.
    ///
    /// The index lives only for the duration of the command.
    Query {
        /// Path to the query MIDI file
        file: PathBuf,

        /// Number of results (default: top_k from config)
        #[arg(short = 'k', long = "top-k", allow_negative_numbers = true)]
        k: Option<i64>,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a happy/sad corpus, index it and run two example queries
    Demo {
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print a config value, or the whole file when no key is given
    Get { key: Option<String> },
    /// Set a config value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn init_logging(config: &Config) -> Result<()> {
    twyg::setup(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {e:?}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.corpus_dir {
        Some(dir) => Config::load_with_corpus_dir(dir)?,
        None => Config::load()?,
    };

    init_logging(&config)?;

    match cli.command {
        Commands::Generate {
            per_style,
            notes,
            seed,
            styles,
        } => {
            commands::run_generate(&config, per_style, notes, seed, styles)?;
        }
        Commands::Embed { file } => {
            commands::show_embedding(&file)?;
        }
        Commands::Query { file, k, json } => {
            commands::run_query(&config, &file, k, json)?;
        }
        Commands::Demo { seed } => {
            commands::run_demo(&config, seed)?;
        }
        Commands::Config { command } => match command {
            ConfigCommand::Show => commands::config::show_config(&config)?,
            ConfigCommand::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommand::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommand::Path => commands::config::show_path()?,
            ConfigCommand::Example => commands::config::show_example()?,
            ConfigCommand::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}

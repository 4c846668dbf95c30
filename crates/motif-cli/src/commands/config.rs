use anyhow::{bail, Context, Result};
use motif_etl::config::{self, CONFIG_KEYS};
use motif_etl::Config;
use toml_edit::DocumentMut;

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  corpus_dir: {}", config.corpus_dir.display());
    println!("  top_k: {}", config.top_k);
    println!("  songs_per_style: {}", config.songs_per_style);
    println!("  notes_per_song: {}", config.notes_per_song);
    println!(
        "  seed: {}",
        config.seed.map_or_else(|| String::from("<not set>"), |s| s.to_string())
    );
    println!("  logging: {:?}", config.logging);

    println!("\nPriority: CLI args > ENV vars (MOTIF_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        match key.as_str() {
            "corpus_dir" => println!("{}", config.corpus_dir.display()),
            "top_k" => println!("{}", config.top_k),
            "songs_per_style" => println!("{}", config.songs_per_style),
            "notes_per_song" => println!("{}", config.notes_per_song),
            "seed" => println!(
                "{}",
                config.seed.map_or_else(|| String::from("<not set>"), |s| s.to_string())
            ),
            _ => bail!(
                "Unknown config key: {}\n\nValid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'motif config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path)
        .context("Failed to read config file")?;
    let updated = set_value(&contents, key, value)?;

    std::fs::write(&config_path, updated)
        .context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Return `contents` with `key` set to `value`, keeping comments and layout.
fn set_value(contents: &str, key: &str, value: &str) -> Result<String> {
    let mut doc = contents
        .parse::<DocumentMut>()
        .context("Failed to parse config file")?;

    let item = match key {
        "corpus_dir" => toml_edit::value(value),
        "top_k" | "songs_per_style" | "notes_per_song" | "seed" => {
            let number: i64 = value
                .parse()
                .with_context(|| format!("{key} must be an integer, got '{value}'"))?;
            if number < 0 {
                bail!("{key} must be zero or greater, got {number}");
            }
            toml_edit::value(number)
        }
        _ => bail!(
            "Unknown config key: {}\n\nValid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        ),
    };

    doc[key] = item;
    Ok(doc.to_string())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure motif.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use crawler_core::content::placeholder_repository;
use crawler_core::{AssetRepository, GameConfig, GameRng, GeneratedLevel, generate_level};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "crawler";

/// Generates a dungeon level and prints its layout.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1)]
    level: u32,
    /// Config JSON; defaults to the per-user config file when it exists
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Asset directory; the built-in placeholder set is used when omitted
    #[arg(short, long)]
    assets: Option<PathBuf>,
    /// Print the layout as JSON instead of a text map
    #[arg(long)]
    json: bool,
    /// Write the effective config to the per-user config file
    #[arg(long)]
    save_config: bool,
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push("config.json");
        path
    })
}

fn load_config(explicit: Option<&Path>) -> Result<GameConfig> {
    if let Some(path) = explicit {
        return GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => GameConfig::load(&path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        _ => Ok(GameConfig::default()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

/// One character per grid cell, top row first: `E` entry, `X` exit, `#` room.
fn render_map(level: &GeneratedLevel) -> String {
    let layout = &level.layout;
    let mut out = String::new();
    for y in (0..layout.grid_size).rev() {
        for x in 0..layout.grid_size {
            let cell = (x, y);
            let glyph = if cell == layout.entry {
                'E'
            } else if cell == layout.exit {
                'X'
            } else if layout.room(cell).is_some() {
                '#'
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = load_config(args.config.as_deref())?;
    if args.save_config {
        let path = default_config_path().context("No config directory on this platform")?;
        config
            .write_atomic(&path)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        info!(path = %path.display(), "config_saved");
    }

    let assets = match &args.assets {
        Some(dir) => AssetRepository::load_dir(dir)
            .with_context(|| format!("Failed to load assets from {}", dir.display()))?,
        None => placeholder_repository(),
    };

    let level = generate_level(args.level, &config, &assets, GameRng::seeded(args.seed))
        .with_context(|| format!("Failed to generate level {} (seed {})", args.level, args.seed))?;

    if args.json {
        let json = serde_json::to_string_pretty(&level.layout)
            .with_context(|| "Failed to serialize layout")?;
        println!("{json}");
        return Ok(());
    }

    println!("Level {} (seed {})", level.level, args.seed);
    print!("{}", render_map(&level));
    println!("Rooms: {}", level.room_count());
    println!("Mobs: {}", level.mobs.len());
    println!("Chests: {}", level.chests.len());
    println!("Fingerprint: {:016x}", level.fingerprint());
    Ok(())
}

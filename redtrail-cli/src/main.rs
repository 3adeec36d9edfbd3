mod app;
mod menu;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{info, warn};
use redtrail_game::{GameEngine, Role};
use std::io::{stdin, stdout};
use std::path::{Path, PathBuf};

use app::App;
use storage::{FsDataLoader, FsStorage};

#[derive(Debug, Parser)]
#[command(name = "redtrail", version)]
#[command(about = "Red Trail Redemption - a turn-based survival run down a hostile trail")]
struct Args {
    /// Save file path
    #[arg(long, default_value = "redtrail-save.json")]
    save: PathBuf,

    /// Seed for the run; drawn at random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning override file (JSON; partial overrides allowed)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Character name (skips the name prompt)
    #[arg(long)]
    name: Option<String>,

    /// Character role (skips the roster prompt)
    #[arg(long, value_parser = menu::parse_role_arg)]
    role: Option<Role>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (save_dir, slot) = split_save_path(&args.save);
    let engine = GameEngine::new(FsDataLoader::new(args.config), FsStorage::new(save_dir));

    let seed = args.seed.unwrap_or_else(rand::random);
    let state = match engine.load_game(&slot) {
        Ok(Some(state)) => {
            info!("resumed save '{slot}' at event {}", state.event_count);
            println!(
                "{}",
                "Picking the trail back up where you left it.".yellow()
            );
            state
        }
        Ok(None) => engine
            .create_game(seed)
            .context("failed to load game tuning")?,
        Err(err) => {
            warn!("save '{slot}' could not be read: {err:#}");
            println!("The old save could not be read; starting fresh.");
            engine
                .create_game(seed)
                .context("failed to load game tuning")?
        }
    };

    println!("{}", "Red Trail Redemption".bright_red().bold());
    println!("{}", "====================".red());

    let mut session = App::new(engine, state, slot, args.name, args.role);
    let stdin = stdin();
    session.run(&mut stdin.lock(), &mut stdout())
}

/// Split a save file path into the storage directory and the slot name.
fn split_save_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let slot = path
        .file_stem()
        .map_or_else(|| "redtrail-save".to_string(), |stem| {
            stem.to_string_lossy().into_owned()
        });
    (dir, slot)
}

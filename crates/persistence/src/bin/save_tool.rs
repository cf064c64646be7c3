#![deny(warnings)]

//! Inspect, validate or reset a clicker save file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use clicker_core::{GameState, Purchasable};
use persistence::{default_save_path, SaveRecord, SaveStore};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "save-tool", about = "Inspect or repair a clicker save file")]
struct Args {
    /// Save file to operate on.
    #[arg(long, default_value_os_t = default_save_path())]
    path: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of the save.
    Show,
    /// Exit non-zero if the save is corrupt.
    Check,
    /// Overwrite the save with a fresh game.
    Reset,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let store = SaveStore::new(&args.path);
    match args.command {
        Command::Show => {
            let bytes = std::fs::read(store.path())?;
            let record = SaveRecord::decode(&bytes)?;
            let saved_at = record
                .saved_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string());
            let state = record.into_state()?;
            println!("save: {} (saved at {})", store.path().display(), saved_at);
            print_state(&state);
        }
        Command::Check => match store.load()? {
            Some(_) => println!("OK: {}", store.path().display()),
            None => anyhow::bail!("no save file at {}", store.path().display()),
        },
        Command::Reset => {
            store.save(&GameState::new())?;
            info!(path = %store.path().display(), "save reset to a new game");
        }
    }
    Ok(())
}

fn print_state(state: &GameState) {
    println!(
        "clicks: {} | money: ${} | per click: ${}",
        state.clicks(),
        state.currency(),
        state.currency_per_click()
    );
    println!(
        "upgrade: level {}/{} | autoclicker: {}",
        state.upgrade().level(),
        state.upgrade().max_level(),
        state.auto_producer().display_label()
    );
}

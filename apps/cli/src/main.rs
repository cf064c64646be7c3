#![deny(warnings)]

//! Terminal front-end: restores the save, plays the game from stdin
//! commands and saves on exit.

mod config;

use anyhow::Result;
use clap::Parser;
use clicker_core::{new_game, GameState};
use clicker_runtime::{Controller, GameEvent, Intent, ProductionSource, Snapshot, Update};
use config::AppConfig;
use persistence::{LoadOutcome, Restored, SaveStore};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "commands: [enter]/c = click, u = buy upgrade, a = buy autoclicker, n = new game, h = help, q = quit";

#[derive(Parser, Debug)]
#[command(name = "clicker", about = "A minimal incremental clicker game")]
struct Args {
    /// YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Save file location, overrides the config.
    #[arg(long)]
    save: Option<PathBuf>,
    /// Ignore any existing save and start over.
    #[arg(long)]
    new_game: bool,
    /// Do not write the save on exit.
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Play(Intent),
    Help,
}

fn parse_command(line: &str) -> Option<Command> {
    let cmd = match line.trim().to_ascii_lowercase().as_str() {
        "" | "c" | "click" => Command::Play(Intent::Click),
        "u" | "upgrade" => Command::Play(Intent::BuyUpgrade),
        "a" | "auto" | "autoclicker" => Command::Play(Intent::BuyAutoProducer),
        "n" | "new" => Command::Play(Intent::NewGame),
        "q" | "quit" | "exit" => Command::Play(Intent::Shutdown),
        "h" | "help" | "?" => Command::Help,
        _ => return None,
    };
    Some(cmd)
}

fn render(s: &Snapshot) -> String {
    format!(
        "Clicks: {} | Money: ${} | Per click: ${} | [{}] [{}]",
        s.clicks, s.currency, s.currency_per_click, s.upgrade_label, s.autoclicker_label
    )
}

fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::Produced {
            amount,
            source: ProductionSource::Manual,
        } => Some(format!("Damage: ${amount}")),
        GameEvent::Produced {
            amount,
            source: ProductionSource::Auto,
        } => Some(format!("Auto: ${amount}")),
        GameEvent::UpgradePurchased { delta, level } => {
            Some(format!("Upgrade level {level} (+${delta} per click)"))
        }
        GameEvent::AutoProducerActivated => Some("Autoclicker activated".to_string()),
        GameEvent::GameReset => Some("New game started".to_string()),
        GameEvent::PurchaseDeclined { .. } => None,
    }
}

async fn view_loop(mut updates: mpsc::UnboundedReceiver<Update>) {
    while let Some(update) = updates.recv().await {
        match describe(&update.event) {
            Some(note) => println!("{note} | {}", render(&update.snapshot)),
            None => println!("{}", render(&update.snapshot)),
        }
    }
}

async fn input_loop(intents: mpsc::Sender<Intent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };
        match parse_command(&line) {
            Some(Command::Play(intent)) => {
                if intents.send(intent).await.is_err() || intent == Intent::Shutdown {
                    return;
                }
            }
            Some(Command::Help) => println!("{HELP}"),
            None => println!("unknown command {:?}; {HELP}", line.trim()),
        }
    }
    let _ = intents.send(Intent::Shutdown).await;
}

async fn play(state: GameState, cfg: &AppConfig) -> Result<GameState> {
    let controller = Controller::new(state, cfg.game.clone(), cfg.tick_period())?;
    println!("{}", render(&controller.snapshot()));
    println!("{HELP}");

    let (intent_tx, intent_rx) = mpsc::channel(64);
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let view = tokio::spawn(view_loop(update_rx));
    let input = tokio::spawn(input_loop(intent_tx.clone()));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = intent_tx.send(Intent::Shutdown).await;
        }
    });

    let state = controller.run(intent_rx, update_tx).await;
    if let Err(e) = view.await {
        warn!(error = %e, "view task failed");
    }
    input.abort();
    Ok(state)
}

fn restore(store: &SaveStore, cfg: &AppConfig, fresh: bool) -> Result<GameState> {
    if fresh {
        info!("starting a new game, existing save ignored");
        return Ok(new_game(&cfg.game)?);
    }
    let Restored { state, outcome } = store.load_or_recover(&cfg.game)?;
    if let LoadOutcome::Recovered { reason, backup } = outcome {
        eprintln!("Warning: your save was corrupted, resetting to default state ({reason}).");
        if let Some(backup) = backup {
            eprintln!("The corrupted save was kept at {}", backup.display());
        }
    }
    Ok(state)
}

/// Best-effort save on exit. A failed write is logged, never fatal.
/// Returns whether the save was written.
fn finish(store: &SaveStore, state: &GameState, no_save: bool) -> bool {
    if no_save {
        info!("exiting without saving");
        return false;
    }
    match store.save(state) {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "error saving game state");
            false
        }
    }
}

fn main() -> Result<()> {
    // Logging setup; stdout is reserved for the game itself.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(save) = args.save {
        cfg.save_path = save;
    }
    info!(save = %cfg.save_path.display(), tick_ms = cfg.tick_period_ms, "starting clicker");

    let store = SaveStore::new(&cfg.save_path);
    let state = restore(&store, &cfg, args.new_game)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let final_state = rt.block_on(play(state, &cfg));
    // stdin may still be blocked in a read; don't wait for it.
    rt.shutdown_background();

    finish(&store, &final_state?, args.no_save);
    Ok(())
}

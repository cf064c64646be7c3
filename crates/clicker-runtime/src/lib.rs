#![deny(warnings)]

//! Controller for the clicker game.
//!
//! The [`Controller`] owns the [`GameState`] and applies user intents and
//! autoclicker ticks one at a time from a single event loop, so the state
//! never needs a lock.

mod timer;

pub use timer::{AutoclickTimer, DEFAULT_TICK_PERIOD};

use clicker_core::{
    validate_config, GameConfig, GameState, Purchasable, PurchaseEffect, ShopItem, ValidationError,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Something the player asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// One manual click.
    Click,
    /// Buy the next upgrade level.
    BuyUpgrade,
    /// Buy the autoclicker.
    BuyAutoProducer,
    /// Discard progress and start over.
    NewGame,
    /// Stop the event loop.
    Shutdown,
}

/// Where produced currency came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductionSource {
    /// The player clicked.
    Manual,
    /// The autoclicker ticked.
    Auto,
}

/// Outcome of a handled intent or tick, for the view to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Currency was earned by a click or a tick.
    Produced { amount: u64, source: ProductionSource },
    /// An upgrade level was bought; `level` is the new level.
    UpgradePurchased { delta: u64, level: u32 },
    /// The autoclicker was bought and its timer armed.
    AutoProducerActivated,
    /// A purchase was refused; nothing changed.
    PurchaseDeclined { item: ShopItem },
    /// Progress was discarded for a new game.
    GameReset,
}

/// Display fields of a [`GameState`] at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub clicks: u64,
    pub currency: u64,
    pub currency_per_click: u64,
    pub upgrade_level: u32,
    pub upgrade_max_level: u32,
    pub upgrade_cost: u64,
    pub upgrade_maxed: bool,
    pub upgrade_label: String,
    pub autoclicker_active: bool,
    pub autoclicker_cost: u64,
    pub autoclicker_label: String,
}

impl From<&GameState> for Snapshot {
    fn from(s: &GameState) -> Self {
        let upgrade = s.upgrade();
        let auto = s.auto_producer();
        Self {
            clicks: s.clicks(),
            currency: s.currency(),
            currency_per_click: s.currency_per_click(),
            upgrade_level: upgrade.level(),
            upgrade_max_level: upgrade.max_level(),
            upgrade_cost: upgrade.cost(),
            upgrade_maxed: upgrade.is_maxed(),
            upgrade_label: upgrade.display_label(),
            autoclicker_active: auto.is_active(),
            autoclicker_cost: auto.cost(),
            autoclicker_label: auto.display_label(),
        }
    }
}

/// An event together with the state it left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub event: GameEvent,
    pub snapshot: Snapshot,
}

/// Owns the game state and the autoclicker schedule.
pub struct Controller {
    state: GameState,
    config: GameConfig,
    timer: AutoclickTimer,
}

impl Controller {
    /// Wrap a state. A state whose autoclicker is already active starts
    /// ticking right away. `config` is used for every new game and must
    /// pass [`validate_config`].
    pub fn new(
        state: GameState,
        config: GameConfig,
        tick_period: Duration,
    ) -> Result<Self, ValidationError> {
        validate_config(&config)?;
        let mut timer = AutoclickTimer::new(tick_period);
        if state.auto_producer().is_active() {
            info!("autoclicker restored as active");
            timer.arm();
        }
        Ok(Self {
            state,
            config,
            timer,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    pub fn autoclicker_running(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Apply one intent. `Shutdown` is a no-op here; it only stops [`run`](Self::run).
    pub fn handle(&mut self, intent: Intent) -> Vec<GameEvent> {
        match intent {
            Intent::Click => vec![GameEvent::Produced {
                amount: self.state.register_click(),
                source: ProductionSource::Manual,
            }],
            Intent::BuyUpgrade => vec![self.buy(ShopItem::Upgrade)],
            Intent::BuyAutoProducer => vec![self.buy(ShopItem::AutoProducer)],
            Intent::NewGame => {
                if let Err(e) = self.state.reset_with(&self.config) {
                    warn!(error = %e, "new game refused, keeping current game");
                    return Vec::new();
                }
                self.timer.disarm();
                info!("new game started");
                vec![GameEvent::GameReset]
            }
            Intent::Shutdown => Vec::new(),
        }
    }

    /// One autoclicker production step.
    pub fn auto_tick(&mut self) -> GameEvent {
        GameEvent::Produced {
            amount: self.state.register_click(),
            source: ProductionSource::Auto,
        }
    }

    fn buy(&mut self, item: ShopItem) -> GameEvent {
        match self.state.purchase(item) {
            PurchaseEffect::YieldIncrease(delta) => GameEvent::UpgradePurchased {
                delta,
                level: self.state.upgrade().level(),
            },
            PurchaseEffect::AutoProducerActivated => {
                info!(period = ?self.timer.period(), "autoclicker activated");
                self.timer.arm();
                GameEvent::AutoProducerActivated
            }
            PurchaseEffect::None => {
                debug!(%item, currency = self.state.currency(), "purchase declined");
                GameEvent::PurchaseDeclined { item }
            }
        }
    }

    /// Event loop. Runs until `Shutdown` arrives or every intent sender is
    /// dropped, then returns the final state. The autoclicker timer is
    /// cancelled when the loop ends.
    pub async fn run(
        mut self,
        mut intents: mpsc::Receiver<Intent>,
        updates: mpsc::UnboundedSender<Update>,
    ) -> GameState {
        loop {
            let events = tokio::select! {
                intent = intents.recv() => match intent {
                    Some(Intent::Shutdown) | None => break,
                    Some(intent) => self.handle(intent),
                },
                _ = self.timer.tick() => vec![self.auto_tick()],
            };
            for event in events {
                let update = Update {
                    event,
                    snapshot: self.snapshot(),
                };
                if updates.send(update).is_err() {
                    debug!("update channel closed (view dropped)");
                }
            }
        }
        info!(
            clicks = self.state.clicks(),
            currency = self.state.currency(),
            "controller stopped"
        );
        self.state
    }
}

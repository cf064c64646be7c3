//! The aggregate game state and the operations that mutate it.

use crate::shop::{
    AutoProducer, Purchasable, PurchaseEffect, ShopItem, Upgrade, DEFAULT_AUTOCLICKER_COST,
    DEFAULT_UPGRADE_COST, DEFAULT_UPGRADE_INCREMENT, DEFAULT_UPGRADE_MAX_LEVEL,
};
use crate::{validate_config, validate_state, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Starting parameters for a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Price of every upgrade level.
    pub upgrade_cost: u64,
    /// Yield added per upgrade level (> 0).
    pub upgrade_increment: u64,
    /// Number of upgrade levels (> 0).
    pub upgrade_max_level: u32,
    /// Price of the autoclicker.
    pub autoclicker_cost: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            upgrade_cost: DEFAULT_UPGRADE_COST,
            upgrade_increment: DEFAULT_UPGRADE_INCREMENT,
            upgrade_max_level: DEFAULT_UPGRADE_MAX_LEVEL,
            autoclicker_cost: DEFAULT_AUTOCLICKER_COST,
        }
    }
}

/// All mutable progress of one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    clicks: u64,
    currency: u64,
    currency_per_click: u64,
    upgrade: Upgrade,
    auto_producer: AutoProducer,
}

/// Start a new game from the given parameters.
///
/// Fails when the parameters could never produce a valid, saveable state.
pub fn new_game(cfg: &GameConfig) -> Result<GameState, ValidationError> {
    let mut state = GameState::new();
    state.reset_with(cfg)?;
    Ok(state)
}

impl GameState {
    /// A new game with default parameters.
    pub fn new() -> Self {
        Self {
            clicks: 0,
            currency: 0,
            currency_per_click: 1,
            upgrade: Upgrade::default(),
            auto_producer: AutoProducer::default(),
        }
    }

    /// Rebuild a state from stored parts, rejecting anything that breaks
    /// the state invariants.
    pub fn from_parts(
        clicks: u64,
        currency: u64,
        currency_per_click: u64,
        upgrade: Upgrade,
        auto_producer: AutoProducer,
    ) -> Result<Self, ValidationError> {
        let state = Self {
            clicks,
            currency,
            currency_per_click,
            upgrade,
            auto_producer,
        };
        validate_state(&state)?;
        Ok(state)
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    pub fn currency(&self) -> u64 {
        self.currency
    }

    pub fn currency_per_click(&self) -> u64 {
        self.currency_per_click
    }

    pub fn upgrade(&self) -> &Upgrade {
        &self.upgrade
    }

    pub fn auto_producer(&self) -> &AutoProducer {
        &self.auto_producer
    }

    /// Produce one click's worth of currency. Used for both manual clicks
    /// and autoclicker ticks. Returns the amount produced.
    pub fn register_click(&mut self) -> u64 {
        self.clicks = self.clicks.saturating_add(1);
        self.currency = self.currency.saturating_add(self.currency_per_click);
        self.currency_per_click
    }

    /// Try to buy one upgrade level. Returns the yield delta applied,
    /// 0 when the purchase was declined.
    pub fn purchase_upgrade(&mut self) -> u64 {
        let (balance, effect) = self.upgrade.purchase(self.currency);
        self.currency = balance;
        let delta = effect.yield_delta();
        if delta > 0 {
            self.currency_per_click = self.currency_per_click.saturating_add(delta);
            debug!(
                level = self.upgrade.level(),
                per_click = self.currency_per_click,
                "upgrade purchased"
            );
        }
        delta
    }

    /// Try to buy the autoclicker. Returns whether it is active afterwards.
    pub fn purchase_auto_producer(&mut self) -> bool {
        let (balance, effect) = self.auto_producer.purchase(self.currency);
        self.currency = balance;
        if effect == PurchaseEffect::AutoProducerActivated {
            debug!(currency = self.currency, "autoclicker purchased");
        }
        self.auto_producer.is_active()
    }

    /// Buy whichever item `item` names.
    pub fn purchase(&mut self, item: ShopItem) -> PurchaseEffect {
        match item {
            ShopItem::Upgrade => match self.purchase_upgrade() {
                0 => PurchaseEffect::None,
                d => PurchaseEffect::YieldIncrease(d),
            },
            ShopItem::AutoProducer => {
                let was_active = self.auto_producer.is_active();
                if self.purchase_auto_producer() && !was_active {
                    PurchaseEffect::AutoProducerActivated
                } else {
                    PurchaseEffect::None
                }
            }
        }
    }

    /// Look up a shop item by slot.
    pub fn item(&self, item: ShopItem) -> &dyn Purchasable {
        match item {
            ShopItem::Upgrade => &self.upgrade,
            ShopItem::AutoProducer => &self.auto_producer,
        }
    }

    /// Every shop item in display order.
    pub fn shop(&self) -> impl Iterator<Item = (ShopItem, &dyn Purchasable)> + '_ {
        ShopItem::ALL.into_iter().map(move |i| (i, self.item(i)))
    }

    /// Back to a fresh game with default parameters.
    pub fn reset(&mut self) {
        self.apply_config(&GameConfig::default());
    }

    /// Back to a fresh game with the given parameters. An invalid config
    /// leaves the state untouched.
    pub fn reset_with(&mut self, cfg: &GameConfig) -> Result<(), ValidationError> {
        validate_config(cfg)?;
        self.apply_config(cfg);
        Ok(())
    }

    fn apply_config(&mut self, cfg: &GameConfig) {
        self.clicks = 0;
        self.currency = 0;
        self.currency_per_click = 1;
        self.upgrade = Upgrade::new(
            cfg.upgrade_cost,
            cfg.upgrade_increment,
            cfg.upgrade_max_level,
        );
        self.auto_producer = AutoProducer::new(cfg.autoclicker_cost);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#![deny(warnings)]

//! Core game-state engine for the clicker game.
//!
//! This crate defines the purchasable shop items, the aggregate
//! [`GameState`] and validation helpers that guard the invariants every
//! loaded or configured state must satisfy.

mod shop;
mod state;

pub use shop::{AutoProducer, PurchaseEffect, Purchasable, ShopItem, Upgrade};
pub use state::{new_game, GameConfig, GameState};

use thiserror::Error;

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Per-click yield must be at least 1.
    #[error("currency per click must be >= 1")]
    ZeroYield,
    /// An upgrade must raise the yield by a positive amount.
    #[error("upgrade increment per level must be > 0")]
    ZeroIncrement,
    /// An upgrade must have at least one level.
    #[error("upgrade max level must be > 0")]
    ZeroMaxLevel,
    /// Upgrade level exceeds its ceiling.
    #[error("upgrade level {level} exceeds max level {max_level}")]
    LevelAboveMax { level: u32, max_level: u32 },
}

/// Validate an upgrade's parameters and level.
pub fn validate_upgrade(u: &Upgrade) -> Result<(), ValidationError> {
    if u.increment_per_level() == 0 {
        return Err(ValidationError::ZeroIncrement);
    }
    if u.max_level() == 0 {
        return Err(ValidationError::ZeroMaxLevel);
    }
    if u.level() > u.max_level() {
        return Err(ValidationError::LevelAboveMax {
            level: u.level(),
            max_level: u.max_level(),
        });
    }
    Ok(())
}

/// Validate starting parameters before any state is built from them.
pub fn validate_config(cfg: &GameConfig) -> Result<(), ValidationError> {
    if cfg.upgrade_increment == 0 {
        return Err(ValidationError::ZeroIncrement);
    }
    if cfg.upgrade_max_level == 0 {
        return Err(ValidationError::ZeroMaxLevel);
    }
    Ok(())
}

/// Validate a whole game state, including its shop items.
pub fn validate_state(state: &GameState) -> Result<(), ValidationError> {
    if state.currency_per_click() == 0 {
        return Err(ValidationError::ZeroYield);
    }
    validate_upgrade(state.upgrade())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_valid() {
        validate_state(&GameState::new()).unwrap();
        validate_config(&GameConfig::default()).unwrap();
    }

    #[test]
    fn config_rejects_degenerate_upgrade() {
        let cfg = GameConfig {
            upgrade_increment: 0,
            ..GameConfig::default()
        };
        assert_eq!(validate_config(&cfg), Err(ValidationError::ZeroIncrement));
        let cfg = GameConfig {
            upgrade_max_level: 0,
            ..GameConfig::default()
        };
        assert_eq!(validate_config(&cfg), Err(ValidationError::ZeroMaxLevel));
    }

    #[test]
    fn upgrade_level_above_max_is_rejected() {
        let u = Upgrade::restore(10, 1, 11, 10);
        assert_eq!(
            validate_upgrade(&u),
            Err(ValidationError::LevelAboveMax {
                level: 11,
                max_level: 10
            })
        );
    }

    #[test]
    fn zero_yield_state_is_rejected() {
        let state = GameState::from_parts(
            0,
            0,
            0,
            Upgrade::default(),
            AutoProducer::default(),
        );
        assert_eq!(state, Err(ValidationError::ZeroYield));
    }
}

//! Serialized snapshot of a [`GameState`].
//!
//! The record types are kept separate from the core types so the on-disk
//! layout can evolve on its own. Every record carries a `version`; readers
//! accept anything in `MIN_COMPATIBLE_VERSION..=SAVE_FORMAT_VERSION`.

use chrono::{DateTime, Utc};
use clicker_core::{AutoProducer, GameState, Purchasable, Upgrade};
use serde::{Deserialize, Serialize};

use crate::{CorruptionError, SaveError};

/// Current save format version. Bump when fields are added.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Oldest version that can still be read. Bump only on breaking changes.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Stored form of the per-click upgrade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRecord {
    /// Price of one level.
    pub cost: u64,
    /// Yield added per level.
    pub increment_per_level: u64,
    /// Levels bought so far.
    pub level: u32,
    /// Levels available in total.
    pub max_level: u32,
}

/// Stored form of the autoclicker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoProducerRecord {
    /// Purchase price.
    pub cost: u64,
    /// Whether it has been bought.
    pub active: bool,
}

/// One complete save file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    /// When the snapshot was taken. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    pub clicks: u64,
    pub currency: u64,
    pub currency_per_click: u64,
    pub upgrade: UpgradeRecord,
    pub auto_producer: AutoProducerRecord,
}

/// Read just enough to decide whether the rest is worth parsing.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl SaveRecord {
    /// Snapshot a state, stamped with the current format version.
    pub fn capture(state: &GameState) -> Self {
        let upgrade = state.upgrade();
        let auto = state.auto_producer();
        Self {
            version: SAVE_FORMAT_VERSION,
            saved_at: Some(Utc::now()),
            clicks: state.clicks(),
            currency: state.currency(),
            currency_per_click: state.currency_per_click(),
            upgrade: UpgradeRecord {
                cost: upgrade.cost(),
                increment_per_level: upgrade.increment_per_level(),
                level: upgrade.level(),
                max_level: upgrade.max_level(),
            },
            auto_producer: AutoProducerRecord {
                cost: auto.cost(),
                active: auto.is_active(),
            },
        }
    }

    /// Rebuild the game state, validating every field.
    pub fn into_state(self) -> Result<GameState, CorruptionError> {
        check_version(self.version)?;
        let upgrade = Upgrade::restore(
            self.upgrade.cost,
            self.upgrade.increment_per_level,
            self.upgrade.level,
            self.upgrade.max_level,
        );
        let auto = AutoProducer::restore(self.auto_producer.cost, self.auto_producer.active);
        let state = GameState::from_parts(
            self.clicks,
            self.currency,
            self.currency_per_click,
            upgrade,
            auto,
        )?;
        Ok(state)
    }

    /// Parse a record from raw bytes without converting it to a state.
    pub fn decode(bytes: &[u8]) -> Result<Self, CorruptionError> {
        let probe: VersionProbe = serde_json::from_slice(bytes)?;
        check_version(probe.version)?;
        Ok(serde_json::from_slice(bytes)?)
    }
}

fn check_version(found: u32) -> Result<(), CorruptionError> {
    if !(MIN_COMPATIBLE_VERSION..=SAVE_FORMAT_VERSION).contains(&found) {
        return Err(CorruptionError::UnsupportedVersion {
            found,
            min: MIN_COMPATIBLE_VERSION,
            max: SAVE_FORMAT_VERSION,
        });
    }
    Ok(())
}

/// Decode a save into a game state.
pub fn load_game(bytes: &[u8]) -> Result<GameState, CorruptionError> {
    SaveRecord::decode(bytes)?.into_state()
}

/// Encode a game state as pretty-printed JSON.
pub fn encode_game(state: &GameState) -> Result<Vec<u8>, SaveError> {
    Ok(serde_json::to_vec_pretty(&SaveRecord::capture(state))?)
}

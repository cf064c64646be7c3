#![deny(warnings)]

//! Persistence layer: versioned JSON save records, the on-disk save store
//! and recovery from corrupted saves.

mod record;
mod store;

pub use record::{
    encode_game, load_game, AutoProducerRecord, SaveRecord, UpgradeRecord,
    MIN_COMPATIBLE_VERSION, SAVE_FORMAT_VERSION,
};
pub use store::{default_save_path, LoadOutcome, Restored, SaveStore, SAVE_DIR, SAVE_FILE};

use clicker_core::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Save data that cannot be turned back into a game state.
#[derive(Debug, Error)]
pub enum CorruptionError {
    /// The file exists but could not be read.
    #[error("save file unreadable: {0}")]
    Unreadable(#[from] std::io::Error),
    /// Bytes are not a well-formed save record.
    #[error("malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Record was written by an incompatible format version.
    #[error("unsupported save version {found} (supported {min}..={max})")]
    UnsupportedVersion { found: u32, min: u32, max: u32 },
    /// Record parsed but breaks game invariants.
    #[error("invalid save contents: {0}")]
    Invalid(#[from] ValidationError),
}

/// Failure to write a save.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save file or its directory could not be written.
    #[error("failed to write save file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The state could not be serialized.
    #[error("failed to encode save data: {0}")]
    Encode(#[from] serde_json::Error),
}

//! File-backed save slot with corruption recovery.

use clicker_core::{new_game, GameConfig, GameState, ValidationError};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::record::{encode_game, load_game};
use crate::{CorruptionError, SaveError};

/// Directory of the default save, relative to the working directory.
pub const SAVE_DIR: &str = "save";
/// File name of the default save.
pub const SAVE_FILE: &str = "game_state.json";

/// Returns the default save location, relative to the working directory.
pub fn default_save_path() -> PathBuf {
    Path::new(SAVE_DIR).join(SAVE_FILE)
}

/// How the startup state was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The save file was read successfully.
    Loaded,
    /// No save file exists yet.
    Missing,
    /// The save was corrupt and a fresh game was started instead.
    Recovered {
        /// Why the save was rejected.
        reason: String,
        /// Where the corrupt file was moved, if the move succeeded.
        backup: Option<PathBuf>,
    },
}

/// A state ready to play together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Restored {
    /// The state to play.
    pub state: GameState,
    /// Where `state` came from.
    pub outcome: LoadOutcome,
}

/// A single save file that is overwritten wholesale on every save.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    /// A store for the save file at `path`. Nothing is touched until the
    /// first load or save.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location a corrupt save is moved to: the save path with `.bak` appended.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Read the save. `Ok(None)` when there is no save file.
    pub fn load(&self) -> Result<Option<GameState>, CorruptionError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CorruptionError::Unreadable(e)),
        };
        load_game(&bytes).map(Some)
    }

    /// Write the save, creating its directory if needed.
    pub fn save(&self, state: &GameState) -> Result<(), SaveError> {
        let bytes = encode_game(state)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SaveError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(&self.path, bytes).map_err(|source| SaveError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "game state saved");
        Ok(())
    }

    /// Move a corrupt save out of the way. Falls back to deleting it when
    /// the rename fails. Returns the backup location on success.
    pub fn quarantine(&self) -> Option<PathBuf> {
        let backup = self.backup_path();
        match fs::rename(&self.path, &backup) {
            Ok(()) => {
                warn!(backup = %backup.display(), "corrupt save moved aside");
                Some(backup)
            }
            Err(e) => {
                warn!(error = %e, "could not back up corrupt save, removing it");
                if let Err(e) = fs::remove_file(&self.path) {
                    if e.kind() != ErrorKind::NotFound {
                        error!(path = %self.path.display(), error = %e, "failed to remove corrupt save");
                    }
                }
                None
            }
        }
    }

    /// Load the save, falling back to a fresh game from `cfg` when it is
    /// missing or corrupt. Only an unusable `cfg` is an error; it is checked
    /// before the save is touched.
    pub fn load_or_recover(&self, cfg: &GameConfig) -> Result<Restored, ValidationError> {
        let fresh = new_game(cfg)?;
        let restored = match self.load() {
            Ok(Some(state)) => {
                info!(path = %self.path.display(), "game state loaded");
                Restored {
                    state,
                    outcome: LoadOutcome::Loaded,
                }
            }
            Ok(None) => {
                info!(path = %self.path.display(), "no save file found, starting a new game");
                Restored {
                    state: fresh,
                    outcome: LoadOutcome::Missing,
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "save corrupted, resetting to default state");
                let backup = self.quarantine();
                Restored {
                    state: fresh,
                    outcome: LoadOutcome::Recovered {
                        reason: e.to_string(),
                        backup,
                    },
                }
            }
        };
        Ok(restored)
    }
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::new(default_save_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::{ShopItem, Upgrade};
    use tempfile::TempDir;

    fn setup() -> (TempDir, SaveStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SaveStore::new(temp_dir.path().join(SAVE_DIR).join(SAVE_FILE));
        (temp_dir, store)
    }

    fn played() -> GameState {
        let mut state = GameState::new();
        for _ in 0..30 {
            state.register_click();
        }
        state.purchase(ShopItem::Upgrade);
        state
    }

    #[test]
    fn default_path_is_under_save_dir() {
        assert_eq!(default_save_path(), PathBuf::from("save/game_state.json"));
        assert_eq!(
            SaveStore::default().backup_path(),
            PathBuf::from("save/game_state.json.bak")
        );
    }

    #[test]
    fn save_then_load() {
        let (_temp, store) = setup();
        let state = played();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state.clone()));

        let restored = store.load_or_recover(&GameConfig::default()).unwrap();
        assert_eq!(restored.outcome, LoadOutcome::Loaded);
        assert_eq!(restored.state, state);
    }

    #[test]
    fn save_overwrites_previous() {
        let (_temp, store) = setup();
        store.save(&played()).unwrap();
        let fresh = GameState::new();
        store.save(&fresh).unwrap();
        assert_eq!(store.load().unwrap(), Some(fresh));
    }

    #[test]
    fn missing_save_starts_fresh_game() {
        let (_temp, store) = setup();
        assert_eq!(store.load().unwrap(), None);
        let cfg = GameConfig {
            upgrade_cost: 25,
            ..GameConfig::default()
        };
        let restored = store.load_or_recover(&cfg).unwrap();
        assert_eq!(restored.outcome, LoadOutcome::Missing);
        assert_eq!(restored.state, new_game(&cfg).unwrap());
    }

    #[test]
    fn corrupt_save_is_backed_up_and_reset() {
        let (_temp, store) = setup();
        store.save(&played()).unwrap();
        fs::write(store.path(), b"\x80\x04\x95 not a save").unwrap();

        let restored = store.load_or_recover(&GameConfig::default()).unwrap();
        assert_eq!(restored.state, GameState::new());
        assert_eq!(restored.state.upgrade(), &Upgrade::default());
        match restored.outcome {
            LoadOutcome::Recovered { reason, backup } => {
                assert!(reason.contains("malformed"));
                let backup = backup.unwrap();
                assert_eq!(backup, store.backup_path());
                assert_eq!(fs::read(&backup).unwrap(), b"\x80\x04\x95 not a save");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn invalid_contents_count_as_corruption() {
        let (_temp, store) = setup();
        store.save(&GameState::new()).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        fs::write(store.path(), text.replace("\"level\": 0", "\"level\": 99")).unwrap();
        assert!(matches!(store.load(), Err(CorruptionError::Invalid(_))));
        let restored = store.load_or_recover(&GameConfig::default()).unwrap();
        assert!(matches!(restored.outcome, LoadOutcome::Recovered { .. }));
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"file").unwrap();
        let store = SaveStore::new(blocker.join("game_state.json"));
        assert!(matches!(
            store.save(&GameState::new()),
            Err(SaveError::Io { .. })
        ));
    }

    #[test]
    fn unusable_config_leaves_save_alone() {
        let (_temp, store) = setup();
        let state = played();
        store.save(&state).unwrap();
        let bad = GameConfig {
            upgrade_max_level: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            store.load_or_recover(&bad),
            Err(ValidationError::ZeroMaxLevel)
        ));
        assert_eq!(store.load().unwrap(), Some(state));
        assert!(!store.backup_path().exists());
    }
}

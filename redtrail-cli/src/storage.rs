//! Filesystem implementations of the core persistence seams.
//!
//! Saves are written to a temp file and renamed into place, so an
//! interrupted write never truncates the save it replaces.

use log::debug;
use redtrail_game::{ConfigError, DataLoader, GameConfig, GameState, GameStorage};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Loads tuning from an override file, or falls back to the built-ins.
pub struct FsDataLoader {
    config_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum FsDataError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tuning rejected: {0}")]
    Invalid(#[from] ConfigError),
}

impl FsDataLoader {
    #[must_use]
    pub const fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }
}

impl DataLoader for FsDataLoader {
    type Error = FsDataError;

    fn load_game_config(&self) -> Result<GameConfig, Self::Error> {
        let Some(path) = &self.config_path else {
            return Ok(GameConfig::default_config());
        };
        let json = fs::read_to_string(path)?;
        let config = GameConfig::from_json(&json)?;
        config.validate()?;
        debug!("loaded tuning override from {}", path.display());
        Ok(config)
    }
}

/// JSON save files under one directory, one file per slot.
pub struct FsStorage {
    dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum FsStorageError {
    #[error("save I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FsStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, save_name: &str) -> PathBuf {
        self.dir.join(format!("{save_name}.json"))
    }
}

impl GameStorage for FsStorage {
    type Error = FsStorageError;

    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(save_name);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(game_state)?;

        let mut file = fs::File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &path)?;
        debug!("saved '{save_name}' to {}", path.display());
        Ok(())
    }

    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
        let path = self.slot_path(save_name);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.slot_path(save_name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redtrail_game::{GamePhase, Role};
    use tempfile::tempdir;

    fn sample_state() -> GameState {
        let mut state = GameState::default().with_seed(7, GameConfig::default_config());
        state.start_character_creation();
        state.create_character("Moss", Role::Mage);
        state
    }

    #[test]
    fn save_then_load_round_trips_the_serialized_fields() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let state = sample_state();

        storage.save_game("trail", &state).unwrap();
        let loaded = storage.load_game("trail").unwrap().expect("save exists");

        let before = state.character.as_ref().unwrap();
        let after = loaded.character.as_ref().unwrap();
        assert_eq!(after.name, before.name);
        assert_eq!(after.role, before.role);
        assert_eq!(after.resources, before.resources);
        assert_eq!(loaded.phase, GamePhase::Playing);
        assert_eq!(loaded.seed, 7);

        // runtime pieces are never persisted
        assert!(loaded.rng.is_none());
        assert!(loaded.deck.is_none());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        storage.save_game("trail", &sample_state()).unwrap();

        assert!(dir.path().join("trail.json").exists());
        assert!(!dir.path().join("trail.json.tmp").exists());
    }

    #[test]
    fn missing_save_is_none_not_an_error() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        assert!(storage.load_game("nothing").unwrap().is_none());
    }

    #[test]
    fn malformed_save_surfaces_a_json_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("trail.json"), "{ not json").unwrap();

        let storage = FsStorage::new(dir.path());
        let err = storage.load_game("trail").unwrap_err();
        assert!(matches!(err, FsStorageError::Json(_)));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        storage.save_game("trail", &sample_state()).unwrap();

        storage.delete_save("trail").unwrap();
        assert!(storage.load_game("trail").unwrap().is_none());
        storage.delete_save("trail").unwrap();
    }

    #[test]
    fn loader_without_override_uses_builtin_tuning() {
        let loader = FsDataLoader::new(None);
        let config = loader.load_game_config().unwrap();
        assert_eq!(config, GameConfig::default_config());
    }

    #[test]
    fn loader_reads_a_partial_override_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        fs::write(&path, r#"{ "rounds_to_win": 12 }"#).unwrap();

        let loader = FsDataLoader::new(Some(path));
        let config = loader.load_game_config().unwrap();
        assert_eq!(config.rounds_to_win, 12);
        assert_eq!(config.start.food, 10);
    }

    #[test]
    fn loader_rejects_invalid_tuning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        fs::write(&path, r#"{ "events": { "hunt": { "hit_rate": 1.5 } } }"#).unwrap();

        let loader = FsDataLoader::new(Some(path));
        let err = loader.load_game_config().unwrap_err();
        assert!(matches!(err, FsDataError::Invalid(_)));
    }

    #[test]
    fn loader_reports_missing_override_as_io() {
        let loader = FsDataLoader::new(Some(PathBuf::from("/no/such/tuning.json")));
        let err = loader.load_game_config().unwrap_err();
        assert!(matches!(err, FsDataError::Io(_)));
    }
}

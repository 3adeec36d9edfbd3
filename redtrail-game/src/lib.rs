//! Red Trail Redemption Game Engine
//!
//! Platform-agnostic core logic for the Red Trail Redemption survival game.
//! This crate provides all game mechanics without UI or platform-specific
//! dependencies.

pub mod character;
pub mod config;
pub mod constants;
pub mod events;
pub mod resolve;
pub mod resources;
pub mod state;
pub mod summary;

// Re-export commonly used types
pub use character::{Abilities, AbilityTier, Character, Role};
pub use config::{
    AmountRange, BanditTuning, ChestTuning, ConfigError, EventTable, GameConfig, HuntTuning,
    IllnessTuning, StartTuning, StrangerTuning,
};
pub use events::{Event, EventDeck, EventKind, pick_event};
pub use resolve::{Decision, EventOutcome, RngRolls, RollSource, ScriptedRolls, resolve_event};
pub use resources::{Resource, ResourceDelta};
pub use state::{
    CollapseCause, Ending, GamePhase, GameState, TurnLines, TurnReport, TurnStart,
};
pub use summary::{TrailSummary, trail_score};

/// Trait for abstracting tuning data loading
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load game tuning from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the tuning cannot be loaded or fails validation.
    fn load_game_config(&self) -> Result<GameConfig, Self::Error>;
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Main game engine for managing game instances
pub struct GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    data_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    /// Create a new game engine with the provided data loader and storage
    pub const fn new(data_loader: L, storage: S) -> Self {
        Self {
            data_loader,
            storage,
        }
    }

    /// Create a fresh run with the specified seed, hydrated with tuning
    ///
    /// # Errors
    ///
    /// Returns an error if the tuning cannot be loaded.
    pub fn create_game(&self, seed: u64) -> Result<GameState, L::Error> {
        let config = self.data_loader.load_game_config()?;
        Ok(GameState::default().with_seed(seed, config))
    }

    /// Save a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, game_state)
    }

    /// Delete a saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }

    /// Load a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded or rehydrated.
    pub fn load_game(&self, save_name: &str) -> Result<Option<GameState>, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        if let Some(game_state) = self.storage.load_game(save_name).map_err(Into::into)? {
            // Rehydrate with fresh tuning
            let config = self.data_loader.load_game_config().map_err(Into::into)?;
            Ok(Some(game_state.rehydrate(config)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = Infallible;

        fn load_game_config(&self) -> Result<GameConfig, Self::Error> {
            Ok(GameConfig::default_config())
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, GameState>>>,
    }

    impl GameStorage for MemoryStorage {
        type Error = Infallible;

        fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(save_name.to_string(), game_state.clone());
            Ok(())
        }

        fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
            Ok(self.saves.borrow().get(save_name).cloned())
        }

        fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(save_name);
            Ok(())
        }
    }

    #[test]
    fn engine_creates_and_roundtrips_state() {
        let engine = GameEngine::new(FixtureLoader, MemoryStorage::default());
        let mut state = engine.create_game(0xABCD).unwrap();
        state.start_character_creation();
        state.create_character("Ryder", Role::Pacifist);
        if matches!(state.begin_turn(), TurnStart::Drawn { .. }) {
            state.resolve_pending(None);
        }
        engine.save_game("slot-one", &state).unwrap();

        let loaded = engine.load_game("slot-one").unwrap().expect("save exists");
        assert_eq!(loaded.event_count, state.event_count);
        assert_eq!(loaded.phase, state.phase);
        assert_eq!(
            loaded.character.as_ref().map(|c| c.role),
            Some(Role::Pacifist)
        );
        assert!(loaded.deck.is_some());

        assert!(engine.load_game("missing-slot").unwrap().is_none());
    }

    #[test]
    fn engine_delete_save_clears_the_slot() {
        let engine = GameEngine::new(FixtureLoader, MemoryStorage::default());
        let state = engine.create_game(3).unwrap();
        engine.save_game("doomed", &state).unwrap();
        assert!(engine.load_game("doomed").unwrap().is_some());

        engine.delete_save("doomed").unwrap();
        assert!(engine.load_game("doomed").unwrap().is_none());

        // deleting an empty slot is a no-op
        engine.delete_save("doomed").unwrap();
    }

    #[test]
    fn create_game_attaches_tuning_and_deck() {
        let engine = GameEngine::new(FixtureLoader, MemoryStorage::default());
        let state = engine.create_game(7).unwrap();
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.seed, 7);
        assert!(state.config.is_some());
        assert_eq!(state.deck.as_ref().map(EventDeck::len), Some(5));
    }
}

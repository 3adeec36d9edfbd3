//! Tuning data for a run: starting loadout, run length, and per-event odds.
//!
//! Everything here deserializes from JSON with full defaults, so a partial
//! override file only has to name the fields it changes. Loaders are
//! expected to call [`GameConfig::validate`] before handing the config to
//! the state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{AMMO_CAP, DEFAULT_ROUNDS_TO_WIN, FOOD_CAP, HEALTH_CAP};

/// Inclusive bounds for a randomized amount draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub lo: i32,
    pub hi: i32,
}

impl AmountRange {
    #[must_use]
    pub const fn new(lo: i32, hi: i32) -> Self {
        Self { lo, hi }
    }

    fn validate(self, field: &'static str) -> Result<(), ConfigError> {
        if self.lo < 0 {
            return Err(ConfigError::NegativeAmount {
                field,
                value: self.lo,
            });
        }
        if self.lo > self.hi {
            return Err(ConfigError::RangeInverted {
                field,
                lo: self.lo,
                hi: self.hi,
            });
        }
        Ok(())
    }
}

/// Errors raised when tuning invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between 0.00 and 1.00 (got {value:.2})")]
    RateViolation { field: &'static str, value: f32 },
    #[error("{field} range is inverted ({lo}..={hi})")]
    RangeInverted {
        field: &'static str,
        lo: i32,
        hi: i32,
    },
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: i32 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    StartOutOfRange {
        field: &'static str,
        min: i32,
        max: i32,
        value: i32,
    },
    #[error("rounds_to_win must be at least 1")]
    ZeroRounds,
    #[error("event weights sum to zero; at least one event must be drawable")]
    NoDrawableEvents,
}

fn validate_rate(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RateViolation { field, value })
    }
}

/// Starting counters for a fresh character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartTuning {
    pub food: i32,
    pub ammo: i32,
    pub health: i32,
}

impl Default for StartTuning {
    fn default() -> Self {
        Self {
            food: 10,
            ammo: 10,
            health: 10,
        }
    }
}

impl StartTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        let bounds = [
            ("start.food", self.food, 1, FOOD_CAP),
            ("start.ammo", self.ammo, 0, AMMO_CAP),
            ("start.health", self.health, 1, HEALTH_CAP),
        ];
        for (field, value, min, max) in bounds {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::StartOutOfRange {
                    field,
                    min,
                    max,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChestTuning {
    pub weight: u32,
    pub find_rate: f32,
    pub food: AmountRange,
}

impl Default for ChestTuning {
    fn default() -> Self {
        Self {
            weight: 5,
            find_rate: 0.8,
            food: AmountRange::new(1, 6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntTuning {
    pub weight: u32,
    pub hit_rate: f32,
    pub ammo_cost: i32,
    pub food: AmountRange,
}

impl Default for HuntTuning {
    fn default() -> Self {
        Self {
            weight: 6,
            hit_rate: 0.55,
            ammo_cost: 1,
            food: AmountRange::new(3, 7),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditTuning {
    pub weight: u32,
    pub fight_rate: f32,
    pub flee_rate: f32,
    /// Ammo committed when standing to fight.
    pub ammo_cost: AmountRange,
    pub loot_food: AmountRange,
    pub loot_ammo: AmountRange,
    /// Wounds taken when a fight goes badly.
    pub wounds: AmountRange,
    pub stolen_food: AmountRange,
    /// Food dropped in the scramble of a clean escape.
    pub flee_drop: AmountRange,
    pub caught_wounds: AmountRange,
    pub caught_food: AmountRange,
}

impl Default for BanditTuning {
    fn default() -> Self {
        Self {
            weight: 4,
            fight_rate: 0.5,
            flee_rate: 0.5,
            ammo_cost: AmountRange::new(1, 3),
            loot_food: AmountRange::new(2, 5),
            loot_ammo: AmountRange::new(1, 3),
            wounds: AmountRange::new(2, 4),
            stolen_food: AmountRange::new(1, 4),
            flee_drop: AmountRange::new(0, 2),
            caught_wounds: AmountRange::new(1, 3),
            caught_food: AmountRange::new(1, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IllnessTuning {
    pub weight: u32,
    pub resist_rate: f32,
    pub wounds: AmountRange,
    pub food_cost: AmountRange,
}

impl Default for IllnessTuning {
    fn default() -> Self {
        Self {
            weight: 3,
            resist_rate: 0.4,
            wounds: AmountRange::new(1, 3),
            food_cost: AmountRange::new(1, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrangerTuning {
    pub weight: u32,
    pub trust_rate: f32,
    pub food_given: AmountRange,
    pub reward_ammo: AmountRange,
    pub reward_heal: i32,
}

impl Default for StrangerTuning {
    fn default() -> Self {
        Self {
            weight: 4,
            trust_rate: 0.6,
            food_given: AmountRange::new(1, 2),
            reward_ammo: AmountRange::new(2, 4),
            reward_heal: 1,
        }
    }
}

/// Per-kind tuning, one entry for each event in the deck.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTable {
    pub chest: ChestTuning,
    pub hunt: HuntTuning,
    pub bandits: BanditTuning,
    pub illness: IllnessTuning,
    pub stranger: StrangerTuning,
}

impl EventTable {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_rate("chest.find_rate", self.chest.find_rate)?;
        self.chest.food.validate("chest.food")?;

        validate_rate("hunt.hit_rate", self.hunt.hit_rate)?;
        self.hunt.food.validate("hunt.food")?;
        if self.hunt.ammo_cost < 0 {
            return Err(ConfigError::NegativeAmount {
                field: "hunt.ammo_cost",
                value: self.hunt.ammo_cost,
            });
        }

        validate_rate("bandits.fight_rate", self.bandits.fight_rate)?;
        validate_rate("bandits.flee_rate", self.bandits.flee_rate)?;
        self.bandits.ammo_cost.validate("bandits.ammo_cost")?;
        self.bandits.loot_food.validate("bandits.loot_food")?;
        self.bandits.loot_ammo.validate("bandits.loot_ammo")?;
        self.bandits.wounds.validate("bandits.wounds")?;
        self.bandits.stolen_food.validate("bandits.stolen_food")?;
        self.bandits.flee_drop.validate("bandits.flee_drop")?;
        self.bandits.caught_wounds.validate("bandits.caught_wounds")?;
        self.bandits.caught_food.validate("bandits.caught_food")?;

        validate_rate("illness.resist_rate", self.illness.resist_rate)?;
        self.illness.wounds.validate("illness.wounds")?;
        self.illness.food_cost.validate("illness.food_cost")?;

        validate_rate("stranger.trust_rate", self.stranger.trust_rate)?;
        self.stranger.food_given.validate("stranger.food_given")?;
        self.stranger.reward_ammo.validate("stranger.reward_ammo")?;
        if self.stranger.reward_heal < 0 {
            return Err(ConfigError::NegativeAmount {
                field: "stranger.reward_heal",
                value: self.stranger.reward_heal,
            });
        }

        let total = self.chest.weight
            + self.hunt.weight
            + self.bandits.weight
            + self.illness.weight
            + self.stranger.weight;
        if total == 0 {
            return Err(ConfigError::NoDrawableEvents);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub start: StartTuning,
    #[serde(default = "GameConfig::default_rounds_to_win")]
    pub rounds_to_win: u32,
    #[serde(default)]
    pub events: EventTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start: StartTuning::default(),
            rounds_to_win: Self::default_rounds_to_win(),
            events: EventTable::default(),
        }
    }
}

impl GameConfig {
    const fn default_rounds_to_win() -> u32 {
        DEFAULT_ROUNDS_TO_WIN
    }

    /// Built-in tuning used when no override file is supplied.
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse tuning from a JSON string. Missing fields fall back to the
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate tuning invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any rate leaves `0.0..=1.0`, any amount
    /// range is negative or inverted, or the deck has no drawable weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.start.validate()?;
        if self.rounds_to_win == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        self.events.validate()?;
        Ok(())
    }
}

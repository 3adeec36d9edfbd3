//! Pure event resolution.
//!
//! [`resolve_event`] maps an event, a character, and a decision to an
//! [`EventOutcome`] without touching any state. Randomness comes in
//! through [`RollSource`], so the state machine feeds it a seeded RNG
//! while tests feed it scripted draws and hit exact branches.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::character::Character;
use crate::config::{AmountRange, EventTable};
use crate::events::{Event, EventKind};
use crate::resources::ResourceDelta;

/// Source of randomized draws during resolution.
pub trait RollSource {
    /// Uniform draw in `[0.0, 1.0)`.
    fn unit(&mut self) -> f32;
    /// Inclusive integer draw from a tuning range.
    fn amount(&mut self, range: AmountRange) -> i32;
}

/// Adapter wrapping any [`Rng`] as a [`RollSource`].
#[derive(Debug)]
pub struct RngRolls<R>(pub R);

impl<R: Rng> RollSource for RngRolls<R> {
    fn unit(&mut self) -> f32 {
        self.0.random()
    }

    fn amount(&mut self, range: AmountRange) -> i32 {
        if range.lo >= range.hi {
            return range.lo;
        }
        self.0.random_range(range.lo..=range.hi)
    }
}

/// Deterministic roll source backed by queued draws.
///
/// Unit draws fall back to `1.0` once the queue runs dry, which misses
/// every threshold; amount draws fall back to the low end of the range.
/// Queued amounts are clamped into the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    units: VecDeque<f32>,
    amounts: VecDeque<i32>,
}

impl ScriptedRolls {
    #[must_use]
    pub fn new(
        units: impl IntoIterator<Item = f32>,
        amounts: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self {
            units: units.into_iter().collect(),
            amounts: amounts.into_iter().collect(),
        }
    }

    /// Queued draws left as `(units, amounts)`.
    #[must_use]
    pub fn remaining(&self) -> (usize, usize) {
        (self.units.len(), self.amounts.len())
    }
}

impl RollSource for ScriptedRolls {
    fn unit(&mut self) -> f32 {
        self.units.pop_front().unwrap_or(1.0)
    }

    fn amount(&mut self, range: AmountRange) -> i32 {
        self.amounts
            .pop_front()
            .map_or(range.lo, |value| value.clamp(range.lo, range.hi))
    }
}

/// Player decision for events that block on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Fight,
    Flee,
    Help,
    Ignore,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fight => "fight",
            Self::Flee => "flee",
            Self::Help => "help",
            Self::Ignore => "ignore",
        }
    }

    /// Capitalized form for menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fight => "Fight",
            Self::Flee => "Flee",
            Self::Help => "Help",
            Self::Ignore => "Ignore",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fight" => Ok(Self::Fight),
            "flee" => Ok(Self::Flee),
            "help" => Ok(Self::Help),
            "ignore" => Ok(Self::Ignore),
            _ => Err(()),
        }
    }
}

/// What one resolved event did, with every amount spelled out.
///
/// The union is closed: every branch an event can take has a variant
/// here, and [`EventOutcome::delta`] is the only place outcome payloads
/// turn into counter changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventOutcome {
    CacheFound {
        food: i32,
    },
    CacheEmpty,
    HuntBagged {
        ammo_spent: i32,
        food: i32,
    },
    HuntMissed {
        ammo_spent: i32,
    },
    HuntBlocked,
    FoughtOff {
        ammo_spent: i32,
        food_looted: i32,
        ammo_looted: i32,
    },
    Overrun {
        ammo_spent: i32,
        wounds: i32,
        food_stolen: i32,
    },
    FledClean {
        food_dropped: i32,
    },
    RunDown {
        wounds: i32,
        food_lost: i32,
    },
    ShookOff,
    Bedridden {
        wounds: i32,
        food_spent: i32,
    },
    Befriended {
        food_given: i32,
        ammo_gained: i32,
        healed: i32,
    },
    Rebuffed {
        food_given: i32,
    },
    PassedBy,
}

impl EventOutcome {
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::CacheFound { .. } => "cache_found",
            Self::CacheEmpty => "cache_empty",
            Self::HuntBagged { .. } => "hunt_bagged",
            Self::HuntMissed { .. } => "hunt_missed",
            Self::HuntBlocked => "hunt_blocked",
            Self::FoughtOff { .. } => "fought_off",
            Self::Overrun { .. } => "overrun",
            Self::FledClean { .. } => "fled_clean",
            Self::RunDown { .. } => "run_down",
            Self::ShookOff => "shook_off",
            Self::Bedridden { .. } => "bedridden",
            Self::Befriended { .. } => "befriended",
            Self::Rebuffed { .. } => "rebuffed",
            Self::PassedBy => "passed_by",
        }
    }

    /// Whether the event went the character's way.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::CacheFound { .. }
                | Self::HuntBagged { .. }
                | Self::FoughtOff { .. }
                | Self::FledClean { .. }
                | Self::ShookOff
                | Self::Befriended { .. }
                | Self::PassedBy
        )
    }

    /// Counter changes this outcome produces. Raw; the caller clamps.
    #[must_use]
    pub const fn delta(&self) -> ResourceDelta {
        match *self {
            Self::CacheFound { food } => ResourceDelta::new(food, 0, 0),
            Self::CacheEmpty | Self::HuntBlocked | Self::ShookOff | Self::PassedBy => {
                ResourceDelta::NONE
            }
            Self::HuntBagged { ammo_spent, food } => ResourceDelta::new(food, -ammo_spent, 0),
            Self::HuntMissed { ammo_spent } => ResourceDelta::new(0, -ammo_spent, 0),
            Self::FoughtOff {
                ammo_spent,
                food_looted,
                ammo_looted,
            } => ResourceDelta::new(food_looted, ammo_looted - ammo_spent, 0),
            Self::Overrun {
                ammo_spent,
                wounds,
                food_stolen,
            } => ResourceDelta::new(-food_stolen, -ammo_spent, -wounds),
            Self::FledClean { food_dropped } => ResourceDelta::new(-food_dropped, 0, 0),
            Self::RunDown { wounds, food_lost } => ResourceDelta::new(-food_lost, 0, -wounds),
            Self::Bedridden { wounds, food_spent } => ResourceDelta::new(-food_spent, 0, -wounds),
            Self::Befriended {
                food_given,
                ammo_gained,
                healed,
            } => ResourceDelta::new(-food_given, ammo_gained, healed),
            Self::Rebuffed { food_given } => ResourceDelta::new(-food_given, 0, 0),
        }
    }

    /// One diary line describing the outcome.
    #[must_use]
    pub fn journal_line(&self) -> String {
        match *self {
            Self::CacheFound { food } => format!("Pried open a trail cache: +{food} food."),
            Self::CacheEmpty => "The cache was picked clean long ago.".to_string(),
            Self::HuntBagged { ammo_spent, food } => {
                format!("Brought down game: +{food} food for {ammo_spent} ammo.")
            }
            Self::HuntMissed { ammo_spent } => {
                format!("The shot went wide; {ammo_spent} ammo wasted.")
            }
            Self::HuntBlocked => "No ammo left to hunt with.".to_string(),
            Self::FoughtOff {
                ammo_spent,
                food_looted,
                ammo_looted,
            } => format!(
                "Drove the bandits off: +{food_looted} food, +{ammo_looted} ammo, {ammo_spent} spent."
            ),
            Self::Overrun {
                wounds,
                food_stolen,
                ..
            } => format!("Overrun by bandits: -{wounds} health, -{food_stolen} food."),
            Self::FledClean { food_dropped } if food_dropped > 0 => {
                format!("Slipped away, dropping {food_dropped} food in the scramble.")
            }
            Self::FledClean { .. } => "Slipped away without a scratch.".to_string(),
            Self::RunDown { wounds, food_lost } => {
                format!("Run down while fleeing: -{wounds} health, -{food_lost} food.")
            }
            Self::ShookOff => "Shook off the fever by morning.".to_string(),
            Self::Bedridden { wounds, food_spent } => {
                format!("Bedridden with fever: -{wounds} health, -{food_spent} food.")
            }
            Self::Befriended {
                food_given,
                ammo_gained,
                healed,
            } => format!(
                "Shared {food_given} food; the stranger repaid it with {ammo_gained} ammo and patched {healed} health."
            ),
            Self::Rebuffed { food_given } => {
                format!("The stranger took {food_given} food and vanished into the brush.")
            }
            Self::PassedBy => "Passed the stranger by without a word.".to_string(),
        }
    }
}

/// Resolve one event into an outcome.
///
/// Draws happen in a fixed order per branch (committed costs first, then
/// the success check, then payouts), so a scripted source can steer a
/// resolution onto any branch. Events that block on a decision fall back
/// to the cautious option (`Flee` / `Ignore`) when handed `None` or a
/// decision that does not apply.
#[must_use]
pub fn resolve_event(
    event: &Event,
    who: &Character,
    decision: Option<Decision>,
    tuning: &EventTable,
    rolls: &mut impl RollSource,
) -> EventOutcome {
    match event.kind {
        EventKind::ChestOfFood => resolve_chest(who, tuning, rolls),
        EventKind::Hunt => resolve_hunt(who, tuning, rolls),
        EventKind::BanditAmbush => resolve_bandits(who, decision, tuning, rolls),
        EventKind::Illness => resolve_illness(who, tuning, rolls),
        EventKind::Stranger => resolve_stranger(who, decision, tuning, rolls),
    }
}

fn resolve_chest(who: &Character, tuning: &EventTable, rolls: &mut impl RollSource) -> EventOutcome {
    let chance = who.apply_role_ability(EventKind::ChestOfFood, tuning.chest.find_rate);
    if rolls.unit() < chance {
        EventOutcome::CacheFound {
            food: rolls.amount(tuning.chest.food),
        }
    } else {
        EventOutcome::CacheEmpty
    }
}

fn resolve_hunt(who: &Character, tuning: &EventTable, rolls: &mut impl RollSource) -> EventOutcome {
    let ammo_spent = tuning.hunt.ammo_cost;
    if who.resources.ammo < ammo_spent {
        return EventOutcome::HuntBlocked;
    }

    let chance = who.apply_role_ability(EventKind::Hunt, tuning.hunt.hit_rate);
    if rolls.unit() < chance {
        EventOutcome::HuntBagged {
            ammo_spent,
            food: rolls.amount(tuning.hunt.food),
        }
    } else {
        EventOutcome::HuntMissed { ammo_spent }
    }
}

fn resolve_bandits(
    who: &Character,
    decision: Option<Decision>,
    tuning: &EventTable,
    rolls: &mut impl RollSource,
) -> EventOutcome {
    let bandits = &tuning.bandits;
    match decision {
        Some(Decision::Fight) => {
            // Standing to fight with dry guns is a lost cause.
            if who.resources.ammo <= 0 {
                return EventOutcome::Overrun {
                    ammo_spent: 0,
                    wounds: rolls.amount(bandits.wounds),
                    food_stolen: rolls.amount(bandits.stolen_food).min(who.resources.food),
                };
            }

            let ammo_spent = rolls.amount(bandits.ammo_cost).min(who.resources.ammo);
            let chance = who.apply_role_ability(EventKind::BanditAmbush, bandits.fight_rate);
            if rolls.unit() < chance {
                EventOutcome::FoughtOff {
                    ammo_spent,
                    food_looted: rolls.amount(bandits.loot_food),
                    ammo_looted: rolls.amount(bandits.loot_ammo),
                }
            } else {
                EventOutcome::Overrun {
                    ammo_spent,
                    wounds: rolls.amount(bandits.wounds),
                    food_stolen: rolls.amount(bandits.stolen_food).min(who.resources.food),
                }
            }
        }
        _ => {
            let chance = who.apply_role_ability(EventKind::BanditAmbush, bandits.flee_rate);
            if rolls.unit() < chance {
                EventOutcome::FledClean {
                    food_dropped: rolls.amount(bandits.flee_drop).min(who.resources.food),
                }
            } else {
                EventOutcome::RunDown {
                    wounds: rolls.amount(bandits.caught_wounds),
                    food_lost: rolls.amount(bandits.caught_food).min(who.resources.food),
                }
            }
        }
    }
}

fn resolve_illness(
    who: &Character,
    tuning: &EventTable,
    rolls: &mut impl RollSource,
) -> EventOutcome {
    let chance = who.apply_role_ability(EventKind::Illness, tuning.illness.resist_rate);
    if rolls.unit() < chance {
        EventOutcome::ShookOff
    } else {
        EventOutcome::Bedridden {
            wounds: rolls.amount(tuning.illness.wounds),
            food_spent: rolls.amount(tuning.illness.food_cost).min(who.resources.food),
        }
    }
}

fn resolve_stranger(
    who: &Character,
    decision: Option<Decision>,
    tuning: &EventTable,
    rolls: &mut impl RollSource,
) -> EventOutcome {
    let stranger = &tuning.stranger;
    match decision {
        Some(Decision::Help) => {
            let food_given = rolls.amount(stranger.food_given).min(who.resources.food);
            let chance = who.apply_role_ability(EventKind::Stranger, stranger.trust_rate);
            if rolls.unit() < chance {
                EventOutcome::Befriended {
                    food_given,
                    ammo_gained: rolls.amount(stranger.reward_ammo),
                    healed: stranger.reward_heal,
                }
            } else {
                EventOutcome::Rebuffed { food_given }
            }
        }
        _ => EventOutcome::PassedBy,
    }
}

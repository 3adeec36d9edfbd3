//! The run state machine: phases, turns, and endings.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

use crate::character::{Character, Role};
use crate::config::GameConfig;
use crate::constants::{DEBUG_ENV_VAR, DEFAULT_ROUNDS_TO_WIN, META_LAST_EVENT};
use crate::events::{Event, EventDeck, EventKind, pick_event};
use crate::resolve::{Decision, EventOutcome, RngRolls, resolve_event};
use crate::resources::Resource;

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Where a run currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    NotStarted,
    CharacterCreation,
    Playing,
    GameOver,
    Ended,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::CharacterCreation => "character_creation",
            Self::Playing => "playing",
            Self::GameOver => "game_over",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapseCause {
    Hunger,
    Wounds,
}

impl CollapseCause {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hunger => "hunger",
            Self::Wounds => "wounds",
        }
    }
}

/// How a run finished. `GameOver` carries a collapse, `Ended` a victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ending {
    Collapse { cause: CollapseCause },
    Victory,
}

impl Ending {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Collapse { .. } => "collapse",
            Self::Victory => "victory",
        }
    }

    /// Diary line written the moment the run ends.
    #[must_use]
    pub const fn journal_line(self) -> &'static str {
        match self {
            Self::Collapse {
                cause: CollapseCause::Hunger,
            } => "The last of the food is gone. The trail ends here.",
            Self::Collapse {
                cause: CollapseCause::Wounds,
            } => "Too badly hurt to carry on. The trail ends here.",
            Self::Victory => "The long trail is behind you. Home fires burn ahead.",
        }
    }
}

/// What [`GameState::begin_turn`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnStart {
    /// Nothing was drawn; the run is not in a playable state. A collapse
    /// caught by the pre-check lands here with `phase == GameOver`.
    Idle { phase: GamePhase },
    /// An event is pending resolution. `decisions` is empty when the
    /// event resolves on rolls alone.
    Drawn {
        kind: EventKind,
        name: String,
        desc: String,
        decisions: &'static [Decision],
    },
}

/// Diary lines produced by one resolved turn.
pub type TurnLines = SmallVec<[String; 3]>;

/// Everything the frontend needs to narrate one resolved turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub outcome: EventOutcome,
    pub lines: TurnLines,
    pub phase: GamePhase,
    pub ending: Option<Ending>,
}

/// Full state of one run.
///
/// The serialized portion is what lands in a save file. RNG, deck, and
/// tuning are skipped and reattached by [`GameState::rehydrate`], so a
/// save can never smuggle in a stale event list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub phase: GamePhase,
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub event_count: u32,
    pub seed: u64,
    #[serde(default)]
    pub ending: Option<Ending>,
    #[serde(default)]
    pub journal: Vec<String>,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
    #[serde(skip)]
    pub pending_event: Option<Event>,
    #[serde(skip)]
    pub rng: Option<ChaCha20Rng>,
    #[serde(skip)]
    pub deck: Option<EventDeck>,
    #[serde(skip)]
    pub config: Option<GameConfig>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::NotStarted,
            character: None,
            event_count: 0,
            seed: 0,
            ending: None,
            journal: Vec::new(),
            meta: HashMap::new(),
            pending_event: None,
            rng: None,
            deck: None,
            config: None,
        }
    }
}

impl GameState {
    fn seed_bytes(seed: u64) -> [u8; 32] {
        // splitmix64 finalizer, one lane per 8-byte chunk
        let mut bytes = [0_u8; 32];
        for (lane, chunk) in bytes.chunks_exact_mut(8).enumerate() {
            let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15_u64.wrapping_mul(lane as u64 + 1));
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            chunk.copy_from_slice(&(z ^ (z >> 31)).to_le_bytes());
        }
        bytes
    }

    /// Seed the RNG and attach tuning, building the deck from it.
    #[must_use]
    pub fn with_seed(mut self, seed: u64, config: GameConfig) -> Self {
        let bytes = Self::seed_bytes(seed);
        self.seed = seed;
        self.rng = Some(ChaCha20Rng::from_seed(bytes));
        self.deck = Some(EventDeck::from_table(&config.events));
        self.config = Some(config);
        self
    }

    /// Reattach the skipped runtime pieces after deserialization.
    ///
    /// The RNG is reseeded from the stored seed and the deck is rebuilt
    /// from tuning, so every known event kind is drawable after a load.
    #[must_use]
    pub fn rehydrate(mut self, config: GameConfig) -> Self {
        let bytes = Self::seed_bytes(self.seed);
        self.rng = Some(ChaCha20Rng::from_seed(bytes));
        self.deck = Some(EventDeck::from_table(&config.events));
        self.config = Some(config);
        self
    }

    pub fn start_character_creation(&mut self) {
        if self.phase == GamePhase::NotStarted {
            self.phase = GamePhase::CharacterCreation;
        }
    }

    /// Create the character and enter the Playing phase.
    ///
    /// Starting counters come from tuning when attached, otherwise the
    /// built-in loadout.
    pub fn create_character(&mut self, name: impl Into<String>, role: Role) {
        if !matches!(
            self.phase,
            GamePhase::NotStarted | GamePhase::CharacterCreation
        ) {
            return;
        }
        let start = self
            .config
            .as_ref()
            .map_or_else(Resource::starting, |config| Resource {
                food: config.start.food,
                ammo: config.start.ammo,
                health: config.start.health,
            });
        let character = Character::with_resources(name, role, start);
        self.journal
            .push(format!("{character} sets out on the red trail."));
        self.character = Some(character);
        self.phase = GamePhase::Playing;
    }

    /// Hunger is reported when both counters bottom out together.
    fn collapse_cause(&self) -> Option<CollapseCause> {
        let character = self.character.as_ref()?;
        if character.resources.food <= 0 {
            return Some(CollapseCause::Hunger);
        }
        if character.resources.health <= 0 {
            return Some(CollapseCause::Wounds);
        }
        None
    }

    fn set_ending(&mut self, ending: Ending) {
        if self.ending.is_none() {
            self.ending = Some(ending);
        }
    }

    fn close_run(&mut self, ending: Ending, phase: GamePhase, lines: Option<&mut TurnLines>) {
        self.set_ending(ending);
        self.phase = phase;
        let line = ending.journal_line().to_string();
        if let Some(lines) = lines {
            lines.push(line.clone());
        }
        self.journal.push(line);
    }

    /// Draw the next event, or report why nothing was drawn.
    ///
    /// Survival counters are checked before the draw, so a run that is
    /// already depleted collapses without facing another event. Calling
    /// again while an event is still pending returns that same event.
    pub fn begin_turn(&mut self) -> TurnStart {
        if self.phase != GamePhase::Playing {
            return TurnStart::Idle { phase: self.phase };
        }

        if let Some(cause) = self.collapse_cause() {
            self.close_run(Ending::Collapse { cause }, GamePhase::GameOver, None);
            return TurnStart::Idle { phase: self.phase };
        }

        if let Some(event) = &self.pending_event {
            return TurnStart::Drawn {
                kind: event.kind,
                name: event.name.clone(),
                desc: event.desc.clone(),
                decisions: event.kind.decisions(),
            };
        }

        let Some(deck) = self.deck.as_ref() else {
            return TurnStart::Idle { phase: self.phase };
        };
        let Some(rng) = self.rng.as_mut() else {
            return TurnStart::Idle { phase: self.phase };
        };
        let Some(event) = pick_event(deck, rng) else {
            return TurnStart::Idle { phase: self.phase };
        };

        let start = TurnStart::Drawn {
            kind: event.kind,
            name: event.name.clone(),
            desc: event.desc.clone(),
            decisions: event.kind.decisions(),
        };
        self.pending_event = Some(event.clone());
        start
    }

    /// Resolve the pending event and apply its outcome.
    ///
    /// Bumps the event count, unlocks ability tiers, writes the diary,
    /// and closes the run on collapse or victory. Collapse is checked
    /// before victory, so dying on the final event loses the run.
    /// Returns `None` when no event is pending.
    pub fn resolve_pending(&mut self, decision: Option<Decision>) -> Option<TurnReport> {
        let event = self.pending_event.take()?;

        let outcome = {
            let character = self.character.as_ref()?;
            let config = self.config.as_ref()?;
            let rng = self.rng.as_mut()?;
            resolve_event(
                &event,
                character,
                decision,
                &config.events,
                &mut RngRolls(rng),
            )
        };
        let delta = outcome.delta();

        let character = self.character.as_mut()?;
        let tier_before = character.abilities.tier();
        let role = character.role;
        character.resources.apply(&delta);
        self.event_count += 1;
        character.unlock_abilities(self.event_count);
        let tier_after = character.abilities.tier();

        let mut lines = TurnLines::new();
        lines.push(outcome.journal_line());
        if tier_after != tier_before
            && let Some(tier) = tier_after
        {
            lines.push(format!("The {tier} ability of the {role} awakens."));
        }
        self.journal.extend(lines.iter().cloned());
        self.meta.insert(
            META_LAST_EVENT.to_string(),
            serde_json::Value::from(event.kind.key()),
        );

        let rounds_to_win = self
            .config
            .as_ref()
            .map_or(DEFAULT_ROUNDS_TO_WIN, |config| config.rounds_to_win);
        if let Some(cause) = self.collapse_cause() {
            self.close_run(Ending::Collapse { cause }, GamePhase::GameOver, Some(&mut lines));
        } else if self.event_count >= rounds_to_win {
            self.close_run(Ending::Victory, GamePhase::Ended, Some(&mut lines));
        }

        if debug_log_enabled() {
            println!(
                "Turn {} | {} -> {}",
                self.event_count,
                event.kind,
                outcome.key()
            );
        }

        Some(TurnReport {
            outcome,
            lines,
            phase: self.phase,
            ending: self.ending,
        })
    }

    /// Reset to a fresh `NotStarted` run, keeping the attached tuning.
    pub fn restart(&mut self, seed: u64) {
        let config = self.config.take().unwrap_or_default();
        *self = Self::default().with_seed(seed, config);
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Ended)
    }
}

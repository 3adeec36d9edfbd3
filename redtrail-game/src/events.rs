//! Event deck and weighted selection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::EventTable;
use crate::resolve::Decision;

/// The closed set of encounter kinds on the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ChestOfFood,
    Hunt,
    BanditAmbush,
    Illness,
    Stranger,
}

impl EventKind {
    pub const ALL: [Self; 5] = [
        Self::ChestOfFood,
        Self::Hunt,
        Self::BanditAmbush,
        Self::Illness,
        Self::Stranger,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ChestOfFood => "chest_of_food",
            Self::Hunt => "hunt",
            Self::BanditAmbush => "bandit_ambush",
            Self::Illness => "illness",
            Self::Stranger => "stranger",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ChestOfFood => "Chest of Food",
            Self::Hunt => "Hunting Grounds",
            Self::BanditAmbush => "Bandit Ambush",
            Self::Illness => "Trail Fever",
            Self::Stranger => "Stranger on the Trail",
        }
    }

    #[must_use]
    pub const fn flavor(self) -> &'static str {
        match self {
            Self::ChestOfFood => "A weathered chest sits half-buried beside a burned-out wagon.",
            Self::Hunt => "Fresh tracks cross the trail ahead.",
            Self::BanditAmbush => "Riders with rifles swing out from behind the rocks.",
            Self::Illness => "A rough night turns into a burning fever.",
            Self::Stranger => "A drifter waves you down, asking for food.",
        }
    }

    /// Decisions this kind blocks on. Empty means it resolves on rolls alone.
    #[must_use]
    pub const fn decisions(self) -> &'static [Decision] {
        match self {
            Self::BanditAmbush => &[Decision::Fight, Decision::Flee],
            Self::Stranger => &[Decision::Help, Decision::Ignore],
            _ => &[],
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chest_of_food" => Ok(Self::ChestOfFood),
            "hunt" => Ok(Self::Hunt),
            "bandit_ambush" => Ok(Self::BanditAmbush),
            "illness" => Ok(Self::Illness),
            "stranger" => Ok(Self::Stranger),
            _ => Err(()),
        }
    }
}

/// One drawable entry in the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub name: String,
    pub desc: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    5
}

impl Event {
    #[must_use]
    pub fn descriptor(kind: EventKind, weight: u32) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            desc: kind.flavor().to_string(),
            weight,
        }
    }
}

/// The full deck, rebuilt from tuning on every load so saves can never
/// carry a stale or truncated event list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventDeck {
    pub events: Vec<Event>,
}

impl EventDeck {
    /// Build the deck for every known kind, weights taken from tuning.
    #[must_use]
    pub fn from_table(table: &EventTable) -> Self {
        let events = EventKind::ALL
            .iter()
            .map(|&kind| {
                let weight = match kind {
                    EventKind::ChestOfFood => table.chest.weight,
                    EventKind::Hunt => table.hunt.weight,
                    EventKind::BanditAmbush => table.bandits.weight,
                    EventKind::Illness => table.illness.weight,
                    EventKind::Stranger => table.stranger.weight,
                };
                Event::descriptor(kind, weight)
            })
            .collect();
        Self { events }
    }

    #[must_use]
    pub fn get(&self, kind: EventKind) -> Option<&Event> {
        self.events.iter().find(|event| event.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Weighted draw from the deck. Zero-weight events never come up; returns
/// `None` only when no event carries weight at all.
pub fn pick_event<'a, R: Rng>(deck: &'a EventDeck, rng: &mut R) -> Option<&'a Event> {
    let total_weight: u32 = deck.events.iter().map(|event| event.weight).sum();
    if total_weight == 0 {
        return None;
    }

    let roll = rng.random_range(0..total_weight);
    let mut current = 0;
    for event in &deck.events {
        current += event.weight;
        if roll < current {
            return Some(event);
        }
    }

    deck.events.first()
}

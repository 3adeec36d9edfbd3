//! Characters, roles, and the ability tiers a run unlocks over time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    RATE_CEILING, RATE_FLOOR, TIER_FIRST_BONUS, TIER_FIRST_THRESHOLD, TIER_SECOND_BONUS,
    TIER_SECOND_THRESHOLD, TIER_THIRD_BONUS, TIER_THIRD_THRESHOLD,
};
use crate::events::EventKind;
use crate::resources::Resource;

/// Callings a character can set out with.
///
/// Every role's ability sharpens the odds of one event kind; the
/// sharpshooter's applies to all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sharpshooter,
    Explorer,
    Pacifist,
    Melee,
    Archer,
    Mage,
}

impl Role {
    pub const ALL: [Self; 6] = [
        Self::Sharpshooter,
        Self::Explorer,
        Self::Pacifist,
        Self::Melee,
        Self::Archer,
        Self::Mage,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sharpshooter => "sharpshooter",
            Self::Explorer => "explorer",
            Self::Pacifist => "pacifist",
            Self::Melee => "melee",
            Self::Archer => "archer",
            Self::Mage => "mage",
        }
    }

    /// Event kind this role's ability applies to. `None` means every kind.
    #[must_use]
    pub const fn bonus_domain(self) -> Option<EventKind> {
        match self {
            Self::Sharpshooter => None,
            Self::Explorer => Some(EventKind::ChestOfFood),
            Self::Pacifist => Some(EventKind::Stranger),
            Self::Melee => Some(EventKind::BanditAmbush),
            Self::Archer => Some(EventKind::Hunt),
            Self::Mage => Some(EventKind::Illness),
        }
    }

    /// One-line pitch shown on the role roster.
    #[must_use]
    pub const fn blurb(self) -> &'static str {
        match self {
            Self::Sharpshooter => "A steady hand helps with everything on the trail.",
            Self::Explorer => "Knows where caches hide and how to crack them.",
            Self::Pacifist => "Strangers trust an open palm.",
            Self::Melee => "Bandits think twice about close quarters.",
            Self::Archer => "Rarely wastes a shot on the hunt.",
            Self::Mage => "Old remedies keep the fever at bay.",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sharpshooter" => Ok(Self::Sharpshooter),
            "explorer" => Ok(Self::Explorer),
            "pacifist" => Ok(Self::Pacifist),
            "melee" => Ok(Self::Melee),
            "archer" => Ok(Self::Archer),
            "mage" => Ok(Self::Mage),
            _ => Err(()),
        }
    }
}

/// Ability tiers, unlocked by cumulative resolved events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityTier {
    First,
    Second,
    Third,
}

impl AbilityTier {
    #[must_use]
    pub const fn threshold(self) -> u32 {
        match self {
            Self::First => TIER_FIRST_THRESHOLD,
            Self::Second => TIER_SECOND_THRESHOLD,
            Self::Third => TIER_THIRD_THRESHOLD,
        }
    }

    #[must_use]
    pub const fn bonus(self) -> f32 {
        match self {
            Self::First => TIER_FIRST_BONUS,
            Self::Second => TIER_SECOND_BONUS,
            Self::Third => TIER_THIRD_BONUS,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
        }
    }
}

impl fmt::Display for AbilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unlock flags for the three tiers.
///
/// Flags only ever flip on; [`Abilities::unlock`] is idempotent and never
/// takes a tier away, even if it is called with a stale count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Abilities {
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub second: bool,
    #[serde(default)]
    pub third: bool,
}

impl Abilities {
    pub fn unlock(&mut self, event_count: u32) {
        if event_count >= TIER_FIRST_THRESHOLD {
            self.first = true;
        }
        if event_count >= TIER_SECOND_THRESHOLD {
            self.second = true;
        }
        if event_count >= TIER_THIRD_THRESHOLD {
            self.third = true;
        }
    }

    /// Highest unlocked tier, if any.
    #[must_use]
    pub const fn tier(&self) -> Option<AbilityTier> {
        if self.third {
            Some(AbilityTier::Third)
        } else if self.second {
            Some(AbilityTier::Second)
        } else if self.first {
            Some(AbilityTier::First)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub resources: Resource,
    #[serde(default)]
    pub abilities: Abilities,
}

impl Character {
    #[must_use]
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            resources: Resource::starting(),
            abilities: Abilities::default(),
        }
    }

    #[must_use]
    pub fn with_resources(name: impl Into<String>, role: Role, resources: Resource) -> Self {
        Self {
            name: name.into(),
            role,
            resources,
            abilities: Abilities::default(),
        }
    }

    /// Success rate for an event kind after the role ability is applied.
    ///
    /// Only the highest unlocked tier counts; bonuses do not stack. The
    /// result is clamped into `0.0..=1.0` either way.
    #[must_use]
    pub fn apply_role_ability(&self, kind: EventKind, base_rate: f32) -> f32 {
        let adjusted = match self.abilities.tier() {
            Some(tier) if self.role_covers(kind) => base_rate + tier.bonus(),
            _ => base_rate,
        };
        adjusted.clamp(RATE_FLOOR, RATE_CEILING)
    }

    fn role_covers(&self, kind: EventKind) -> bool {
        match self.role.bonus_domain() {
            None => true,
            Some(domain) => domain == kind,
        }
    }

    pub fn unlock_abilities(&mut self, event_count: u32) {
        self.abilities.unlock(event_count);
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} the {}", self.name, self.role)
    }
}

//! End-of-run summary for the result screen.

use serde::{Deserialize, Serialize};

use crate::resources::Resource;
use crate::state::{CollapseCause, Ending, GameState};

/// Everything the result screen shows about a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailSummary {
    pub ending: Ending,
    pub headline: String,
    pub name: String,
    pub role: String,
    pub events_resolved: u32,
    pub resources: Resource,
    pub score: i32,
}

impl TrailSummary {
    /// Build the summary for a finished run.
    ///
    /// Returns `None` while the run has no ending or no character yet.
    #[must_use]
    pub fn from_state(state: &GameState) -> Option<Self> {
        let ending = state.ending?;
        let character = state.character.as_ref()?;
        Some(Self {
            ending,
            headline: headline(ending).to_string(),
            name: character.name.clone(),
            role: character.role.to_string(),
            events_resolved: state.event_count,
            resources: character.resources,
            score: trail_score(state),
        })
    }
}

const fn headline(ending: Ending) -> &'static str {
    match ending {
        Ending::Victory => "Made it through",
        Ending::Collapse {
            cause: CollapseCause::Hunger,
        } => "Starved on the trail",
        Ending::Collapse {
            cause: CollapseCause::Wounds,
        } => "Died of wounds",
    }
}

/// Score for a run: what survived plus how far it got.
#[must_use]
pub fn trail_score(state: &GameState) -> i32 {
    let (resources, victory) = match (&state.character, state.ending) {
        (Some(character), ending) => (character.resources, ending == Some(Ending::Victory)),
        (None, _) => return 0,
    };

    let food = resources.food.max(0);
    let ammo = resources.ammo.max(0);
    let health = resources.health.max(0);
    let events = i32::try_from(state.event_count).unwrap_or(0);
    let victory_bonus = if victory { 100 } else { 0 };

    food * 3 + ammo * 2 + health * 10 + events * 5 + victory_bonus
}

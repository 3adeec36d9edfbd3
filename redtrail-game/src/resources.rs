//! Survival counters and the deltas event outcomes apply to them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    AMMO_CAP, FOOD_CAP, HEALTH_CAP, START_AMMO, START_FOOD, START_HEALTH,
};

/// Signed change produced by one resolved event.
///
/// Deltas are raw; [`Resource::apply`] clamps the result back into range,
/// so an outcome never has to know how close a counter is to its floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceDelta {
    #[serde(default)]
    pub food: i32,
    #[serde(default)]
    pub ammo: i32,
    #[serde(default)]
    pub health: i32,
}

impl ResourceDelta {
    pub const NONE: Self = Self {
        food: 0,
        ammo: 0,
        health: 0,
    };

    #[must_use]
    pub const fn new(food: i32, ammo: i32, health: i32) -> Self {
        Self { food, ammo, health }
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.food == 0 && self.ammo == 0 && self.health == 0
    }
}

/// The three counters a run lives or dies by.
///
/// Food and ammo sit in `0..=100`, health in `0..=10`. Every mutation path
/// funnels through [`Resource::clamp`], so negative values never escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub food: i32,
    #[serde(default)]
    pub ammo: i32,
    #[serde(default)]
    pub health: i32,
}

impl Default for Resource {
    fn default() -> Self {
        Self::starting()
    }
}

impl Resource {
    /// Fresh loadout for a new character.
    #[must_use]
    pub const fn starting() -> Self {
        Self {
            food: START_FOOD,
            ammo: START_AMMO,
            health: START_HEALTH,
        }
    }

    pub fn add_food(&mut self, amount: i32) {
        self.food += amount;
        self.clamp();
    }

    pub fn lose_food(&mut self, amount: i32) {
        self.food -= amount;
        self.clamp();
    }

    pub fn add_ammo(&mut self, amount: i32) {
        self.ammo += amount;
        self.clamp();
    }

    pub fn lose_ammo(&mut self, amount: i32) {
        self.ammo -= amount;
        self.clamp();
    }

    pub fn heal(&mut self, amount: i32) {
        self.health += amount;
        self.clamp();
    }

    pub fn wound(&mut self, amount: i32) {
        self.health -= amount;
        self.clamp();
    }

    /// Applies a full outcome delta, then clamps once.
    pub fn apply(&mut self, delta: &ResourceDelta) {
        self.food += delta.food;
        self.ammo += delta.ammo;
        self.health += delta.health;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.food = self.food.clamp(0, FOOD_CAP);
        self.ammo = self.ammo.clamp(0, AMMO_CAP);
        self.health = self.health.clamp(0, HEALTH_CAP);
    }

    /// True once either survival counter has hit its floor.
    ///
    /// Ammo is not a survival counter; running dry only blocks hunting.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.food <= 0 || self.health <= 0
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Food: {}, Ammo: {}, Health: {}",
            self.food, self.ammo, self.health
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_loadout_matches_defaults() {
        let resources = Resource::default();
        assert_eq!(resources, Resource::starting());
        assert_eq!(resources.food, 10);
        assert_eq!(resources.ammo, 10);
        assert_eq!(resources.health, 10);
    }

    #[test]
    fn apply_clamps_floors_to_zero() {
        let mut resources = Resource::starting();
        resources.apply(&ResourceDelta::new(-25, -11, -99));
        assert_eq!(resources.food, 0);
        assert_eq!(resources.ammo, 0);
        assert_eq!(resources.health, 0);
    }

    #[test]
    fn apply_clamps_caps() {
        let mut resources = Resource::starting();
        resources.apply(&ResourceDelta::new(500, 500, 500));
        assert_eq!(resources.food, 100);
        assert_eq!(resources.ammo, 100);
        assert_eq!(resources.health, 10);
    }

    #[test]
    fn named_helpers_clamp_like_apply() {
        let mut resources = Resource::starting();
        resources.lose_food(99);
        resources.wound(99);
        resources.add_ammo(999);
        assert_eq!(resources.food, 0);
        assert_eq!(resources.health, 0);
        assert_eq!(resources.ammo, 100);
    }

    #[test]
    fn depleted_only_at_zero_food_or_health() {
        let mut resources = Resource::starting();
        assert!(!resources.is_depleted());

        resources.ammo = 0;
        assert!(!resources.is_depleted());

        resources.food = 1;
        resources.health = 1;
        assert!(!resources.is_depleted());

        resources.food = 0;
        assert!(resources.is_depleted());

        resources.food = 5;
        resources.health = 0;
        assert!(resources.is_depleted());
    }

    #[test]
    fn zero_delta_is_zero() {
        assert!(ResourceDelta::NONE.is_zero());
        assert!(!ResourceDelta::new(0, 0, 1).is_zero());
    }
}

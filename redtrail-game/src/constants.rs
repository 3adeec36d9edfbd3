//! Centralized balance constants for the Red Trail core rules.
//!
//! These values define the fixed math of the simulation: counter caps,
//! ability thresholds, and the run length. Per-event tuning that content
//! revisions are expected to adjust lives in [`crate::config::GameConfig`]
//! instead.

// Debug logging ------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "REDTRAIL_DEBUG_LOGS";

// Meta keys ----------------------------------------------------------------
pub(crate) const META_LAST_EVENT: &str = "last_event";

// Resource caps ------------------------------------------------------------
pub(crate) const FOOD_CAP: i32 = 100;
pub(crate) const AMMO_CAP: i32 = 100;
pub(crate) const HEALTH_CAP: i32 = 10;

// Starting loadout ---------------------------------------------------------
pub(crate) const START_FOOD: i32 = 10;
pub(crate) const START_AMMO: i32 = 10;
pub(crate) const START_HEALTH: i32 = 10;

// Ability tiers ------------------------------------------------------------
pub(crate) const TIER_FIRST_THRESHOLD: u32 = 1;
pub(crate) const TIER_SECOND_THRESHOLD: u32 = 10;
pub(crate) const TIER_THIRD_THRESHOLD: u32 = 20;
pub(crate) const TIER_FIRST_BONUS: f32 = 0.05;
pub(crate) const TIER_SECOND_BONUS: f32 = 0.10;
pub(crate) const TIER_THIRD_BONUS: f32 = 0.15;

// Run length ---------------------------------------------------------------
pub(crate) const DEFAULT_ROUNDS_TO_WIN: u32 = 30;

// Probability bounds -------------------------------------------------------
pub(crate) const RATE_FLOOR: f32 = 0.0;
pub(crate) const RATE_CEILING: f32 = 1.0;

//! Centralized rule constants for the forecasting engine.
//!
//! These values mirror the authoritative game's integer arithmetic. Keeping
//! them together means a rules change on the game side maps to a single
//! reviewed edit here rather than scattered literals.

// Character ---------------------------------------------------------------
pub(crate) const STARTING_HEALTH: u16 = 100;
pub(crate) const VITALITY_HEALTH_FACTOR: u16 = 20;
pub(crate) const MINIMUM_LEVEL: u16 = 1;
pub(crate) const POTION_HEALTH_AMOUNT: u16 = 10;

// Market ------------------------------------------------------------------
pub(crate) const ITEM_TIER_PRICE: u16 = 4;
pub(crate) const ITEM_MINIMUM_PRICE: u16 = 1;
pub(crate) const POTION_CHARISMA_DISCOUNT: u16 = 2;
pub(crate) const POTION_MINIMUM_PRICE: u16 = 1;

// Items -------------------------------------------------------------------
pub(crate) const TIER_COUNT: u8 = 5;
pub(crate) const ITEM_MINIMUM_XP: u32 = 1;
pub(crate) const ITEM_MAX_GREATNESS: u16 = 20;

// Combat ------------------------------------------------------------------
pub(crate) const CRITICAL_PERCENT_PER_MULTIPLIER: u32 = 20;
pub(crate) const MAX_CRITICAL_MULTIPLIER: u8 = 5;
pub(crate) const CRITICAL_HIT_ODDS: u32 = 5;
pub(crate) const SPECIAL_NAME_UNLOCK_LEVEL: u16 = 19;
pub(crate) const SPECIAL_PREFIX_DAMAGE_MULTIPLIER: u32 = 8;
pub(crate) const SPECIAL_SUFFIX_DAMAGE_MULTIPLIER: u32 = 2;
pub(crate) const STRENGTH_DAMAGE_PERCENT: u32 = 10;
pub(crate) const MINIMUM_DAMAGE_TO_CHARACTER: u32 = 2;
pub(crate) const MINIMUM_DAMAGE_TO_BEAST: u32 = 4;
pub(crate) const UNARMED_ATTACK: u32 = 1;

// Encounter generation ----------------------------------------------------
pub(crate) const ENCOUNTER_KIND_COUNT: u32 = 3;
pub(crate) const ADVERSARY_COUNT: u32 = 75;
pub(crate) const DISCOVERY_KIND_COUNT: u32 = 3;
pub(crate) const ATTACK_LOCATION_COUNT: u32 = 5;
pub(crate) const LEVEL_RANGE_PER_LEVEL: u32 = 3;
pub(crate) const HEALTH_RANGE_PER_LEVEL: u32 = 20;
pub(crate) const BEAST_MAX_HEALTH: u32 = 1023;
pub(crate) const HEALTH_DISCOVERY_MULTIPLIER: u32 = 2;
/// `(minimum character level, level bonus, health bonus)`, highest band first.
pub(crate) const DIFFICULTY_BANDS: [(u16, u32, u32); 4] = [
    (50, 80, 500),
    (40, 40, 400),
    (30, 20, 200),
    (20, 10, 100),
];
/// Cumulative percentage thresholds for loot tiers T1..T5.
pub(crate) const LOOT_TIER_THRESHOLDS: [u32; 5] = [2, 8, 20, 50, 100];
pub(crate) const ENCOUNTER_DOMAIN_TAG: &[u8] = b"forecast.encounter.v1";

// Rewards -----------------------------------------------------------------
pub(crate) const XP_REWARD_DIVISOR: u32 = 2;
pub(crate) const MINIMUM_XP_REWARD: u32 = 4;
pub(crate) const GOLD_REWARD_DIVISOR: u32 = 2;
pub(crate) const MINIMUM_GOLD_REWARD: u32 = 1;
pub(crate) const DISCOVERY_XP_REWARD: u32 = 1;
pub(crate) const FLEE_XP_REWARD: u32 = 1;

// Forecast horizon --------------------------------------------------------
pub(crate) const DEFAULT_HORIZON: usize = 10;
pub(crate) const MAX_HORIZON: usize = 20;

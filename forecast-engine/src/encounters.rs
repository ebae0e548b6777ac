//! Deterministic encounter generation.
//!
//! An encounter is a pure function of `(xp, entropy, has_beast, level)`.
//! The game derives the same encounter at the same XP point, so the
//! forecast can only predict it, never influence it.
use log::trace;
use serde::Serialize;

use crate::catalog::{
    AttackType, SPECIAL_PREFIXES, SPECIAL_SUFFIXES, Slot, Tier, banded_profile, beast_name,
    items_of_tier, obstacle_name,
};
use crate::combat::{CriticalHit, IncomingAttack, SpecialName, calculate_level, damage_to_character};
use crate::constants::{
    ADVERSARY_COUNT, ATTACK_LOCATION_COUNT, BEAST_MAX_HEALTH, CRITICAL_HIT_ODDS, DIFFICULTY_BANDS,
    DISCOVERY_KIND_COUNT, DISCOVERY_XP_REWARD, ENCOUNTER_KIND_COUNT, GOLD_REWARD_DIVISOR,
    HEALTH_DISCOVERY_MULTIPLIER, HEALTH_RANGE_PER_LEVEL, LEVEL_RANGE_PER_LEVEL,
    LOOT_TIER_THRESHOLDS, MAX_CRITICAL_MULTIPLIER, MINIMUM_GOLD_REWARD, MINIMUM_LEVEL,
    MINIMUM_XP_REWARD, SPECIAL_NAME_UNLOCK_LEVEL, XP_REWARD_DIVISOR,
};
use crate::entropy::{Entropy, Selectors};
use crate::numbers::saturating_u16;

// Selector word assignments.
const KIND: usize = 0;
const IDENTITY: usize = 1;
const LEVEL: usize = 2;
const HEALTH: usize = 3;
const DODGE: usize = 4;
const CRITICAL: usize = 5;
const LOCATION: usize = 6;
const NAMING: usize = 7;

/// A beast fight offered at one XP point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeastEncounter {
    pub id: u8,
    pub name: &'static str,
    pub attack_type: AttackType,
    pub tier: Tier,
    pub level: u16,
    pub health: u16,
    pub power: u32,
    pub special: Option<SpecialName>,
    /// Ambush roll checked against wisdom.
    pub dodge_roll: u16,
    /// Damage of one strike against an unarmored location.
    pub damage: u32,
    pub critical: CriticalHit,
    pub location: Slot,
    pub xp_reward: u32,
    pub gold_reward: u32,
    /// Escape roll checked against dexterity.
    pub flee_roll: u16,
    /// Carried over from an unresolved ambush; it does not strike first.
    pub pending: bool,
}

impl BeastEncounter {
    #[must_use]
    pub fn attack(&self, critical: CriticalHit) -> IncomingAttack<'_> {
        IncomingAttack {
            attack_type: self.attack_type,
            power: self.power,
            critical,
            special: self.special.as_ref(),
        }
    }
}

/// A trap or hazard; it strikes once unless intelligence dodges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObstacleEncounter {
    pub id: u8,
    pub name: &'static str,
    pub attack_type: AttackType,
    pub tier: Tier,
    pub level: u16,
    pub power: u32,
    /// Roll checked against intelligence.
    pub dodge_roll: u16,
    pub damage: u32,
    pub critical: CriticalHit,
    pub location: Slot,
    pub xp_reward: u32,
}

impl ObstacleEncounter {
    #[must_use]
    pub const fn attack(&self) -> IncomingAttack<'static> {
        IncomingAttack {
            attack_type: self.attack_type,
            power: self.power,
            critical: self.critical,
            special: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discovery {
    Health { amount: u32 },
    Gold { amount: u32 },
    Loot { item: u8, name: &'static str, tier: Tier },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncounterKind {
    Beast(BeastEncounter),
    Obstacle(ObstacleEncounter),
    Discovery { reward: Discovery },
}

/// One generated encounter and the XP the character holds after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encounter {
    pub xp: u32,
    pub next_xp: u32,
    pub kind: EncounterKind,
}

impl Encounter {
    #[must_use]
    pub const fn xp_reward(&self) -> u32 {
        self.next_xp - self.xp
    }

    #[must_use]
    pub const fn is_beast(&self) -> bool {
        matches!(self.kind, EncounterKind::Beast(_))
    }

    /// Short label for reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.kind {
            EncounterKind::Beast(beast) => match &beast.special {
                Some(special) => format!(
                    "\"{} {}\" {} (T{} lvl {}, {} hp)",
                    special.prefix,
                    special.suffix,
                    beast.name,
                    beast.tier.number(),
                    beast.level,
                    beast.health
                ),
                None => format!(
                    "{} (T{} lvl {}, {} hp)",
                    beast.name,
                    beast.tier.number(),
                    beast.level,
                    beast.health
                ),
            },
            EncounterKind::Obstacle(obstacle) => format!(
                "{} (T{} lvl {}, {} dmg)",
                obstacle.name,
                obstacle.tier.number(),
                obstacle.level,
                obstacle.damage
            ),
            EncounterKind::Discovery { reward } => match reward {
                Discovery::Health { amount } => format!("found {amount} health"),
                Discovery::Gold { amount } => format!("found {amount} gold"),
                Discovery::Loot { name, .. } => format!("found {name}"),
            },
        }
    }
}

/// Level and health bonuses for characters deep into the run.
fn difficulty_bonus(level: u16) -> (u32, u32) {
    DIFFICULTY_BANDS
        .iter()
        .find(|(minimum, _, _)| level >= *minimum)
        .map_or((0, 0), |(_, level_bonus, health_bonus)| {
            (*level_bonus, *health_bonus)
        })
}

fn roll(selectors: &Selectors, index: usize, level: u16) -> u16 {
    saturating_u16(1 + selectors.pick(index, u32::from(level)))
}

fn critical_hit(selectors: &Selectors) -> CriticalHit {
    let word = selectors.word(CRITICAL);
    if word % CRITICAL_HIT_ODDS != 0 {
        return CriticalHit::NONE;
    }
    let tiers = u32::from(MAX_CRITICAL_MULTIPLIER);
    // Bounded by MAX_CRITICAL_MULTIPLIER, so the narrowing is lossless.
    CriticalHit::new((1 + (word / CRITICAL_HIT_ODDS) % tiers) as u8)
}

fn location(selectors: &Selectors) -> Slot {
    let index = selectors.pick(LOCATION, ATTACK_LOCATION_COUNT) as usize;
    Slot::ATTACK_LOCATIONS[index]
}

/// Shared identity and scaling for beasts and obstacles.
struct Adversary {
    id: u8,
    attack_type: AttackType,
    tier: Tier,
    level: u16,
    power: u32,
}

fn adversary(selectors: &Selectors, level: u16) -> Adversary {
    let (level_bonus, _) = difficulty_bonus(level);
    // Ids are 1..=75; the modulus keeps the narrowing in range.
    let id = (selectors.pick(IDENTITY, ADVERSARY_COUNT) + 1) as u8;
    let (attack_type, tier) = banded_profile(id).unwrap_or((AttackType::Magic, Tier::T5));
    let range = u32::from(level) * LEVEL_RANGE_PER_LEVEL;
    let encounter_level = saturating_u16(1 + selectors.pick(LEVEL, range) + level_bonus);
    Adversary {
        id,
        attack_type,
        tier,
        level: encounter_level,
        power: u32::from(encounter_level) * tier.multiplier(),
    }
}

const fn xp_reward(power: u32) -> u32 {
    let reward = power / XP_REWARD_DIVISOR;
    if reward < MINIMUM_XP_REWARD {
        MINIMUM_XP_REWARD
    } else {
        reward
    }
}

const fn gold_reward(power: u32) -> u32 {
    let reward = power / GOLD_REWARD_DIVISOR;
    if reward < MINIMUM_GOLD_REWARD {
        MINIMUM_GOLD_REWARD
    } else {
        reward
    }
}

fn special_name(selectors: &Selectors, beast_level: u16) -> Option<SpecialName> {
    if beast_level < SPECIAL_NAME_UNLOCK_LEVEL {
        return None;
    }
    let word = selectors.word(NAMING);
    let prefix = SPECIAL_PREFIXES[(word % SPECIAL_PREFIXES.len() as u32) as usize];
    let suffix = SPECIAL_SUFFIXES[((word >> 16) % SPECIAL_SUFFIXES.len() as u32) as usize];
    Some(SpecialName { prefix, suffix })
}

fn beast(selectors: &Selectors, level: u16, pending: bool) -> BeastEncounter {
    let base = adversary(selectors, level);
    let (_, health_bonus) = difficulty_bonus(level);
    let health_range = u32::from(level) * HEALTH_RANGE_PER_LEVEL;
    let health = (1 + selectors.pick(HEALTH, health_range) + health_bonus).min(BEAST_MAX_HEALTH);
    let critical = critical_hit(selectors);
    let special = special_name(selectors, base.level);
    let flee_roll = saturating_u16(1 + (selectors.word(NAMING) >> 8) % u32::from(level.max(1)));
    let mut beast = BeastEncounter {
        id: base.id,
        name: beast_name(base.id).unwrap_or("Beast"),
        attack_type: base.attack_type,
        tier: base.tier,
        level: base.level,
        health: saturating_u16(health),
        power: base.power,
        special,
        dodge_roll: roll(selectors, DODGE, level),
        damage: 0,
        critical,
        location: location(selectors),
        xp_reward: xp_reward(base.power),
        gold_reward: gold_reward(base.power),
        flee_roll,
        pending,
    };
    beast.damage = damage_to_character(beast.attack(critical), None);
    beast
}

fn obstacle(selectors: &Selectors, level: u16) -> ObstacleEncounter {
    let base = adversary(selectors, level);
    let mut obstacle = ObstacleEncounter {
        id: base.id,
        name: obstacle_name(base.id).unwrap_or("Obstacle"),
        attack_type: base.attack_type,
        tier: base.tier,
        level: base.level,
        power: base.power,
        dodge_roll: roll(selectors, DODGE, level),
        damage: 0,
        critical: critical_hit(selectors),
        location: location(selectors),
        xp_reward: xp_reward(base.power),
    };
    obstacle.damage = damage_to_character(obstacle.attack(), None);
    obstacle
}

fn loot_tier(selectors: &Selectors) -> Tier {
    let roll = selectors.pick(LEVEL, 100);
    LOOT_TIER_THRESHOLDS
        .iter()
        .zip(Tier::ALL)
        .find(|(threshold, _)| roll < **threshold)
        .map_or(Tier::T5, |(_, tier)| tier)
}

fn discovery(selectors: &Selectors, level: u16) -> Discovery {
    let amount = 1 + selectors.pick(LEVEL, u32::from(level));
    match selectors.pick(IDENTITY, DISCOVERY_KIND_COUNT) {
        0 => Discovery::Health {
            amount: amount * HEALTH_DISCOVERY_MULTIPLIER,
        },
        1 => Discovery::Gold { amount },
        _ => {
            let tier = loot_tier(selectors);
            let count = u32::try_from(items_of_tier(tier).count()).unwrap_or(u32::MAX);
            let index = selectors.pick(HEALTH, count) as usize;
            match items_of_tier(tier).nth(index) {
                Some(def) => Discovery::Loot {
                    item: def.id,
                    name: def.name,
                    tier,
                },
                None => Discovery::Gold { amount },
            }
        }
    }
}

/// Generate the encounter the game produces at `xp`.
///
/// A pending beast always yields that beast, flagged as pending. `level` is
/// the character level at this XP point and scales every roll; a zero level
/// is treated as level one.
#[must_use]
pub fn generate_encounter(xp: u32, entropy: &Entropy, has_beast: bool, level: u16) -> Encounter {
    let level = level.max(MINIMUM_LEVEL);
    let selectors = entropy.selectors(xp);
    let kind_roll = if has_beast {
        0
    } else {
        selectors.pick(KIND, ENCOUNTER_KIND_COUNT)
    };
    let (kind, reward) = match kind_roll {
        0 => {
            let beast = beast(&selectors, level, has_beast);
            let reward = beast.xp_reward;
            (EncounterKind::Beast(beast), reward)
        }
        1 => {
            let obstacle = obstacle(&selectors, level);
            let reward = obstacle.xp_reward;
            (EncounterKind::Obstacle(obstacle), reward)
        }
        _ => (
            EncounterKind::Discovery {
                reward: discovery(&selectors, level),
            },
            DISCOVERY_XP_REWARD,
        ),
    };
    let encounter = Encounter {
        xp,
        next_xp: xp.saturating_add(reward),
        kind,
    };
    trace!(
        "encounter at xp {xp} (level {level}): {}",
        encounter.describe()
    );
    encounter
}

/// Flat, non-branching forecast of the next `horizon` encounters.
///
/// Each encounter starts at the previous one's `next_xp`; the level is
/// recomputed from XP after the first. `has_beast` applies only to the
/// first encounter.
#[must_use]
pub fn list_all_encounters(
    start_xp: u32,
    entropy: &Entropy,
    has_beast: bool,
    level: u16,
    horizon: usize,
) -> Vec<Encounter> {
    let mut encounters = Vec::with_capacity(horizon);
    let mut xp = start_xp;
    for index in 0..horizon {
        let (pending, current_level) = if index == 0 {
            (has_beast, level)
        } else {
            (false, calculate_level(xp))
        };
        let encounter = generate_encounter(xp, entropy, pending, current_level);
        xp = encounter.next_xp;
        encounters.push(encounter);
    }
    encounters
}

//! Character state as the simulation sees it, plus preparation from an
//! indexer snapshot and the player's pending market actions.
use log::{debug, warn};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::combat::{apply_damage, apply_healing, calculate_level, item_price, max_health};
use crate::constants::{POTION_HEALTH_AMOUNT, VITALITY_HEALTH_FACTOR};
use crate::error::ForecastError;
use crate::items::ItemPurchase;
use crate::numbers::{non_negative, saturating_u16};

/// The six character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u16,
    pub dexterity: u16,
    pub vitality: u16,
    pub intelligence: u16,
    pub wisdom: u16,
    pub charisma: u16,
}

impl Stats {
    #[must_use]
    pub fn with_upgrades(self, upgrades: &StatUpgrades) -> Self {
        Self {
            strength: self.strength.saturating_add(upgrades.strength),
            dexterity: self.dexterity.saturating_add(upgrades.dexterity),
            vitality: self.vitality.saturating_add(upgrades.vitality),
            intelligence: self.intelligence.saturating_add(upgrades.intelligence),
            wisdom: self.wisdom.saturating_add(upgrades.wisdom),
            charisma: self.charisma.saturating_add(upgrades.charisma),
        }
    }
}

/// Stat points the player has allocated but not yet submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatUpgrades {
    pub strength: u16,
    pub dexterity: u16,
    pub vitality: u16,
    pub intelligence: u16,
    pub wisdom: u16,
    pub charisma: u16,
}

impl StatUpgrades {
    #[must_use]
    pub fn total(&self) -> u32 {
        [
            self.strength,
            self.dexterity,
            self.vitality,
            self.intelligence,
            self.wisdom,
            self.charisma,
        ]
        .into_iter()
        .map(u32::from)
        .sum()
    }
}

/// Immutable snapshot of a character at one point of a forecast.
///
/// Every transition returns a new value; branches of the decision tree
/// never share a mutable state. Level and max health are derived.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterState {
    pub id: u64,
    pub xp: u32,
    pub stats: Stats,
    pub health: u16,
    pub gold: u16,
    /// Stat points earned by level-ups inside the simulation.
    pub stat_points: u16,
}

impl CharacterState {
    #[must_use]
    pub fn level(&self) -> u16 {
        calculate_level(self.xp)
    }

    #[must_use]
    pub const fn max_health(&self) -> u16 {
        max_health(self.stats.vitality)
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    #[must_use]
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.health = apply_damage(self.health, damage);
        self
    }

    #[must_use]
    pub fn with_healing(mut self, amount: u32) -> Self {
        self.health = apply_healing(self.health, amount, self.max_health());
        self
    }

    #[must_use]
    pub fn with_gold_gain(mut self, amount: u32) -> Self {
        self.gold = saturating_u16(u32::from(self.gold).saturating_add(amount));
        self
    }

    /// Spend gold, stopping at zero when the purse is short.
    #[must_use]
    pub fn with_gold_spent(mut self, amount: u32) -> Self {
        let available = u32::from(self.gold);
        if amount > available {
            warn!(
                "character {} spends {amount} gold with only {available}; clamping to zero",
                self.id
            );
        }
        self.gold = saturating_u16(available.saturating_sub(amount));
        self
    }

    #[must_use]
    pub fn with_xp_gain(mut self, amount: u32) -> Self {
        self.xp = self.xp.saturating_add(amount);
        self
    }

    #[must_use]
    pub fn with_level_ups(mut self, levels: u16) -> Self {
        self.stat_points = self.stat_points.saturating_add(levels);
        self
    }

    /// Apply pending stat points. Each vitality point also restores the
    /// health it adds to the cap.
    #[must_use]
    pub fn apply_upgrades(mut self, upgrades: &StatUpgrades) -> Self {
        self.stats = self.stats.with_upgrades(upgrades);
        let bonus = u32::from(upgrades.vitality) * u32::from(VITALITY_HEALTH_FACTOR);
        self.with_healing(bonus)
    }

    #[must_use]
    pub fn apply_potions(self, count: u16) -> Self {
        self.with_healing(u32::from(count) * u32::from(POTION_HEALTH_AMOUNT))
    }
}

impl Serialize for CharacterState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CharacterState", 8)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("xp", &self.xp)?;
        state.serialize_field("level", &self.level())?;
        state.serialize_field("stats", &self.stats)?;
        state.serialize_field("health", &self.health)?;
        state.serialize_field("max_health", &self.max_health())?;
        state.serialize_field("gold", &self.gold)?;
        state.serialize_field("stat_points", &self.stat_points)?;
        state.end()
    }
}

/// Character fields as delivered by the indexer. Values are signed there
/// and are range-checked when converted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AdventurerSnapshot {
    #[serde(default)]
    pub id: i64,
    pub xp: i64,
    pub health: i64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub strength: i64,
    #[serde(default)]
    pub dexterity: i64,
    #[serde(default)]
    pub vitality: i64,
    #[serde(default)]
    pub intelligence: i64,
    #[serde(default)]
    pub wisdom: i64,
    #[serde(default)]
    pub charisma: i64,
}

impl TryFrom<&AdventurerSnapshot> for CharacterState {
    type Error = ForecastError;

    fn try_from(snapshot: &AdventurerSnapshot) -> Result<Self, Self::Error> {
        let stats = Stats {
            strength: non_negative("strength", snapshot.strength)?,
            dexterity: non_negative("dexterity", snapshot.dexterity)?,
            vitality: non_negative("vitality", snapshot.vitality)?,
            intelligence: non_negative("intelligence", snapshot.intelligence)?,
            wisdom: non_negative("wisdom", snapshot.wisdom)?,
            charisma: non_negative("charisma", snapshot.charisma)?,
        };
        let health: u16 = non_negative("health", snapshot.health)?;
        let cap = max_health(stats.vitality);
        if health > cap {
            return Err(ForecastError::invalid(
                "health",
                format!("{health} exceeds max health {cap}"),
            ));
        }
        Ok(Self {
            id: non_negative("id", snapshot.id)?,
            xp: non_negative("xp", snapshot.xp)?,
            stats,
            health,
            gold: non_negative("gold", snapshot.gold)?,
            stat_points: 0,
        })
    }
}

/// Validate a snapshot and apply the player's pending actions in the order
/// the game does: stat upgrades, then potions, then purchases.
///
/// Only purchases equipped on arrival are charged, at the upgraded charisma.
/// Bag-only purchases and potions leave the purse untouched. A purse that
/// cannot cover the charge ends at zero gold rather than failing.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidInput`] for out-of-range snapshot fields
/// and [`ForecastError::UnknownItem`] for purchases outside the catalog.
pub fn prepare_character(
    snapshot: &AdventurerSnapshot,
    upgrades: &StatUpgrades,
    potions: u16,
    purchases: &[ItemPurchase],
) -> Result<CharacterState, ForecastError> {
    let upgraded = CharacterState::try_from(snapshot)?.apply_upgrades(upgrades);
    let charisma = upgraded.stats.charisma;

    let mut item_cost = 0u32;
    for purchase in purchases {
        let def = purchase.definition()?;
        if purchase.equip {
            item_cost += u32::from(item_price(def.tier, charisma));
        }
    }

    let prepared = upgraded.apply_potions(potions).with_gold_spent(item_cost);
    debug!(
        "prepared character {}: {} stat points, {potions} potions, {} purchases ({item_cost} gold)",
        prepared.id,
        upgrades.total(),
        purchases.len()
    );
    Ok(prepared)
}

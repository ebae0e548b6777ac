//! Equipped items and loadout assembly.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{ItemDef, ItemType, Slot, Tier, item_by_id, item_by_name};
use crate::combat::{AffixMatch, SpecialName, item_greatness};
use crate::constants::ITEM_MINIMUM_XP;
use crate::error::ForecastError;
use crate::numbers::non_negative;

/// An item as it sits in a character's equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: u8,
    pub name: &'static str,
    pub slot: Slot,
    pub tier: Tier,
    pub item_type: ItemType,
    pub special2: Option<String>,
    pub special3: Option<String>,
    /// Item experience, never below one.
    pub xp: u32,
}

impl Item {
    #[must_use]
    pub fn from_def(
        def: &ItemDef,
        xp: u32,
        special2: Option<String>,
        special3: Option<String>,
    ) -> Self {
        Self {
            id: def.id,
            name: def.name,
            slot: def.slot,
            tier: def.tier,
            item_type: def.item_type,
            special2,
            special3,
            xp: xp.max(ITEM_MINIMUM_XP),
        }
    }

    /// A freshly bought item: level one, no affixes.
    #[must_use]
    pub fn purchased(def: &ItemDef) -> Self {
        Self::from_def(def, ITEM_MINIMUM_XP, None, None)
    }

    #[must_use]
    pub fn greatness(&self) -> u16 {
        item_greatness(self.xp)
    }

    #[must_use]
    pub fn affix_match(&self, name: &SpecialName) -> AffixMatch {
        name.matches(self.special2.as_deref(), self.special3.as_deref())
    }
}

/// Item record as reported by the indexer for the character's bag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ItemRecord {
    /// Display name, resolved through the catalog.
    pub item: String,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub xp: i64,
    #[serde(default)]
    pub special2: Option<String>,
    #[serde(default)]
    pub special3: Option<String>,
}

/// A pending market purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ItemPurchase {
    /// Catalog id of the item.
    pub item: u8,
    /// Whether the purchase is equipped immediately.
    #[serde(default)]
    pub equip: bool,
}

impl ItemPurchase {
    /// Catalog definition for this purchase.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::UnknownItem`] for ids outside the catalog.
    pub fn definition(&self) -> Result<&'static ItemDef, ForecastError> {
        item_by_id(self.item).ok_or_else(|| ForecastError::UnknownItem(format!("#{}", self.item)))
    }
}

/// How the equipped weapon and worn armor relate to a beast's special name.
///
/// A weapon match raises the character's damage; an armor match raises the
/// beast's damage against that piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NameMatches {
    pub weapon: AffixMatch,
    /// Union over every armor piece.
    pub armor: AffixMatch,
}

/// The set of equipped items, at most one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Loadout {
    items: SmallVec<[Item; 8]>,
}

impl Loadout {
    /// Build a loadout directly from already-resolved items. A later item
    /// replaces an earlier one in the same slot.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut loadout = Self::default();
        for item in items {
            loadout.equip(item);
        }
        loadout
    }

    /// Resolve the equipped item records and overlay pending equip-purchases.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::UnknownItem`] when a record or purchase does
    /// not resolve through the catalog, and [`ForecastError::InvalidInput`]
    /// for negative item experience.
    pub fn assemble(
        records: &[ItemRecord],
        purchases: &[ItemPurchase],
    ) -> Result<Self, ForecastError> {
        let mut loadout = Self::default();
        for record in records.iter().filter(|record| record.equipped) {
            let def = item_by_name(&record.item)
                .ok_or_else(|| ForecastError::UnknownItem(record.item.clone()))?;
            let xp = non_negative::<u32>("item xp", record.xp)?;
            loadout.equip(Item::from_def(
                def,
                xp,
                record.special2.clone(),
                record.special3.clone(),
            ));
        }
        for purchase in purchases.iter().filter(|purchase| purchase.equip) {
            loadout.equip(Item::purchased(purchase.definition()?));
        }
        Ok(loadout)
    }

    /// Place an item, replacing whatever occupied its slot.
    pub fn equip(&mut self, item: Item) {
        if let Some(existing) = self.items.iter_mut().find(|held| held.slot == item.slot) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    #[must_use]
    pub fn in_slot(&self, slot: Slot) -> Option<&Item> {
        self.items.iter().find(|item| item.slot == slot)
    }

    #[must_use]
    pub fn weapon(&self) -> Option<&Item> {
        self.in_slot(Slot::Weapon)
    }

    /// Worn armor pieces, excluding weapon and jewelry.
    pub fn armor(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.slot.is_armor())
    }

    #[must_use]
    pub fn name_matches(&self, name: &SpecialName) -> NameMatches {
        let armor = self
            .armor()
            .map(|item| item.affix_match(name))
            .fold(AffixMatch::default(), |acc, matched| AffixMatch {
                prefix: acc.prefix || matched.prefix,
                suffix: acc.suffix || matched.suffix,
            });
        NameMatches {
            weapon: self
                .weapon()
                .map_or_else(AffixMatch::default, |item| item.affix_match(name)),
            armor,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//! Pure combat math shared by the encounter generator and the tree builder.
//!
//! All arithmetic is unsigned integer math in the same order the
//! authoritative game applies it: integer division floors, and clamping to
//! minimums happens only after armor is subtracted.
use serde::Serialize;

use crate::catalog::{ArmorType, AttackType, Tier};
use crate::constants::{
    CRITICAL_PERCENT_PER_MULTIPLIER, ITEM_MAX_GREATNESS, ITEM_MINIMUM_PRICE, ITEM_TIER_PRICE,
    MAX_CRITICAL_MULTIPLIER, MINIMUM_DAMAGE_TO_BEAST, MINIMUM_DAMAGE_TO_CHARACTER, MINIMUM_LEVEL,
    POTION_CHARISMA_DISCOUNT, POTION_MINIMUM_PRICE, SPECIAL_PREFIX_DAMAGE_MULTIPLIER,
    SPECIAL_SUFFIX_DAMAGE_MULTIPLIER, STARTING_HEALTH, STRENGTH_DAMAGE_PERCENT, UNARMED_ATTACK,
    VITALITY_HEALTH_FACTOR,
};
use crate::items::Item;
use crate::numbers::{saturating_u16, saturating_u32};

/// Character level for a given amount of experience: `max(1, isqrt(xp))`.
#[must_use]
pub fn calculate_level(xp: u32) -> u16 {
    saturating_u16(xp.isqrt()).max(MINIMUM_LEVEL)
}

/// Health cap for a given vitality.
#[must_use]
pub const fn max_health(vitality: u16) -> u16 {
    STARTING_HEALTH.saturating_add(vitality.saturating_mul(VITALITY_HEALTH_FACTOR))
}

/// Market price of an item: `(6 - tier) * 4`, discounted one gold per
/// charisma point, never below one gold.
#[must_use]
pub fn item_price(tier: Tier, charisma: u16) -> u16 {
    let base = saturating_u16(tier.multiplier()) * ITEM_TIER_PRICE;
    base.saturating_sub(charisma).max(ITEM_MINIMUM_PRICE)
}

/// Price of one health potion at the given level.
#[must_use]
pub fn potion_price(level: u16, charisma: u16) -> u16 {
    level
        .saturating_sub(charisma.saturating_mul(POTION_CHARISMA_DISCOUNT))
        .max(POTION_MINIMUM_PRICE)
}

/// A threat is avoided when the relevant stat meets or exceeds the roll.
#[must_use]
pub const fn dodge_succeeds(stat: u16, roll: u16) -> bool {
    stat >= roll
}

/// Critical-hit multiplier tier; zero means no critical hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CriticalHit(u8);

impl CriticalHit {
    pub const NONE: Self = Self(0);

    /// Build a multiplier, capping at the largest tier the game rolls.
    #[must_use]
    pub fn new(multiplier: u8) -> Self {
        Self(multiplier.min(MAX_CRITICAL_MULTIPLIER))
    }

    #[must_use]
    pub const fn multiplier(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_critical(self) -> bool {
        self.0 > 0
    }

    /// Extra damage percentage: `multiplier * 20`.
    #[must_use]
    pub const fn percent(self) -> u32 {
        self.0 as u32 * CRITICAL_PERCENT_PER_MULTIPLIER
    }

    /// Additional damage contributed on top of `damage`.
    #[must_use]
    pub const fn bonus(self, damage: u32) -> u32 {
        damage.saturating_mul(self.percent()) / 100
    }

    #[must_use]
    pub const fn apply(self, damage: u32) -> u32 {
        damage.saturating_add(self.bonus(damage))
    }
}

/// How well an attack type fares against an armor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effectiveness {
    Strong,
    Fair,
    Weak,
}

/// Elemental matchup. Missing armor always takes the strong result.
#[must_use]
pub const fn effectiveness(attack: AttackType, armor: Option<ArmorType>) -> Effectiveness {
    let Some(armor) = armor else {
        return Effectiveness::Strong;
    };
    match (attack, armor) {
        (AttackType::Magic, ArmorType::Metal)
        | (AttackType::Blade, ArmorType::Cloth)
        | (AttackType::Bludgeon, ArmorType::Hide) => Effectiveness::Strong,
        (AttackType::Magic, ArmorType::Hide)
        | (AttackType::Blade, ArmorType::Metal)
        | (AttackType::Bludgeon, ArmorType::Cloth) => Effectiveness::Weak,
        _ => Effectiveness::Fair,
    }
}

#[must_use]
pub const fn elemental_damage(base: u32, effectiveness: Effectiveness) -> u32 {
    match effectiveness {
        Effectiveness::Strong => base.saturating_add(base / 2),
        Effectiveness::Fair => base,
        Effectiveness::Weak => base - base / 2,
    }
}

/// Two-part special name carried by high-level beasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpecialName {
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl SpecialName {
    /// Compare against an item's optional `special2` / `special3` affixes.
    #[must_use]
    pub fn matches(&self, special2: Option<&str>, special3: Option<&str>) -> AffixMatch {
        AffixMatch {
            prefix: special2 == Some(self.prefix),
            suffix: special3 == Some(self.suffix),
        }
    }
}

/// Which halves of a special name an item shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AffixMatch {
    pub prefix: bool,
    pub suffix: bool,
}

impl AffixMatch {
    #[must_use]
    pub const fn any(self) -> bool {
        self.prefix || self.suffix
    }

    /// Bonus damage: prefix adds `base * 8`, suffix adds `base * 2`.
    #[must_use]
    pub const fn bonus(self, base: u32) -> u32 {
        let mut bonus = 0u32;
        if self.prefix {
            bonus = bonus.saturating_add(base.saturating_mul(SPECIAL_PREFIX_DAMAGE_MULTIPLIER));
        }
        if self.suffix {
            bonus = bonus.saturating_add(base.saturating_mul(SPECIAL_SUFFIX_DAMAGE_MULTIPLIER));
        }
        bonus
    }
}

/// Item level derived from its experience, capped at 20.
#[must_use]
pub fn item_greatness(xp: u32) -> u16 {
    saturating_u16(xp.isqrt()).clamp(1, ITEM_MAX_GREATNESS)
}

/// Defensive value of the armor piece covering the struck location.
#[must_use]
pub fn armor_value(armor: Option<&Item>) -> u32 {
    armor.map_or(0, |item| {
        u32::from(item_greatness(item.xp)) * item.tier.multiplier()
    })
}

/// An incoming attack from a beast or obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingAttack<'a> {
    pub attack_type: AttackType,
    pub power: u32,
    pub critical: CriticalHit,
    pub special: Option<&'a SpecialName>,
}

/// Damage dealt to the character by one attack landing on `armor`.
#[must_use]
pub fn damage_to_character(attack: IncomingAttack<'_>, armor: Option<&Item>) -> u32 {
    let armor_type = armor.and_then(|item| item.item_type.armor_type());
    let elemental = elemental_damage(attack.power, effectiveness(attack.attack_type, armor_type));
    let special = match (attack.special, armor) {
        (Some(name), Some(item)) => item.affix_match(name).bonus(attack.power),
        _ => 0,
    };
    let critical = attack.critical.bonus(elemental);
    elemental
        .saturating_add(special)
        .saturating_add(critical)
        .saturating_sub(armor_value(armor))
        .max(MINIMUM_DAMAGE_TO_CHARACTER)
}

/// The defensive side of a beast as seen by the character's weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeastDefense<'a> {
    pub attack_type: AttackType,
    pub tier: Tier,
    pub level: u16,
    pub special: Option<&'a SpecialName>,
}

/// Damage the character deals to a beast per successful hit.
#[must_use]
pub fn damage_to_beast(weapon: Option<&Item>, strength: u16, beast: BeastDefense<'_>) -> u32 {
    let (elemental, special) = match weapon {
        Some(item) => {
            let base = u32::from(item_greatness(item.xp)) * item.tier.multiplier();
            let elemental = item.item_type.attack_type().map_or(base, |attack| {
                elemental_damage(
                    base,
                    effectiveness(attack, Some(beast.attack_type.beast_armor())),
                )
            });
            let special = beast
                .special
                .map_or(0, |name| item.affix_match(name).bonus(base));
            (elemental, special)
        }
        None => (UNARMED_ATTACK, 0),
    };
    let strength_bonus = saturating_u32(
        u64::from(elemental) * u64::from(strength) * u64::from(STRENGTH_DAMAGE_PERCENT) / 100,
    );
    let beast_armor = u32::from(beast.level) * beast.tier.multiplier();
    elemental
        .saturating_add(special)
        .saturating_add(strength_bonus)
        .saturating_sub(beast_armor)
        .max(MINIMUM_DAMAGE_TO_BEAST)
}

/// Subtract damage from health, stopping at zero.
#[must_use]
pub fn apply_damage(health: u16, damage: u32) -> u16 {
    saturating_u16(u32::from(health).saturating_sub(damage))
}

/// Add health, never exceeding `max`.
#[must_use]
pub fn apply_healing(health: u16, amount: u32, max: u16) -> u16 {
    saturating_u16(u32::from(health).saturating_add(amount)).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::item_by_name;

    fn equip(name: &str, xp: u32) -> Item {
        Item::from_def(item_by_name(name).unwrap(), xp, None, None)
    }

    #[test]
    fn level_is_isqrt_with_floor_of_one() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(3), 1);
        assert_eq!(calculate_level(4), 2);
        assert_eq!(calculate_level(99), 9);
        assert_eq!(calculate_level(100), 10);
        assert_eq!(calculate_level(u32::MAX), 65_535);
    }

    #[test]
    fn level_is_monotonic() {
        let mut previous = calculate_level(0);
        for xp in 1..20_000 {
            let level = calculate_level(xp);
            assert!(level >= previous, "level dropped at xp {xp}");
            previous = level;
        }
    }

    #[test]
    fn max_health_scales_with_vitality() {
        assert_eq!(max_health(0), 100);
        assert_eq!(max_health(3), 160);
        assert_eq!(max_health(u16::MAX), u16::MAX);
    }

    #[test]
    fn prices_apply_charisma_and_floor() {
        assert_eq!(item_price(Tier::T1, 0), 20);
        assert_eq!(item_price(Tier::T5, 0), 4);
        assert_eq!(item_price(Tier::T3, 5), 7);
        assert_eq!(item_price(Tier::T5, 10), 1);
        assert_eq!(potion_price(10, 2), 6);
        assert_eq!(potion_price(3, 4), 1);
    }

    #[test]
    fn dodge_requires_stat_at_least_roll() {
        assert!(dodge_succeeds(3, 3));
        assert!(dodge_succeeds(4, 3));
        assert!(!dodge_succeeds(2, 3));
    }

    #[test]
    fn critical_multiplier_maps_to_twenty_percent_steps() {
        assert!(!CriticalHit::NONE.is_critical());
        assert_eq!(CriticalHit::NONE.apply(50), 50);
        assert_eq!(CriticalHit::new(1).percent(), 20);
        assert_eq!(CriticalHit::new(3).apply(50), 80);
        assert_eq!(CriticalHit::new(9).multiplier(), 5);
        assert_eq!(CriticalHit::new(5).apply(10), 20);
    }

    #[test]
    fn elemental_matchups() {
        use AttackType::{Blade, Bludgeon, Magic};
        assert_eq!(effectiveness(Magic, Some(ArmorType::Metal)), Effectiveness::Strong);
        assert_eq!(effectiveness(Magic, Some(ArmorType::Hide)), Effectiveness::Weak);
        assert_eq!(effectiveness(Blade, Some(ArmorType::Hide)), Effectiveness::Fair);
        assert_eq!(effectiveness(Bludgeon, Some(ArmorType::Cloth)), Effectiveness::Weak);
        assert_eq!(effectiveness(Bludgeon, None), Effectiveness::Strong);
        assert_eq!(elemental_damage(7, Effectiveness::Strong), 10);
        assert_eq!(elemental_damage(7, Effectiveness::Weak), 4);
        assert_eq!(elemental_damage(7, Effectiveness::Fair), 7);
    }

    #[test]
    fn armor_reduces_damage_down_to_minimum() {
        let attack = IncomingAttack {
            attack_type: AttackType::Blade,
            power: 10,
            critical: CriticalHit::NONE,
            special: None,
        };
        // Unarmored: strong, 10 + 5.
        assert_eq!(damage_to_character(attack, None), 15);
        // Holy Chestplate (T1 metal, greatness 4): weak 5 - 20 armor -> minimum.
        let plate = equip("Holy Chestplate", 16);
        assert_eq!(damage_to_character(attack, Some(&plate)), 2);
        // Shirt (T5 cloth, greatness 1): strong 15 - 1.
        let shirt = equip("Shirt", 1);
        assert_eq!(damage_to_character(attack, Some(&shirt)), 14);
    }

    #[test]
    fn critical_and_special_stack_on_character_damage() {
        let special = SpecialName {
            prefix: "Agony",
            suffix: "Bane",
        };
        let mut hood = equip("Hood", 1);
        hood.special2 = Some("Agony".to_string());
        let attack = IncomingAttack {
            attack_type: AttackType::Magic,
            power: 10,
            critical: CriticalHit::new(1),
            special: Some(&special),
        };
        // Magic vs cloth is fair: 10, prefix +80, crit +2, armor -1.
        assert_eq!(damage_to_character(attack, Some(&hood)), 91);
    }

    #[test]
    fn beast_damage_uses_weapon_strength_and_armor() {
        let katana = equip("Katana", 1);
        let beast = BeastDefense {
            attack_type: AttackType::Magic,
            tier: Tier::T5,
            level: 2,
            special: None,
        };
        // Katana T1 greatness 1 = 5, blade vs cloth strong = 7, armor 2.
        assert_eq!(damage_to_beast(Some(&katana), 0, beast), 5);
        // Strength 10 doubles the elemental portion: 7 + 7 - 2.
        assert_eq!(damage_to_beast(Some(&katana), 10, beast), 12);
        // Unarmed hits floor at the minimum.
        assert_eq!(damage_to_beast(None, 0, beast), 4);
    }

    #[test]
    fn weapon_affixes_add_damage_against_named_beasts() {
        let name = SpecialName {
            prefix: "Agony",
            suffix: "Bane",
        };
        let beast = BeastDefense {
            attack_type: AttackType::Magic,
            tier: Tier::T5,
            level: 20,
            special: Some(&name),
        };
        let affixed = |special2: Option<&str>, special3: Option<&str>| {
            Item::from_def(
                item_by_name("Katana").unwrap(),
                400,
                special2.map(str::to_string),
                special3.map(str::to_string),
            )
        };
        // Greatness 20 on a T1 blade: base 100, strong against cloth 150,
        // beast armor 20.
        assert_eq!(damage_to_beast(Some(&affixed(None, None)), 0, beast), 130);
        // Prefix adds base * 8.
        assert_eq!(damage_to_beast(Some(&affixed(Some("Agony"), None)), 0, beast), 930);
        // Suffix adds base * 2.
        assert_eq!(damage_to_beast(Some(&affixed(None, Some("Bane"))), 0, beast), 330);
        assert_eq!(
            damage_to_beast(Some(&affixed(Some("Agony"), Some("Bane"))), 0, beast),
            1130
        );
        // Affixes for another name do nothing.
        assert_eq!(damage_to_beast(Some(&affixed(Some("Bane"), Some("Agony"))), 0, beast), 130);
    }

    #[test]
    fn health_changes_stay_in_bounds() {
        assert_eq!(apply_damage(10, 25), 0);
        assert_eq!(apply_damage(10, 3), 7);
        assert_eq!(apply_healing(90, 30, 100), 100);
        assert_eq!(apply_healing(40, 30, 100), 70);
    }
}

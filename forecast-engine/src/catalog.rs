//! Static game data: loot items, beasts, obstacles and special names.
//!
//! Every table here is fixed by the authoritative game; ids are 1-based and
//! index directly into the corresponding slice after subtracting one.
use serde::Serialize;

use crate::constants::TIER_COUNT;

/// Equipment slot an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    Weapon,
    Chest,
    Head,
    Waist,
    Foot,
    Hand,
    Neck,
    Ring,
}

impl Slot {
    /// Slots that can be struck by a beast or obstacle, in roll order.
    pub const ATTACK_LOCATIONS: [Self; 5] =
        [Self::Chest, Self::Head, Self::Waist, Self::Foot, Self::Hand];

    /// Whether an item in this slot is worn as armor.
    #[must_use]
    pub const fn is_armor(self) -> bool {
        matches!(
            self,
            Self::Chest | Self::Head | Self::Waist | Self::Foot | Self::Hand
        )
    }
}

/// Offensive class of a weapon, beast or obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttackType {
    Magic,
    Blade,
    Bludgeon,
}

impl AttackType {
    /// Armor class worn by beasts of this attack type.
    #[must_use]
    pub const fn beast_armor(self) -> ArmorType {
        match self {
            Self::Magic => ArmorType::Cloth,
            Self::Blade => ArmorType::Hide,
            Self::Bludgeon => ArmorType::Metal,
        }
    }
}

/// Defensive class of an armor item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArmorType {
    Cloth,
    Hide,
    Metal,
}

/// Combat class of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemType {
    Magic,
    Blade,
    Bludgeon,
    Cloth,
    Hide,
    Metal,
    Necklace,
    Ring,
}

impl ItemType {
    #[must_use]
    pub const fn attack_type(self) -> Option<AttackType> {
        match self {
            Self::Magic => Some(AttackType::Magic),
            Self::Blade => Some(AttackType::Blade),
            Self::Bludgeon => Some(AttackType::Bludgeon),
            _ => None,
        }
    }

    #[must_use]
    pub const fn armor_type(self) -> Option<ArmorType> {
        match self {
            Self::Cloth => Some(ArmorType::Cloth),
            Self::Hide => Some(ArmorType::Hide),
            Self::Metal => Some(ArmorType::Metal),
            _ => None,
        }
    }
}

/// Item tier, 1 (rarest, strongest) through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Tier {
    T1 = 1,
    T2 = 2,
    T3 = 3,
    T4 = 4,
    T5 = 5,
}

impl Tier {
    pub const ALL: [Self; 5] = [Self::T1, Self::T2, Self::T3, Self::T4, Self::T5];

    #[must_use]
    pub const fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::T1),
            2 => Some(Self::T2),
            3 => Some(Self::T3),
            4 => Some(Self::T4),
            5 => Some(Self::T5),
            _ => None,
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Power multiplier: `6 - tier`, so T1 scales by 5 and T5 by 1.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        (TIER_COUNT + 1 - self as u8) as u32
    }
}

impl From<Tier> for u8 {
    fn from(value: Tier) -> Self {
        value.number()
    }
}

/// Catalog entry for a loot item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemDef {
    pub id: u8,
    pub name: &'static str,
    pub slot: Slot,
    pub tier: Tier,
    pub item_type: ItemType,
}

const fn item(id: u8, name: &'static str, slot: Slot, tier: Tier, item_type: ItemType) -> ItemDef {
    ItemDef {
        id,
        name,
        slot,
        tier,
        item_type,
    }
}

use ItemType::{Blade, Bludgeon, Cloth, Hide, Magic, Metal, Necklace, Ring};
use Slot::{Chest, Foot, Hand, Head, Neck, Waist, Weapon};
use Tier::{T1, T2, T3, T4, T5};

/// All 101 loot items, ordered by id.
pub const ITEMS: &[ItemDef] = &[
    item(1, "Pendant", Neck, T1, Necklace),
    item(2, "Necklace", Neck, T1, Necklace),
    item(3, "Amulet", Neck, T1, Necklace),
    item(4, "Silver Ring", Slot::Ring, T2, Ring),
    item(5, "Bronze Ring", Slot::Ring, T3, Ring),
    item(6, "Platinum Ring", Slot::Ring, T1, Ring),
    item(7, "Titanium Ring", Slot::Ring, T1, Ring),
    item(8, "Gold Ring", Slot::Ring, T1, Ring),
    item(9, "Ghost Wand", Weapon, T1, Magic),
    item(10, "Grave Wand", Weapon, T2, Magic),
    item(11, "Bone Wand", Weapon, T3, Magic),
    item(12, "Wand", Weapon, T5, Magic),
    item(13, "Grimoire", Weapon, T1, Magic),
    item(14, "Chronicle", Weapon, T2, Magic),
    item(15, "Tome", Weapon, T3, Magic),
    item(16, "Book", Weapon, T5, Magic),
    item(17, "Divine Robe", Chest, T1, Cloth),
    item(18, "Silk Robe", Chest, T2, Cloth),
    item(19, "Linen Robe", Chest, T3, Cloth),
    item(20, "Robe", Chest, T4, Cloth),
    item(21, "Shirt", Chest, T5, Cloth),
    item(22, "Crown", Head, T1, Cloth),
    item(23, "Divine Hood", Head, T2, Cloth),
    item(24, "Silk Hood", Head, T3, Cloth),
    item(25, "Linen Hood", Head, T4, Cloth),
    item(26, "Hood", Head, T5, Cloth),
    item(27, "Brightsilk Sash", Waist, T1, Cloth),
    item(28, "Silk Sash", Waist, T2, Cloth),
    item(29, "Wool Sash", Waist, T3, Cloth),
    item(30, "Linen Sash", Waist, T4, Cloth),
    item(31, "Sash", Waist, T5, Cloth),
    item(32, "Divine Slippers", Foot, T1, Cloth),
    item(33, "Silk Slippers", Foot, T2, Cloth),
    item(34, "Wool Shoes", Foot, T3, Cloth),
    item(35, "Linen Shoes", Foot, T4, Cloth),
    item(36, "Shoes", Foot, T5, Cloth),
    item(37, "Divine Gloves", Hand, T1, Cloth),
    item(38, "Silk Gloves", Hand, T2, Cloth),
    item(39, "Wool Gloves", Hand, T3, Cloth),
    item(40, "Linen Gloves", Hand, T4, Cloth),
    item(41, "Gloves", Hand, T5, Cloth),
    item(42, "Katana", Weapon, T1, Blade),
    item(43, "Falchion", Weapon, T2, Blade),
    item(44, "Scimitar", Weapon, T3, Blade),
    item(45, "Long Sword", Weapon, T4, Blade),
    item(46, "Short Sword", Weapon, T5, Blade),
    item(47, "Demon Husk", Chest, T1, Hide),
    item(48, "Dragonskin Armor", Chest, T2, Hide),
    item(49, "Studded Leather Armor", Chest, T3, Hide),
    item(50, "Hard Leather Armor", Chest, T4, Hide),
    item(51, "Leather Armor", Chest, T5, Hide),
    item(52, "Demon Crown", Head, T1, Hide),
    item(53, "Dragons Crown", Head, T2, Hide),
    item(54, "War Cap", Head, T3, Hide),
    item(55, "Leather Cap", Head, T4, Hide),
    item(56, "Cap", Head, T5, Hide),
    item(57, "Demonhide Belt", Waist, T1, Hide),
    item(58, "Dragonskin Belt", Waist, T2, Hide),
    item(59, "Studded Leather Belt", Waist, T3, Hide),
    item(60, "Hard Leather Belt", Waist, T4, Hide),
    item(61, "Leather Belt", Waist, T5, Hide),
    item(62, "Demonhide Boots", Foot, T1, Hide),
    item(63, "Dragonskin Boots", Foot, T2, Hide),
    item(64, "Studded Leather Boots", Foot, T3, Hide),
    item(65, "Hard Leather Boots", Foot, T4, Hide),
    item(66, "Leather Boots", Foot, T5, Hide),
    item(67, "Demons Hands", Hand, T1, Hide),
    item(68, "Dragonskin Gloves", Hand, T2, Hide),
    item(69, "Studded Leather Gloves", Hand, T3, Hide),
    item(70, "Hard Leather Gloves", Hand, T4, Hide),
    item(71, "Leather Gloves", Hand, T5, Hide),
    item(72, "Warhammer", Weapon, T1, Bludgeon),
    item(73, "Quarterstaff", Weapon, T2, Bludgeon),
    item(74, "Maul", Weapon, T3, Bludgeon),
    item(75, "Mace", Weapon, T4, Bludgeon),
    item(76, "Club", Weapon, T5, Bludgeon),
    item(77, "Holy Chestplate", Chest, T1, Metal),
    item(78, "Ornate Chestplate", Chest, T2, Metal),
    item(79, "Plate Mail", Chest, T3, Metal),
    item(80, "Chain Mail", Chest, T4, Metal),
    item(81, "Ring Mail", Chest, T5, Metal),
    item(82, "Ancient Helm", Head, T1, Metal),
    item(83, "Ornate Helm", Head, T2, Metal),
    item(84, "Great Helm", Head, T3, Metal),
    item(85, "Full Helm", Head, T4, Metal),
    item(86, "Helm", Head, T5, Metal),
    item(87, "Ornate Belt", Waist, T1, Metal),
    item(88, "War Belt", Waist, T2, Metal),
    item(89, "Plated Belt", Waist, T3, Metal),
    item(90, "Mesh Belt", Waist, T4, Metal),
    item(91, "Heavy Belt", Waist, T5, Metal),
    item(92, "Holy Greaves", Foot, T1, Metal),
    item(93, "Ornate Greaves", Foot, T2, Metal),
    item(94, "Greaves", Foot, T3, Metal),
    item(95, "Chain Boots", Foot, T4, Metal),
    item(96, "Heavy Boots", Foot, T5, Metal),
    item(97, "Holy Gauntlets", Hand, T1, Metal),
    item(98, "Ornate Gauntlets", Hand, T2, Metal),
    item(99, "Gauntlets", Hand, T3, Metal),
    item(100, "Chain Gloves", Hand, T4, Metal),
    item(101, "Heavy Gloves", Hand, T5, Metal),
];

/// Beast names by id; ids 1-25 are Magic, 26-50 Blade, 51-75 Bludgeon.
pub const BEASTS: &[&str] = &[
    "Warlock", "Typhon", "Jiangshi", "Anansi", "Basilisk", "Gorgon", "Kitsune", "Lich",
    "Chimera", "Wendigo", "Rakshasa", "Werewolf", "Banshee", "Draugr", "Vampire", "Goblin",
    "Ghoul", "Wraith", "Sprite", "Kappa", "Fairy", "Leprechaun", "Kelpie", "Pixie", "Gnome",
    "Griffin", "Manticore", "Phoenix", "Dragon", "Minotaur", "Qilin", "Ammit", "Nue",
    "Skinwalker", "Chupacabra", "Weretiger", "Wyvern", "Roc", "Harpy", "Pegasus", "Hippogriff",
    "Fenrir", "Jaguar", "Satori", "Direwolf", "Bear", "Wolf", "Mantis", "Spider", "Rat",
    "Kraken", "Colossus", "Balrog", "Leviathan", "Tarrasque", "Titan", "Nephilim", "Behemoth",
    "Hydra", "Juggernaut", "Oni", "Jotunn", "Ettin", "Cyclops", "Giant", "Nemean Lion",
    "Berserker", "Yeti", "Golem", "Ent", "Troll", "Bigfoot", "Ogre", "Orc", "Skeleton",
];

/// Obstacle names by id, banded the same way as [`BEASTS`].
pub const OBSTACLES: &[&str] = &[
    "Demonic Alter", "Vortex Of Despair", "Eldritch Barrier", "Soul Trap", "Phantom Vortex",
    "Ectoplasm Web", "Spectral Chains", "Infernal Pact", "Arcane Explosion", "Hypnotic Essence",
    "Mischievous Sprites", "Soul Draining Statue", "Petrifying Gaze", "Summoning Circle",
    "Ethereal Void", "Magic Lock", "Bewitching Fog", "Illusionary Maze", "Spellbound Mirror",
    "Ensnaring Shadow", "Dark Mist", "Curse", "Haunting Echo", "Hex", "Ghostly Whispers",
    "Pendulum Blades", "Icy Razor Winds", "Acidic Thorns", "Dragons Breath", "Pendulum Scythe",
    "Flame Jet", "Piercing Ice Darts", "Glass Sand Storm", "Poisoned Dart Wall",
    "Spinning Blade Wheel", "Poison Dart", "Spiked Tumbleweed", "Thunderbolt",
    "Giant Bear Trap", "Steel Needle Rain", "Spiked Pit", "Diamond Dust Storm",
    "Trapdoor Scorpions", "Bladed Fan", "Bear Trap", "Porcupine Quill", "Hidden Arrow",
    "Glass Shard", "Thorn Bush", "Jagged Rocks", "Collapsing Ceiling", "Rockslide",
    "Flash Flood", "Clinging Roots", "Collapsing Cavern", "Crushing Walls", "Smashing Pillars",
    "Rumbling Catacomb", "Whirling Cyclone", "Erupting Earth", "Subterranean Tremor",
    "Falling Chandelier", "Collapsing Bridge", "Raging Sandstorm", "Avalanching Rocks",
    "Tumbling Boulders", "Slamming Gate", "Shifting Sands", "Earthquake", "Sudden Downpour",
    "Swinging Logs", "Unstable Cliff", "Toppling Statue", "Tumbling Barrels", "Rolling Boulder",
];

/// First fragment of a special name (matched against an item's `special2`).
pub const SPECIAL_PREFIXES: &[&str] = &[
    "Agony", "Apocalypse", "Armageddon", "Beast", "Behemoth", "Blight", "Blood", "Bramble",
    "Brimstone", "Brood", "Carrion", "Cataclysm", "Chimeric", "Corpse", "Corruption",
    "Damnation", "Death", "Demon", "Dire", "Dragon", "Dread", "Doom", "Dusk", "Eagle",
    "Empyrean", "Fate", "Foe", "Gale", "Ghoul", "Gloom", "Glyph", "Golem", "Grim", "Hate",
    "Havoc", "Honour", "Horror", "Hypnotic", "Kraken", "Loath", "Maelstrom", "Mind", "Miracle",
    "Morbid", "Oblivion", "Onslaught", "Pain", "Pandemonium", "Phoenix", "Plague", "Rage",
    "Rapture", "Rune", "Skull", "Sol", "Soul", "Sorrow", "Spirit", "Storm", "Tempest",
    "Torment", "Vengeance", "Victory", "Viper", "Vortex", "Woe", "Wrath", "Lights",
    "Shimmering",
];

/// Second fragment of a special name (matched against an item's `special3`).
pub const SPECIAL_SUFFIXES: &[&str] = &[
    "Bane", "Root", "Bite", "Song", "Roar", "Grasp", "Instrument", "Glow", "Bender", "Shadow",
    "Whisper", "Shout", "Growl", "Tear", "Peak", "Form", "Sun", "Moon",
];

/// Number of ids in each attack-type band for beasts and obstacles.
pub const BAND_SIZE: u8 = 25;
const IDS_PER_TIER: u8 = BAND_SIZE / TIER_COUNT;

/// Look up an item definition by catalog id.
#[must_use]
pub fn item_by_id(id: u8) -> Option<&'static ItemDef> {
    let index = usize::from(id).checked_sub(1)?;
    ITEMS.get(index)
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Look up an item definition by display name, ignoring whitespace and case.
#[must_use]
pub fn item_by_name(name: &str) -> Option<&'static ItemDef> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }
    ITEMS.iter().find(|def| normalize_name(def.name) == wanted)
}

/// Catalog items of the given tier, in id order.
pub fn items_of_tier(tier: Tier) -> impl Iterator<Item = &'static ItemDef> {
    ITEMS.iter().filter(move |def| def.tier == tier)
}

/// Attack type and tier shared by the beast and obstacle id layouts.
///
/// Returns `None` for ids outside `1..=75`.
#[must_use]
pub fn banded_profile(id: u8) -> Option<(AttackType, Tier)> {
    let offset = id.checked_sub(1)?;
    let attack_type = match offset / BAND_SIZE {
        0 => AttackType::Magic,
        1 => AttackType::Blade,
        2 => AttackType::Bludgeon,
        _ => return None,
    };
    let tier = Tier::from_number((offset % BAND_SIZE) / IDS_PER_TIER + 1)?;
    Some((attack_type, tier))
}

#[must_use]
pub fn beast_name(id: u8) -> Option<&'static str> {
    BEASTS.get(usize::from(id).checked_sub(1)?).copied()
}

#[must_use]
pub fn obstacle_name(id: u8) -> Option<&'static str> {
    OBSTACLES.get(usize::from(id).checked_sub(1)?).copied()
}

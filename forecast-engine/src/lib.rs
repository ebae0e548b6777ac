//! Forecast Engine
//!
//! Off-chain forecasting for an on-chain dungeon crawler. Given a character
//! snapshot, its equipment and the entropy seed the game derives encounters
//! from, the engine reproduces upcoming encounters, expands the tree of
//! player decisions and ranks the resulting outcomes. It performs no I/O.

pub mod catalog;
pub mod character;
pub mod combat;
pub mod config;
pub mod constants;
pub mod encounters;
pub mod entropy;
pub mod error;
pub mod items;
pub mod numbers;
pub mod paths;
pub mod resolution;
pub mod tree;

use log::debug;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use catalog::{
    ArmorType, AttackType, ItemDef, ItemType, Slot, Tier, item_by_id, item_by_name,
};
pub use character::{AdventurerSnapshot, CharacterState, StatUpgrades, Stats, prepare_character};
pub use combat::{
    AffixMatch, CriticalHit, SpecialName, calculate_level, item_price, max_health, potion_price,
};
pub use config::ForecastConfig;
pub use encounters::{
    BeastEncounter, Discovery, Encounter, EncounterKind, ObstacleEncounter, generate_encounter,
    list_all_encounters,
};
pub use entropy::Entropy;
pub use error::ForecastError;
pub use items::{Item, ItemPurchase, ItemRecord, Loadout, NameMatches};
pub use paths::{Path, Step, flatten_paths, rank_paths};
pub use tree::{Decision, DecisionNode, DecisionTree, build_decision_tree};

/// Everything the presentation layer hands over for one forecast.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ForecastRequest {
    pub adventurer: AdventurerSnapshot,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub purchases: Vec<ItemPurchase>,
    #[serde(default)]
    pub upgrades: StatUpgrades,
    #[serde(default)]
    pub potions: u16,
    pub entropy: Entropy,
    #[serde(default)]
    pub has_beast: bool,
}

/// Result of one forecast: the prepared character, the flat encounter
/// preview and every outcome path ranked healthiest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub character: CharacterState,
    pub encounters: Vec<Encounter>,
    pub paths: Vec<Path>,
}

impl Forecast {
    #[must_use]
    pub fn best_path(&self) -> Option<&Path> {
        self.paths.first()
    }

    #[must_use]
    pub fn surviving_paths(&self) -> usize {
        self.paths.iter().filter(|path| path.survives()).count()
    }
}

/// Reentrant forecasting entry point. Holds only validated configuration,
/// so one engine can serve concurrent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidConfig`] when the config is out of
    /// bounds.
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run a complete forecast. All input validation happens before any
    /// encounter is generated.
    ///
    /// # Errors
    ///
    /// Returns the first [`ForecastError`] raised while validating the
    /// snapshot, items, purchases or entropy.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<Forecast, ForecastError> {
        request.entropy.ensure_available()?;
        let character = prepare_character(
            &request.adventurer,
            &request.upgrades,
            request.potions,
            &request.purchases,
        )?;
        let loadout = Loadout::assemble(&request.items, &request.purchases)?;
        let level = character.level();

        let encounters = list_all_encounters(
            character.xp,
            &request.entropy,
            request.has_beast,
            level,
            self.config.horizon,
        );
        let tree = build_decision_tree(
            &character,
            &loadout,
            &request.entropy,
            request.has_beast,
            level,
            &self.config,
        )?;
        let paths = rank_paths(flatten_paths(&tree));
        debug!(
            "forecast for character {}: {} encounters, {} paths ({} surviving)",
            character.id,
            encounters.len(),
            paths.len(),
            paths.iter().filter(|path| path.survives()).count()
        );
        Ok(Forecast {
            character,
            encounters,
            paths,
        })
    }
}

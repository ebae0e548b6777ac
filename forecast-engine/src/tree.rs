//! Depth-first expansion of encounters and player decisions.
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::character::CharacterState;
use crate::combat::calculate_level;
use crate::config::ForecastConfig;
use crate::encounters::{Encounter, EncounterKind, generate_encounter};
use crate::entropy::Entropy;
use crate::error::ForecastError;
use crate::items::{Loadout, NameMatches};
use crate::resolution::{Branch, resolve_encounter};

/// What produced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    Start,
    Explore,
    Fight,
    Flee,
    LevelUp,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Explore => "explore",
            Self::Fight => "fight",
            Self::Flee => "flee",
            Self::LevelUp => "level-up",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the decision tree. Level-up and root nodes carry no
/// encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionNode {
    pub state: CharacterState,
    pub encounter: Option<Encounter>,
    /// Set when the encounter is a beast with a special name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_matches: Option<NameMatches>,
    pub decision: Decision,
    pub children: Vec<DecisionNode>,
}

impl DecisionNode {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Self::leaf_count).sum()
        }
    }

    /// Encounter nodes on the longest root-to-leaf walk.
    #[must_use]
    pub fn encounter_depth(&self) -> usize {
        let own = usize::from(self.encounter.is_some());
        own + self
            .children
            .iter()
            .map(Self::encounter_depth)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionTree {
    pub root: DecisionNode,
    pub horizon: usize,
}

struct TreeBuilder<'a> {
    loadout: &'a Loadout,
    entropy: &'a Entropy,
    config: &'a ForecastConfig,
    nodes: usize,
}

impl TreeBuilder<'_> {
    /// Children of a node that has already passed `depth` encounters.
    fn expand(&mut self, state: &CharacterState, depth: usize, has_beast: bool) -> Vec<DecisionNode> {
        if depth >= self.config.horizon || state.is_dead() {
            return Vec::new();
        }
        let level = state.level();
        let encounter = generate_encounter(state.xp, self.entropy, has_beast, level);
        let name_matches = match &encounter.kind {
            EncounterKind::Beast(beast) => beast
                .special
                .as_ref()
                .map(|name| self.loadout.name_matches(name)),
            _ => None,
        };
        resolve_encounter(state, &encounter, self.loadout)
            .into_iter()
            .map(|branch| {
                self.encounter_node(level, &encounter, name_matches, branch, depth + 1)
            })
            .collect()
    }

    fn encounter_node(
        &mut self,
        level_before: u16,
        encounter: &Encounter,
        name_matches: Option<NameMatches>,
        branch: Branch,
        depth: usize,
    ) -> DecisionNode {
        self.nodes += 1;
        let Branch { decision, state } = branch;
        let children = if state.is_dead() {
            Vec::new()
        } else {
            let level = state.level();
            if level > level_before {
                vec![self.level_up_node(state.clone(), level - level_before, depth)]
            } else {
                self.expand(&state, depth, false)
            }
        };
        DecisionNode {
            state,
            encounter: Some(encounter.clone()),
            name_matches,
            decision,
            children,
        }
    }

    fn level_up_node(&mut self, state: CharacterState, levels: u16, depth: usize) -> DecisionNode {
        self.nodes += 1;
        let state = state.with_level_ups(levels);
        let children = if self.config.halt_on_level_up {
            Vec::new()
        } else {
            self.expand(&state, depth, false)
        };
        DecisionNode {
            state,
            encounter: None,
            name_matches: None,
            decision: Decision::LevelUp,
            children,
        }
    }
}

/// Build the full decision tree for a prepared character.
///
/// `level` must equal the level derived from the character's XP; the
/// pending-beast flag applies to the first encounter only.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidConfig`] for an out-of-range horizon,
/// [`ForecastError::EntropyUnavailable`] for a zero seed and
/// [`ForecastError::LevelMismatch`] when `level` disagrees with the XP.
pub fn build_decision_tree(
    character: &CharacterState,
    loadout: &Loadout,
    entropy: &Entropy,
    has_beast: bool,
    level: u16,
    config: &ForecastConfig,
) -> Result<DecisionTree, ForecastError> {
    config.validate()?;
    entropy.ensure_available()?;
    let derived = calculate_level(character.xp);
    if level != derived {
        return Err(ForecastError::LevelMismatch {
            supplied: level,
            derived,
            xp: character.xp,
        });
    }

    let mut builder = TreeBuilder {
        loadout,
        entropy,
        config,
        nodes: 1,
    };
    let children = builder.expand(character, 0, has_beast);
    debug!(
        "decision tree for character {} at xp {}: {} nodes, horizon {}",
        character.id, character.xp, builder.nodes, config.horizon
    );
    Ok(DecisionTree {
        root: DecisionNode {
            state: character.clone(),
            encounter: None,
            name_matches: None,
            decision: Decision::Start,
            children,
        },
        horizon: config.horizon,
    })
}

//! Root-to-leaf paths through a decision tree, and their ranking.
use std::cmp::Reverse;

use serde::Serialize;

use crate::character::CharacterState;
use crate::encounters::Encounter;
use crate::items::NameMatches;
use crate::tree::{Decision, DecisionNode, DecisionTree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub encounter: Option<Encounter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_matches: Option<NameMatches>,
    pub state: CharacterState,
    pub decision: Decision,
}

impl From<&DecisionNode> for Step {
    fn from(node: &DecisionNode) -> Self {
        Self {
            encounter: node.encounter.clone(),
            name_matches: node.name_matches,
            state: node.state.clone(),
            decision: node.decision,
        }
    }
}

/// One complete outcome, from the starting state to a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    pub steps: Vec<Step>,
}

impl Path {
    #[must_use]
    pub fn final_state(&self) -> Option<&CharacterState> {
        self.steps.last().map(|step| &step.state)
    }

    /// Health at the end of the path; zero for an empty path.
    #[must_use]
    pub fn final_health(&self) -> u16 {
        self.final_state().map_or(0, |state| state.health)
    }

    #[must_use]
    pub fn survives(&self) -> bool {
        self.final_health() > 0
    }

    /// Decisions joined with `" -> "`, e.g. `start -> fight -> level-up`.
    #[must_use]
    pub fn label(&self) -> String {
        self.steps
            .iter()
            .map(|step| step.decision.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

fn collect(node: &DecisionNode, prefix: &mut Vec<Step>, paths: &mut Vec<Path>) {
    prefix.push(Step::from(node));
    if node.is_leaf() {
        paths.push(Path {
            steps: prefix.clone(),
        });
    } else {
        for child in &node.children {
            collect(child, prefix, paths);
        }
    }
    prefix.pop();
}

/// Every root-to-leaf walk, in tree order. The root step is included.
#[must_use]
pub fn flatten_paths(tree: &DecisionTree) -> Vec<Path> {
    let mut paths = Vec::with_capacity(tree.root.leaf_count());
    let mut prefix = Vec::with_capacity(tree.horizon * 2 + 1);
    collect(&tree.root, &mut prefix, &mut paths);
    paths
}

/// Healthiest outcome first. Equal-health paths keep their input order.
#[must_use]
pub fn rank_paths(mut paths: Vec<Path>) -> Vec<Path> {
    paths.sort_by_key(|path| Reverse(path.final_health()));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(decision: Decision, health: u16, children: Vec<DecisionNode>) -> DecisionNode {
        DecisionNode {
            state: CharacterState {
                health,
                ..CharacterState::default()
            },
            encounter: None,
            name_matches: None,
            decision,
            children,
        }
    }

    fn sample_tree() -> DecisionTree {
        let fight = node(
            Decision::Fight,
            40,
            vec![node(Decision::LevelUp, 40, vec![node(Decision::Explore, 30, vec![])])],
        );
        let flee = node(Decision::Flee, 70, vec![node(Decision::Explore, 0, vec![])]);
        DecisionTree {
            root: node(Decision::Start, 100, vec![fight, flee]),
            horizon: 2,
        }
    }

    #[test]
    fn flatten_emits_one_path_per_leaf_in_tree_order() {
        let paths = flatten_paths(&sample_tree());
        let labels: Vec<_> = paths.iter().map(Path::label).collect();
        assert_eq!(
            labels,
            [
                "start -> fight -> level-up -> explore",
                "start -> flee -> explore"
            ]
        );
        assert_eq!(paths[0].steps.len(), 4);
        assert_eq!(paths[1].final_health(), 0);
        assert!(!paths[1].survives());
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let paths: Vec<Path> = [10u16, 50, 10, 80, 50]
            .iter()
            .enumerate()
            .map(|(index, health)| Path {
                steps: vec![Step {
                    encounter: None,
                    name_matches: None,
                    state: CharacterState {
                        id: index as u64,
                        health: *health,
                        ..CharacterState::default()
                    },
                    decision: Decision::Start,
                }],
            })
            .collect();
        let ranked = rank_paths(paths);
        let order: Vec<_> = ranked
            .iter()
            .filter_map(|path| path.final_state().map(|state| state.id))
            .collect();
        assert_eq!(order, [3, 1, 4, 0, 2]);
    }

    #[test]
    fn empty_paths_rank_last() {
        let ranked = rank_paths(vec![Path { steps: vec![] }, flatten_paths(&sample_tree())[0].clone()]);
        assert_eq!(ranked[0].final_health(), 30);
        assert!(ranked[1].final_state().is_none());
    }
}

//! Resolving one encounter against a character and loadout.
//!
//! Each resolution returns the decision branches open to the player, in a
//! fixed order. Combat is deterministic: the character always hits and the
//! beast answers every round it survives, without critical hits.
use smallvec::{SmallVec, smallvec};

use crate::character::CharacterState;
use crate::combat::{BeastDefense, CriticalHit, damage_to_beast, damage_to_character, dodge_succeeds};
use crate::constants::FLEE_XP_REWARD;
use crate::encounters::{BeastEncounter, Discovery, Encounter, EncounterKind, ObstacleEncounter};
use crate::items::Loadout;
use crate::tree::Decision;

/// A decision and the state it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub decision: Decision,
    pub state: CharacterState,
}

impl Branch {
    const fn new(decision: Decision, state: CharacterState) -> Self {
        Self { decision, state }
    }
}

pub type Branches = SmallVec<[Branch; 2]>;

/// Damage the character's weapon deals the beast per round.
#[must_use]
pub fn player_hit(state: &CharacterState, beast: &BeastEncounter, loadout: &Loadout) -> u32 {
    damage_to_beast(
        loadout.weapon(),
        state.stats.strength,
        BeastDefense {
            attack_type: beast.attack_type,
            tier: beast.tier,
            level: beast.level,
            special: beast.special.as_ref(),
        },
    )
}

/// Damage of one beast counterattack at its rolled location.
#[must_use]
pub fn counter_damage(beast: &BeastEncounter, loadout: &Loadout) -> u32 {
    damage_to_character(beast.attack(CriticalHit::NONE), loadout.in_slot(beast.location))
}

/// Rounds needed to bring the beast down.
#[must_use]
pub fn rounds_to_kill(beast: &BeastEncounter, hit: u32) -> u32 {
    u32::from(beast.health).div_ceil(hit.max(1))
}

/// Opening strike of a fresh beast. Pending beasts and wise characters
/// take no damage.
#[must_use]
pub fn resolve_ambush(state: &CharacterState, beast: &BeastEncounter, loadout: &Loadout) -> CharacterState {
    if beast.pending || dodge_succeeds(state.stats.wisdom, beast.dodge_roll) {
        return state.clone();
    }
    let damage = damage_to_character(beast.attack(beast.critical), loadout.in_slot(beast.location));
    state.clone().with_damage(damage)
}

/// Fight to the end. The killing blow lands before the beast's last answer,
/// so the character absorbs one counterattack fewer than the rounds fought.
#[must_use]
pub fn resolve_fight(state: &CharacterState, beast: &BeastEncounter, loadout: &Loadout) -> CharacterState {
    let rounds = rounds_to_kill(beast, player_hit(state, beast, loadout));
    let taken = counter_damage(beast, loadout).saturating_mul(rounds.saturating_sub(1));
    let after = state.clone().with_damage(taken);
    if after.is_dead() {
        return after;
    }
    after
        .with_xp_gain(beast.xp_reward)
        .with_gold_gain(beast.gold_reward)
}

#[must_use]
pub fn resolve_flee(state: &CharacterState) -> CharacterState {
    state.clone().with_xp_gain(FLEE_XP_REWARD)
}

#[must_use]
pub fn resolve_obstacle(
    state: &CharacterState,
    obstacle: &ObstacleEncounter,
    loadout: &Loadout,
) -> CharacterState {
    let after = if dodge_succeeds(state.stats.intelligence, obstacle.dodge_roll) {
        state.clone()
    } else {
        let damage = damage_to_character(obstacle.attack(), loadout.in_slot(obstacle.location));
        state.clone().with_damage(damage)
    };
    if after.is_dead() {
        return after;
    }
    after.with_xp_gain(obstacle.xp_reward)
}

#[must_use]
pub fn resolve_discovery(state: &CharacterState, reward: &Discovery, xp_reward: u32) -> CharacterState {
    let after = match reward {
        Discovery::Health { amount } => state.clone().with_healing(*amount),
        Discovery::Gold { amount } => state.clone().with_gold_gain(*amount),
        // Loot goes to the bag and does not change the equipped loadout.
        Discovery::Loot { .. } => state.clone(),
    };
    after.with_xp_gain(xp_reward)
}

/// All branches open after `encounter`: fight before flee for beasts, a
/// single `explore` otherwise. A lethal ambush leaves only the dead state.
#[must_use]
pub fn resolve_encounter(state: &CharacterState, encounter: &Encounter, loadout: &Loadout) -> Branches {
    match &encounter.kind {
        EncounterKind::Discovery { reward } => smallvec![Branch::new(
            Decision::Explore,
            resolve_discovery(state, reward, encounter.xp_reward()),
        )],
        EncounterKind::Obstacle(obstacle) => smallvec![Branch::new(
            Decision::Explore,
            resolve_obstacle(state, obstacle, loadout),
        )],
        EncounterKind::Beast(beast) => {
            let ambushed = resolve_ambush(state, beast, loadout);
            if ambushed.is_dead() {
                return smallvec![Branch::new(Decision::Explore, ambushed)];
            }
            let mut branches: Branches =
                smallvec![Branch::new(Decision::Fight, resolve_fight(&ambushed, beast, loadout))];
            if dodge_succeeds(ambushed.stats.dexterity, beast.flee_roll) {
                branches.push(Branch::new(Decision::Flee, resolve_flee(&ambushed)));
            }
            branches
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttackType, Slot, Tier, item_by_name};
    use crate::character::Stats;
    use crate::items::Item;

    fn character(health: u16) -> CharacterState {
        CharacterState {
            id: 1,
            xp: 4,
            stats: Stats::default(),
            health,
            ..CharacterState::default()
        }
    }

    fn beast(health: u16, pending: bool) -> BeastEncounter {
        BeastEncounter {
            id: 75,
            name: "Rat",
            attack_type: AttackType::Bludgeon,
            tier: Tier::T5,
            level: 2,
            health,
            power: 2,
            special: None,
            dodge_roll: 2,
            damage: 3,
            critical: CriticalHit::NONE,
            location: Slot::Chest,
            xp_reward: 4,
            gold_reward: 1,
            flee_roll: 2,
            pending,
        }
    }

    fn beast_encounter(beast: BeastEncounter) -> Encounter {
        Encounter {
            xp: 4,
            next_xp: 4 + beast.xp_reward,
            kind: EncounterKind::Beast(beast),
        }
    }

    #[test]
    fn unarmed_fight_takes_counterattacks() {
        let loadout = Loadout::default();
        let rat = beast(10, true);
        // Unarmed hits floor at 4: three rounds, two counters of 3.
        assert_eq!(player_hit(&character(100), &rat, &loadout), 4);
        assert_eq!(rounds_to_kill(&rat, 4), 3);
        assert_eq!(counter_damage(&rat, &loadout), 3);
        let after = resolve_fight(&character(100), &rat, &loadout);
        assert_eq!(after.health, 94);
        assert_eq!(after.xp, 8);
        assert_eq!(after.gold, 1);
    }

    #[test]
    fn dying_in_a_fight_grants_nothing() {
        let after = resolve_fight(&character(5), &beast(40, true), &Loadout::default());
        assert!(after.is_dead());
        assert_eq!(after.xp, 4);
        assert_eq!(after.gold, 0);
    }

    #[test]
    fn ambush_respects_pending_and_wisdom() {
        let loadout = Loadout::default();
        assert_eq!(resolve_ambush(&character(50), &beast(5, true), &loadout).health, 50);
        assert_eq!(resolve_ambush(&character(50), &beast(5, false), &loadout).health, 47);
        let mut wise = character(50);
        wise.stats.wisdom = 2;
        assert_eq!(resolve_ambush(&wise, &beast(5, false), &loadout).health, 50);
    }

    #[test]
    fn armor_at_the_location_softens_counters() {
        let plate = Item::from_def(item_by_name("Holy Chestplate").unwrap(), 1, None, None);
        let loadout = Loadout::from_items([plate]);
        // Bludgeon vs metal is fair: 2 power minus 5 armor floors at 2.
        assert_eq!(counter_damage(&beast(5, true), &loadout), 2);
    }

    #[test]
    fn beast_branches_follow_fight_then_flee() {
        let loadout = Loadout::default();
        let encounter = beast_encounter(beast(10, true));
        let slow = resolve_encounter(&character(100), &encounter, &loadout);
        assert_eq!(slow.len(), 1);
        assert_eq!(slow[0].decision, Decision::Fight);

        let mut nimble = character(100);
        nimble.stats.dexterity = 2;
        let branches = resolve_encounter(&nimble, &encounter, &loadout);
        let decisions: Vec<_> = branches.iter().map(|branch| branch.decision).collect();
        assert_eq!(decisions, [Decision::Fight, Decision::Flee]);
        assert_eq!(branches[1].state.xp, 5);
        assert_eq!(branches[1].state.health, 100);
    }

    #[test]
    fn lethal_ambush_leaves_a_single_dead_branch() {
        let mut nimble = character(3);
        nimble.stats.dexterity = 9;
        let branches = resolve_encounter(&nimble, &beast_encounter(beast(10, false)), &Loadout::default());
        assert_eq!(branches.len(), 1);
        assert!(branches[0].state.is_dead());
    }

    #[test]
    fn discoveries_and_obstacles_explore() {
        let state = character(50);
        let health = Encounter {
            xp: 4,
            next_xp: 5,
            kind: EncounterKind::Discovery {
                reward: Discovery::Health { amount: 80 },
            },
        };
        let branches = resolve_encounter(&state, &health, &Loadout::default());
        assert_eq!(branches[0].decision, Decision::Explore);
        assert_eq!(branches[0].state.health, 100);
        assert_eq!(branches[0].state.xp, 5);

        let trap = ObstacleEncounter {
            id: 1,
            name: "Demonic Altar",
            attack_type: AttackType::Magic,
            tier: Tier::T1,
            level: 3,
            power: 15,
            dodge_roll: 2,
            damage: 22,
            critical: CriticalHit::NONE,
            location: Slot::Head,
            xp_reward: 7,
        };
        let hit = resolve_obstacle(&state, &trap, &Loadout::default());
        assert_eq!(hit.health, 28);
        assert_eq!(hit.xp, 11);

        let mut clever = state;
        clever.stats.intelligence = 2;
        assert_eq!(resolve_obstacle(&clever, &trap, &Loadout::default()).health, 50);
    }
}

//! The battle state machine.
//!
//! Every action is a synchronous transition on [`BattleState`]. Work that the
//! UI paces with a delay (the damage reveal after an attack, the opponent's
//! counter-attack) is left pending as a [`FollowUp`] token; firing the token
//! performs the step. A token fired after the battle has moved on is ignored.

use crate::battle::calculators::calculate_damage;
use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleEvent, BattlePhase, BattleState, Outcome, Rewards, Side};
use crate::config::BalanceConfig;
use crate::creature::Creature;
use crate::errors::{ActionError, BattleResult};
use crate::items::apply_effect;
use crate::moves::default_move;
use crate::opponent::OpponentDescriptor;
use crate::progression::{apply_victory, LevelUpReport, RewardCalculator};
use crate::roster::{CreaturePatch, RosterStore};
use schema::{Effectiveness, ItemEffect, MoveData};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A scheduled step. Only fires while the battle is still waiting on the
/// exact step it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub battle_id: u64,
    /// Value of `BattleState::step` when the step was scheduled.
    pub step: u64,
    pub phase: BattlePhase,
}

impl FollowUp {
    fn for_state(state: &BattleState) -> Self {
        FollowUp {
            battle_id: state.battle_id,
            step: state.step,
            phase: state.phase,
        }
    }
}

/// Terminal payload handed to the UI by `end_battle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub outcome: Outcome,
    pub xp_gained: u32,
    pub currency_gained: u32,
    pub level_up: Option<LevelUpReport>,
}

pub struct BattleEngine {
    config: BalanceConfig,
    rng: TurnRng,
    battle: Option<BattleState>,
    next_battle_id: u64,
}

impl BattleEngine {
    pub fn new(config: BalanceConfig, rng: TurnRng) -> Self {
        Self {
            config,
            rng,
            battle: None,
            next_battle_id: 1,
        }
    }

    pub fn with_seed(config: BalanceConfig, seed: u64) -> Self {
        Self::new(config, TurnRng::from_seed(seed))
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&BattleState> {
        self.battle.as_ref()
    }

    pub fn phase(&self) -> BattlePhase {
        self.battle
            .as_ref()
            .map_or(BattlePhase::Idle, |state| state.phase)
    }

    pub fn log(&self) -> &[String] {
        self.battle.as_ref().map(|state| state.log.as_slice()).unwrap_or(&[])
    }

    /// The step waiting to run, if the battle is between an action and its resolution.
    pub fn pending_follow_up(&self) -> Option<FollowUp> {
        let state = self.battle.as_ref()?;
        match state.phase {
            BattlePhase::Attacking | BattlePhase::EnemyTurn => Some(FollowUp::for_state(state)),
            _ => None,
        }
    }

    // === Actions ===

    pub fn start_battle<S: RosterStore + ?Sized>(
        &mut self,
        store: &S,
        opponent: &OpponentDescriptor,
    ) -> BattleResult<()> {
        self.require("start_battle", &[BattlePhase::Idle])?;

        let roster: Vec<Creature> = store
            .creatures()
            .into_iter()
            .take(self.config.roster_size())
            .collect();
        if roster.iter().all(Creature::is_fainted) {
            warn!("Refusing to start a battle without a conscious creature");
            return Err(ActionError::NoUsableCreature);
        }

        let opponent_creature = opponent.build(&self.config.opponents, self.config.progression.max_level);
        let battle_id = self.next_battle_id;
        self.next_battle_id += 1;

        let mut state = BattleState::new(
            battle_id,
            opponent_creature,
            opponent.is_boss,
            roster,
            store.items(),
        );
        state.record(BattleEvent::Encounter {
            opponent: state.opponent.name.clone(),
            level: state.opponent.level,
            is_boss: opponent.is_boss,
        });
        set_phase(&mut state, BattlePhase::SelectCreature);
        info!(
            battle_id,
            opponent = %state.opponent.name,
            level = state.opponent.level,
            boss = opponent.is_boss,
            "Battle started"
        );

        self.battle = Some(state);
        Ok(())
    }

    /// Put a creature on the field at the start of battle or after a faint.
    pub fn select_creature(&mut self, creature_id: &str) -> BattleResult<()> {
        self.require(
            "select_creature",
            &[BattlePhase::SelectCreature, BattlePhase::ChangingCreature],
        )?;
        let state = self.battle_mut()?;
        let index = conscious_index(state, creature_id)?;

        let opening = state.phase == BattlePhase::SelectCreature;
        state.active_index = Some(index);
        state.record(BattleEvent::CreatureSentOut {
            creature: state.roster[index].name.clone(),
        });
        if opening {
            state.turn_number = 1;
        }
        set_phase(state, BattlePhase::PlayerTurn);
        Ok(())
    }

    /// Announce an attack. Damage resolves when the returned follow-up fires.
    pub fn attack(&mut self, move_used: Option<MoveData>) -> BattleResult<FollowUp> {
        self.require("attack", &[BattlePhase::PlayerTurn])?;
        let state = self.battle_mut()?;

        let Some(attacker) = state.active_creature().filter(|c| !c.is_fainted()) else {
            return Err(ActionError::NoUsableCreature);
        };
        if state.opponent.is_fainted() {
            return Err(ActionError::NotAllowed {
                action: "attack",
                phase: state.phase,
            });
        }

        let move_used = move_used
            .or_else(|| attacker.primary_move.clone())
            .unwrap_or_else(|| default_move(attacker.element, attacker.level, false, 1.0));
        let event = BattleEvent::MoveUsed {
            side: Side::Player,
            creature: attacker.name.clone(),
            move_name: move_used.name.clone(),
        };

        state.record(event);
        state.pending_move = Some(move_used);
        set_phase(state, BattlePhase::Attacking);
        Ok(FollowUp::for_state(state))
    }

    /// Use an item on the active creature, or on `target_id` from the roster.
    /// A successful use consumes the turn.
    pub fn use_item<S: RosterStore + ?Sized>(
        &mut self,
        store: &mut S,
        item_id: &str,
        target_id: Option<&str>,
    ) -> BattleResult<FollowUp> {
        self.require("use_item", &[BattlePhase::PlayerTurn])?;
        let progression = self.config.progression.clone();
        let state = self.battle_mut()?;

        let item_index = state
            .item_index(item_id)
            .ok_or_else(|| ActionError::UnknownItem(item_id.to_string()))?;
        let item = state.items[item_index].clone();

        if !item.usable_in_battle || matches!(item.effect, ItemEffect::LevelUp { .. }) {
            return Err(reject_item(state, &item.name, ActionError::NotUsableInBattle(item.name.clone())));
        }
        if !item.in_stock() {
            return Err(reject_item(state, &item.name, ActionError::OutOfStock(item.name.clone())));
        }

        let target_index = match target_id {
            Some(id) => state
                .creature_index(id)
                .ok_or_else(|| ActionError::UnknownCreature(id.to_string()))?,
            None => state.active_index.ok_or(ActionError::NoUsableCreature)?,
        };

        set_phase(state, BattlePhase::UsingItem);
        state.active_item = Some(item.id.clone());

        let applied = match apply_effect(&item.name, item.effect, &mut state.roster[target_index], &progression) {
            Ok(applied) => applied,
            Err(err) => {
                state.active_item = None;
                set_phase(state, BattlePhase::PlayerTurn);
                return Err(reject_item(state, &item.name, err));
            }
        };

        state.items[item_index].quantity -= 1;
        store.update_item_quantity(&item.id, -1);

        let target = &state.roster[target_index];
        if Some(target_index) != state.active_index {
            store.update_creature_stats(&target.id, CreaturePatch::hp(target.current_hp()));
        }
        let event = BattleEvent::ItemUsed {
            item: item.name.clone(),
            target: target.name.clone(),
            applied,
        };
        state.record(event);
        state.active_item = None;

        set_phase(state, BattlePhase::EnemyTurn);
        Ok(FollowUp::for_state(state))
    }

    /// Swap the active creature. Voluntary swaps cost the turn and return the
    /// opponent's follow-up; a replacement after a faint does not.
    pub fn change_creature<S: RosterStore + ?Sized>(
        &mut self,
        store: &mut S,
        creature_id: &str,
    ) -> BattleResult<Option<FollowUp>> {
        self.require(
            "change_creature",
            &[BattlePhase::PlayerTurn, BattlePhase::ChangingCreature],
        )?;
        let state = self.battle_mut()?;

        let index = state
            .creature_index(creature_id)
            .ok_or_else(|| ActionError::UnknownCreature(creature_id.to_string()))?;
        if Some(index) == state.active_index {
            return Err(ActionError::AlreadyActive(state.roster[index].name.clone()));
        }
        let index = conscious_index(state, creature_id)?;

        let mandatory = state.phase == BattlePhase::ChangingCreature;
        let new_name = state.roster[index].name.clone();
        let outgoing_name = state.active_creature_mut().map(|outgoing| {
            outgoing.clear_boosts();
            store.update_creature_stats(&outgoing.id, CreaturePatch::hp(outgoing.current_hp()));
            outgoing.name.clone()
        });
        let event = match outgoing_name {
            Some(old_creature) => BattleEvent::CreatureSwitched {
                old_creature,
                new_creature: new_name,
            },
            None => BattleEvent::CreatureSentOut { creature: new_name },
        };
        state.record(event);
        state.active_index = Some(index);

        if mandatory {
            set_phase(state, BattlePhase::PlayerTurn);
            return Ok(None);
        }
        set_phase(state, BattlePhase::EnemyTurn);
        Ok(Some(FollowUp::for_state(state)))
    }

    /// Run from battle. Always succeeds; nothing is earned.
    pub fn flee(&mut self) -> BattleResult<()> {
        self.require("flee", &[BattlePhase::PlayerTurn])?;
        let state = self.battle_mut()?;

        for creature in &mut state.roster {
            creature.clear_boosts();
        }
        state.pending_move = None;
        state.rewards = None;
        state.record(BattleEvent::Fled);
        set_phase(state, BattlePhase::Fleeing);
        Ok(())
    }

    /// Close a finished battle: persist HP, apply rewards on victory, return to Idle.
    pub fn end_battle<S: RosterStore + ?Sized>(&mut self, store: &mut S) -> BattleResult<BattleOutcome> {
        self.require(
            "end_battle",
            &[BattlePhase::Victory, BattlePhase::Defeat, BattlePhase::Fleeing],
        )?;
        let mut state = self.battle.take().ok_or(ActionError::NotAllowed {
            action: "end_battle",
            phase: BattlePhase::Idle,
        })?;
        for creature in &mut state.roster {
            creature.clear_boosts();
        }

        let outcome = match state.phase {
            BattlePhase::Victory => Outcome::Victory,
            BattlePhase::Defeat => Outcome::Defeat,
            _ => Outcome::Fled,
        };

        let mut result = BattleOutcome {
            outcome,
            xp_gained: 0,
            currency_gained: 0,
            level_up: None,
        };

        let mut progressed: Option<String> = None;
        if outcome == Outcome::Victory {
            let rewards = state.rewards.unwrap_or_default();
            if let Some(index) = state.active_index {
                let survivor = &mut state.roster[index];
                let report = apply_victory(store, survivor, rewards, &self.config.progression);
                progressed = Some(survivor.id.clone());
                result.level_up = Some(report);
            } else {
                store.update_currency(rewards.currency as i64);
            }
            result.xp_gained = rewards.experience;
            result.currency_gained = rewards.currency;
        }

        persist_hp_changes(store, &state.roster, progressed.as_deref());

        info!(
            battle_id = state.battle_id,
            ?outcome,
            xp = result.xp_gained,
            currency = result.currency_gained,
            "Battle ended"
        );
        Ok(result)
    }

    /// Drop the battle in progress without persisting anything.
    pub fn abandon(&mut self) {
        if let Some(state) = self.battle.take() {
            info!(battle_id = state.battle_id, phase = ?state.phase, "Battle abandoned");
        }
    }

    // === Scheduled steps ===

    /// Run a scheduled step. Returns false, changing nothing, if the battle has moved on.
    pub fn fire(&mut self, follow_up: FollowUp) -> bool {
        let Some(state) = self.battle.as_mut() else {
            debug!(?follow_up, "Ignoring follow-up with no battle in progress");
            return false;
        };
        if FollowUp::for_state(state) != follow_up {
            debug!(?follow_up, current = ?state.phase, "Ignoring stale follow-up");
            return false;
        }

        match follow_up.phase {
            BattlePhase::Attacking => resolve_player_attack(state, &self.config, &mut self.rng),
            BattlePhase::EnemyTurn => resolve_enemy_turn(state, &self.config, &mut self.rng),
            _ => return false,
        }
        true
    }

    /// Fire the pending step, if any.
    pub fn advance(&mut self) -> bool {
        match self.pending_follow_up() {
            Some(follow_up) => self.fire(follow_up),
            None => false,
        }
    }

    /// Fire pending steps until the battle waits on the player or has ended.
    pub fn settle(&mut self) {
        while self.advance() {}
    }

    // --- Private Helper Functions ---

    fn require(&self, action: &'static str, allowed: &[BattlePhase]) -> BattleResult<()> {
        let phase = self.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            debug!(action, ?phase, "Action not allowed in this phase");
            Err(ActionError::NotAllowed { action, phase })
        }
    }

    fn battle_mut(&mut self) -> BattleResult<&mut BattleState> {
        let phase = self.phase();
        self.battle.as_mut().ok_or(ActionError::NotAllowed {
            action: "battle action",
            phase,
        })
    }
}

/// Move to `phase`. Entering a phase that waits on a follow-up starts a new step,
/// so tokens issued for earlier steps stop matching.
fn set_phase(state: &mut BattleState, phase: BattlePhase) {
    debug!(battle_id = state.battle_id, from = ?state.phase, to = ?phase, "Phase change");
    state.phase = phase;
    if matches!(phase, BattlePhase::Attacking | BattlePhase::EnemyTurn) {
        state.step += 1;
    }
}

fn conscious_index(state: &BattleState, creature_id: &str) -> BattleResult<usize> {
    let index = state
        .creature_index(creature_id)
        .ok_or_else(|| ActionError::UnknownCreature(creature_id.to_string()))?;
    let creature = &state.roster[index];
    if creature.is_fainted() {
        return Err(ActionError::CreatureFainted(creature.name.clone()));
    }
    Ok(index)
}

fn reject_item(state: &mut BattleState, item: &str, err: ActionError) -> ActionError {
    warn!(item, %err, "Item rejected");
    state.record(BattleEvent::ItemRejected {
        item: item.to_string(),
        reason: err.to_string(),
    });
    err
}

/// Record the events for one landed attack and apply its damage.
fn land_hit(state: &mut BattleState, side: Side, damage: u16, is_critical: bool, effectiveness: Effectiveness) {
    if is_critical {
        state.record(BattleEvent::CriticalHit);
    }
    state.record(BattleEvent::AttackEffectiveness { effectiveness });

    let target = match side {
        Side::Player => &mut state.opponent,
        Side::Enemy => match state.active_index {
            Some(index) => &mut state.roster[index],
            None => return,
        },
    };
    if damage == 0 {
        return;
    }
    target.take_damage(damage);
    let event = BattleEvent::DamageDealt {
        target: target.name.clone(),
        damage,
        remaining_hp: target.current_hp(),
    };
    state.record(event);
}

fn resolve_player_attack(state: &mut BattleState, config: &BalanceConfig, rng: &mut TurnRng) {
    let move_used = state.pending_move.take();
    let Some(attacker) = state.active_creature() else {
        set_phase(state, BattlePhase::EnemyTurn);
        return;
    };

    let outcome = calculate_damage(attacker, &state.opponent, move_used.as_ref(), &config.damage, rng);
    debug!(?outcome, "Player attack resolved");
    land_hit(state, Side::Player, outcome.damage, outcome.is_critical, outcome.effectiveness);

    if !state.opponent.is_fainted() {
        set_phase(state, BattlePhase::EnemyTurn);
        return;
    }

    state.record(BattleEvent::CreatureFainted {
        side: Side::Enemy,
        creature: state.opponent.name.clone(),
    });
    let rewards: Rewards = RewardCalculator::new(&config.rewards).rewards_for(
        state.opponent.level,
        state.opponent_is_boss,
        rng,
    );
    state.record(BattleEvent::ExperienceGained {
        amount: rewards.experience,
    });
    state.record(BattleEvent::CurrencyGained {
        amount: rewards.currency,
    });
    state.rewards = Some(rewards);
    set_phase(state, BattlePhase::Victory);
}

fn resolve_enemy_turn(state: &mut BattleState, config: &BalanceConfig, rng: &mut TurnRng) {
    let Some(defender) = state.active_creature() else {
        set_phase(state, BattlePhase::ChangingCreature);
        return;
    };

    let opponent = &state.opponent;
    let move_used = opponent.primary_move.clone().unwrap_or_else(|| {
        default_move(
            opponent.element,
            opponent.level,
            true,
            config.opponents.move_power_multiplier,
        )
    });
    let outcome = calculate_damage(opponent, defender, Some(&move_used), &config.damage, rng);
    debug!(?outcome, "Enemy attack resolved");

    state.record(BattleEvent::MoveUsed {
        side: Side::Enemy,
        creature: state.opponent.name.clone(),
        move_name: move_used.name,
    });
    land_hit(state, Side::Enemy, outcome.damage, outcome.is_critical, outcome.effectiveness);

    let Some(active) = state.active_creature() else {
        return;
    };
    if !active.is_fainted() {
        state.turn_number += 1;
        set_phase(state, BattlePhase::PlayerTurn);
        return;
    }

    let creature = active.name.clone();
    state.record(BattleEvent::CreatureFainted {
        side: Side::Player,
        creature,
    });
    if state.all_fainted() {
        state.record(BattleEvent::OutOfCreatures);
        set_phase(state, BattlePhase::Defeat);
    } else {
        set_phase(state, BattlePhase::ChangingCreature);
    }
}

/// Write back the HP of every creature whose value differs from what the store holds.
fn persist_hp_changes<S: RosterStore + ?Sized>(store: &mut S, roster: &[Creature], skip_id: Option<&str>) {
    let stored = store.creatures();
    for creature in roster {
        if Some(creature.id.as_str()) == skip_id {
            continue;
        }
        let unchanged = stored
            .iter()
            .find(|c| c.id == creature.id)
            .is_some_and(|c| c.current_hp() == creature.current_hp());
        if !unchanged {
            store.update_creature_stats(&creature.id, CreaturePatch::hp(creature.current_hp()));
        }
    }
}

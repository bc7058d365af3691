use crate::battle::rng::TurnRng;
use crate::battle::stats::{effective_attack, effective_defense};
use crate::config::DamageTuning;
use crate::creature::Creature;
use schema::{Effectiveness, Element, MoveData};
use serde::{Deserialize, Serialize};

/// Result of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub damage: u16,
    pub is_critical: bool,
    pub effectiveness: Effectiveness,
    /// Raw chart multiplier (0, 0.5, 1 or 2).
    pub multiplier: f32,
    /// Set when the attack could not be computed from its inputs.
    pub missed: bool,
}

impl DamageOutcome {
    /// Deterministic result for malformed inputs. Consumes no randomness.
    pub fn miss() -> Self {
        DamageOutcome {
            damage: 0,
            is_critical: false,
            effectiveness: Effectiveness::Normal,
            multiplier: 1.0,
            missed: true,
        }
    }
}

/// Damage before criticals, effectiveness and jitter:
/// `floor(((2L/5 + offset) * power * (offense / defense)) / divisor + flat_bonus)`
pub fn base_damage(level: u8, power: u16, offense: u16, defense: u16, tuning: &DamageTuning) -> f32 {
    let level_factor = 2.0 * level as f32 / 5.0 + tuning.level_offset;
    let stat_ratio = offense as f32 / defense.max(1) as f32;
    ((level_factor * power as f32 * stat_ratio) / tuning.divisor + tuning.flat_bonus).floor()
}

/// Bias from the level gap, clamped so it never reaches zero.
pub fn level_difference_multiplier(attacker_level: u8, defender_level: u8, tuning: &DamageTuning) -> f32 {
    let difference = attacker_level as f32 - defender_level as f32;
    (1.0 + tuning.level_diff_step * difference).clamp(tuning.level_diff_min, tuning.level_diff_max)
}

/// Calculate the outcome of `attacker` hitting `defender` with `move_used`.
///
/// Rolls are consumed in a fixed order: critical hit, then jitter. Immune
/// matchups and malformed inputs consume nothing.
pub fn calculate_damage(
    attacker: &Creature,
    defender: &Creature,
    move_used: Option<&MoveData>,
    tuning: &DamageTuning,
    rng: &mut TurnRng,
) -> DamageOutcome {
    let Some(move_used) = move_used else {
        return DamageOutcome::miss();
    };
    let offense = effective_attack(attacker);
    if move_used.power == 0 || attacker.level == 0 || offense == 0 {
        tracing::debug!(attacker = %attacker.id, move_name = %move_used.name, "Malformed attack, treating as a miss");
        return DamageOutcome::miss();
    }

    let multiplier = Element::effectiveness(move_used.element, defender.element);
    let effectiveness = Effectiveness::from_multiplier(multiplier);
    if effectiveness == Effectiveness::NoEffect {
        return DamageOutcome {
            damage: 0,
            is_critical: false,
            effectiveness,
            multiplier,
            missed: false,
        };
    }

    let mut damage = base_damage(
        attacker.level,
        move_used.power,
        offense,
        effective_defense(defender),
        tuning,
    );
    damage *= level_difference_multiplier(attacker.level, defender.level, tuning);

    let is_critical = rng.chance(tuning.crit_chance_percent, "critical hit");
    if is_critical {
        damage *= tuning.crit_multiplier;
    }

    damage *= multiplier;
    if effectiveness == Effectiveness::SuperEffective {
        damage *= tuning.super_effective_bonus;
    }

    damage *= rng.next_in_band(tuning.jitter_min, tuning.jitter_max, "damage jitter");

    let damage = (damage.floor().min(u16::MAX as f32) as u16).max(tuning.min_damage);

    DamageOutcome {
        damage,
        is_critical,
        effectiveness,
        multiplier,
        missed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::BaseStats;
    use strum::IntoEnumIterator;

    fn creature(element: Element, level: u8, attack: u16, defense: u16) -> Creature {
        Creature::new(
            format!("{element}-{level}"),
            "Test",
            element,
            level,
            BaseStats { max_hp: 50, attack, defense, speed: 10 },
        )
    }

    #[test]
    fn test_base_damage_shape() {
        let tuning = DamageTuning::default();
        // (2*5/5 + 2) * 40 * (20/10) / 50 + 5 = 11.4
        assert_eq!(base_damage(5, 40, 20, 10, &tuning), 11.0);
        // Doubling the stat ratio scales the level/power part, not the flat bonus.
        assert_eq!(base_damage(5, 40, 40, 10, &tuning), 17.0);
        assert_eq!(base_damage(5, 40, 20, 0, &tuning), base_damage(5, 40, 20, 1, &tuning));
    }

    #[rstest]
    #[case("no crit, middle jitter", vec![50, 50], false, 10)]
    #[case("crit, middle jitter", vec![5, 50], true, 16)]
    #[case("no crit, lowest jitter", vec![50, 1], false, 9)]
    #[case("crit, highest jitter", vec![1, 100], true, 18)]
    fn test_neutral_level_five_attack(
        #[case] desc: &str,
        #[case] rolls: Vec<u8>,
        #[case] expect_crit: bool,
        #[case] expected: u16,
    ) {
        let attacker = creature(Element::Normal, 5, 20, 10);
        let defender = creature(Element::Normal, 5, 10, 10);
        let tackle = MoveData::new("Tackle", Element::Normal, 40);
        let mut rng = TurnRng::new_for_test(rolls);

        let outcome = calculate_damage(&attacker, &defender, Some(&tackle), &DamageTuning::default(), &mut rng);

        assert_eq!(outcome.is_critical, expect_crit, "{desc}");
        assert_eq!(outcome.damage, expected, "{desc}");
        assert!((8..=20).contains(&outcome.damage), "{desc}");
        assert_eq!(outcome.effectiveness, Effectiveness::Normal);
    }

    #[test]
    fn test_super_effective_gets_bonus() {
        let attacker = creature(Element::Fire, 5, 20, 10);
        let defender = creature(Element::Grass, 5, 10, 10);
        let ember = MoveData::new("Ember", Element::Fire, 40);
        let mut rng = TurnRng::new_for_test(vec![50, 50]);

        let outcome = calculate_damage(&attacker, &defender, Some(&ember), &DamageTuning::default(), &mut rng);

        // 11 * 2 * 1.25 * 0.9737
        assert_eq!(outcome.damage, 26);
        assert_eq!(outcome.effectiveness, Effectiveness::SuperEffective);
    }

    #[test]
    fn test_immunity_zeroes_damage() {
        let attacker = creature(Element::Normal, 50, 200, 10);
        let defender = creature(Element::Ghost, 1, 10, 1);
        let tackle = MoveData::new("Tackle", Element::Normal, 120);
        let mut rng = TurnRng::new_for_test(vec![1, 100]);

        let outcome = calculate_damage(&attacker, &defender, Some(&tackle), &DamageTuning::default(), &mut rng);

        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.effectiveness, Effectiveness::NoEffect);
        assert!(!outcome.is_critical);
    }

    #[test]
    fn test_malformed_inputs_miss() {
        let attacker = creature(Element::Normal, 5, 20, 10);
        let defender = creature(Element::Normal, 5, 10, 10);
        let mut rng = TurnRng::new_for_test(vec![]);
        let tuning = DamageTuning::default();

        assert_eq!(calculate_damage(&attacker, &defender, None, &tuning, &mut rng), DamageOutcome::miss());

        let powerless = MoveData::new("Splash", Element::Water, 0);
        let outcome = calculate_damage(&attacker, &defender, Some(&powerless), &tuning, &mut rng);
        assert!(outcome.missed);
        assert!(outcome.damage <= 1);
    }

    #[test]
    fn test_level_difference_is_bounded() {
        let tuning = DamageTuning::default();
        assert_eq!(level_difference_multiplier(10, 10, &tuning), 1.0);
        assert!(level_difference_multiplier(15, 10, &tuning) > 1.0);
        assert!(level_difference_multiplier(5, 10, &tuning) < 1.0);
        assert_eq!(level_difference_multiplier(1, 50, &tuning), tuning.level_diff_min);
        assert_eq!(level_difference_multiplier(50, 1, &tuning), tuning.level_diff_max);
    }

    #[test]
    fn test_damage_positive_unless_immune() {
        let tuning = DamageTuning::default();
        let mut rng = TurnRng::from_seed(7);

        for attack_element in Element::iter() {
            for defend_element in Element::iter() {
                for (level, attack, defense, power) in [(1, 1, 250, 1), (5, 20, 10, 40), (50, 300, 5, 150)] {
                    let attacker = creature(attack_element, level, attack, 10);
                    let defender = creature(defend_element, 50 - level + 1, 10, defense);
                    let move_used = MoveData::new("Probe", attack_element, power);

                    let outcome = calculate_damage(&attacker, &defender, Some(&move_used), &tuning, &mut rng);
                    if Element::effectiveness(attack_element, defend_element) > 0.0 {
                        assert!(outcome.damage >= 1, "{attack_element} vs {defend_element}");
                    } else {
                        assert_eq!(outcome.damage, 0, "{attack_element} vs {defend_element}");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::state::{BattlePhase, Outcome};
    use crate::battle::tests::common::{
        assert_ok, create_test_engine, create_test_roster, fragile_opponent, start_in_player_turn,
        TestCreatureBuilder,
    };
    use crate::opponent::OpponentDescriptor;
    use crate::roster::RosterStore;
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, Element};

    #[test]
    fn test_victory_applies_rewards() {
        let mut roster = create_test_roster(vec![TestCreatureBuilder::new("sprout", Element::Normal, 5).build()]);
        let mut engine = create_test_engine();
        start_in_player_turn(&mut engine, &roster, &fragile_opponent(), "sprout");
        assert_ok(engine.attack(None));
        engine.settle();

        let outcome = assert_ok(engine.end_battle(&mut roster));

        assert_eq!(outcome.outcome, Outcome::Victory);
        assert_eq!(outcome.xp_gained, 60);
        assert_eq!(outcome.currency_gained, 35);
        assert_eq!(outcome.level_up.unwrap().levels_gained(), 0);
        assert_eq!(engine.phase(), BattlePhase::Idle);
        assert!(engine.state().is_none());

        let sprout = roster.creature("sprout").unwrap();
        assert_eq!(sprout.experience, 60);
        assert_eq!(sprout.level, 5);
        assert_eq!(roster.currency(), 135);
    }

    #[test]
    fn test_victory_can_level_up() {
        let mut roster = create_test_roster(vec![TestCreatureBuilder::new("sprout", Element::Normal, 5)
            .with_hp(20)
            .with_experience(450)
            .build()]);
        let mut engine = create_test_engine();
        start_in_player_turn(&mut engine, &roster, &fragile_opponent(), "sprout");
        assert_ok(engine.attack(None));
        engine.settle();

        let outcome = assert_ok(engine.end_battle(&mut roster));

        let report = outcome.level_up.unwrap();
        assert_eq!(report.old_level, 5);
        assert_eq!(report.new_level, 6);
        let sprout = roster.creature("sprout").unwrap();
        assert_eq!(sprout.level, 6);
        assert_eq!(sprout.experience, 10);
        assert_eq!(sprout.stats.max_hp, 55);
        assert_eq!(sprout.current_hp(), 55);
    }

    #[test]
    fn test_boss_pays_more() {
        let boss = OpponentDescriptor::new("Test Pup", Element::Normal, 5)
            .boss()
            .with_stats(BaseStats { max_hp: 10, attack: 10, defense: 10, speed: 10 });
        let mut roster = create_test_roster(vec![TestCreatureBuilder::new("sprout", Element::Normal, 5).build()]);
        let mut engine = create_test_engine();
        start_in_player_turn(&mut engine, &roster, &boss, "sprout");
        assert_ok(engine.attack(None));
        engine.settle();

        let outcome = assert_ok(engine.end_battle(&mut roster));

        // 60 * 2.5 and 35 * 3, near-neutral jitter
        assert_eq!(outcome.xp_gained, 150);
        assert_eq!(outcome.currency_gained, 105);
    }

    #[test]
    fn test_bench_damage_is_persisted_on_victory() {
        let mut roster = create_test_roster(vec![
            TestCreatureBuilder::new("sprout", Element::Normal, 5).with_hp(1).build(),
            TestCreatureBuilder::new("ember", Element::Fire, 5).build(),
        ]);
        let opponent = OpponentDescriptor::new("Test Pup", Element::Normal, 5)
            .with_stats(BaseStats { max_hp: 15, attack: 20, defense: 10, speed: 10 });
        let mut engine = create_test_engine();
        start_in_player_turn(&mut engine, &roster, &opponent, "sprout");

        assert_ok(engine.attack(None));
        engine.settle();
        assert_eq!(engine.phase(), BattlePhase::ChangingCreature);
        assert_ok(engine.select_creature("ember"));
        assert_ok(engine.attack(None));
        engine.settle();
        assert_eq!(engine.phase(), BattlePhase::Victory);

        let outcome = assert_ok(engine.end_battle(&mut roster));

        assert_eq!(outcome.outcome, Outcome::Victory);
        assert_eq!(roster.creature("sprout").unwrap().current_hp(), 0);
        assert_eq!(roster.creature("ember").unwrap().experience, 60);
        assert_eq!(roster.creature("sprout").unwrap().experience, 0);
    }
}

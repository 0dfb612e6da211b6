use civodds::combat::{
    binomial, factorial, resolve_battle, resolve_gauntlet, StateMap, Unit,
};

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn unit(strength: f64, hp: u32, first_hits: u32) -> Unit {
    Unit::new(strength, hp, first_hits).unwrap()
}

#[test]
fn combinatorics_known_values() {
    assert_eq!(factorial(0).unwrap(), 1.0);
    assert_eq!(factorial(1).unwrap(), 1.0);
    assert_eq!(factorial(2).unwrap(), 2.0);
    assert_eq!(factorial(3).unwrap(), 6.0);
    assert_eq!(factorial(5).unwrap(), 120.0);
    assert_eq!(binomial(6, 2).unwrap(), 15.0);
    assert_eq!(binomial(9, 4).unwrap(), 126.0);
}

#[test]
fn axe_versus_spearman_golden_odds() {
    // Wounded axeman with combat bonus vs wounded spearman. With round odds
    // scaled by remaining health, the attacker lands just under a third;
    // nominal-strength odds would have put it near 52%.
    let axe = unit(5.0 * 1.5 * 0.64, 64, 0);
    let spear = unit(4.0 * 0.91, 91, 0);

    let outcome = resolve_battle(&axe, &spear).unwrap();
    let win = outcome.attacker.win_probability();
    approx_eq(win, 0.322_928_958_583_645_4, 1e-9);
    approx_eq(outcome.defender.win_probability(), 1.0 - win, 1e-9);
}

#[test]
fn battle_partitions_outcomes_between_two_winners() {
    let pairs = [
        (unit(2.0, 100, 0), unit(3.0, 100, 0)),
        (unit(3.0, 100, 0), unit(3.0, 100, 0)),
        (unit(5.5, 40, 0), unit(1.2, 100, 0)),
        (unit(3.8 * 1.75 * 0.4, 40, 0), unit(2.0, 100, 0)),
    ];
    for (attacker, defender) in &pairs {
        let outcome = resolve_battle(attacker, defender).unwrap();
        approx_eq(
            outcome.attacker.win_probability() + outcome.defender.win_probability(),
            1.0,
            1e-9,
        );
    }
}

#[test]
fn outcome_channels_always_sum_to_one() {
    let archer = unit(3.0, 100, 1);
    let warrior = unit(2.0, 100, 0);
    let outcome = resolve_battle(&warrior, &archer).unwrap();
    approx_eq(
        outcome.attacker.win_probability() + outcome.attacker.eliminated,
        1.0,
        1e-9,
    );
    approx_eq(
        outcome.defender.win_probability() + outcome.defender.eliminated,
        1.0,
        1e-9,
    );
}

#[test]
fn first_hits_shift_the_odds() {
    let warrior = unit(2.5, 100, 0);
    let plain = unit(3.0, 100, 0);
    let volley = unit(3.0, 100, 2);

    let without = resolve_battle(&warrior, &plain).unwrap();
    let with = resolve_battle(&warrior, &volley).unwrap();
    assert!(
        with.defender.win_probability() > without.defender.win_probability(),
        "first hits should favor the defender"
    );
}

#[test]
fn state_keys_are_positive_and_bounded_by_input_health() {
    let attacker = unit(3.3, 83, 1);
    let defender = unit(3.0 * 1.65, 100, 1);
    let outcome = resolve_battle(&attacker, &defender).unwrap();

    for (&hp, &mass) in outcome.attacker.survived.iter() {
        assert!(hp >= 1 && hp <= attacker.hp, "attacker key {hp}");
        assert!(mass >= 0.0);
    }
    for (&hp, &mass) in outcome.defender.survived.iter() {
        assert!(hp >= 1 && hp <= defender.hp, "defender key {hp}");
        assert!(mass >= 0.0);
    }
}

#[test]
fn resolving_twice_gives_identical_distributions() {
    let attacker = unit(3.0, 83, 2);
    let defender = unit(3.0 * 1.65, 100, 1);
    let first = resolve_battle(&attacker, &defender).unwrap();
    let second = resolve_battle(&attacker, &defender).unwrap();
    assert_eq!(first, second);

    let gauntlet_first = resolve_gauntlet(&[attacker, attacker], &defender).unwrap();
    let gauntlet_second = resolve_gauntlet(&[attacker, attacker], &defender).unwrap();
    assert_eq!(gauntlet_first, gauntlet_second);
}

#[test]
fn units_are_never_mutated_by_resolution() {
    let attacker = unit(2.0, 100, 0);
    let defender = unit(3.0, 100, 1);
    let before = (attacker, defender);
    let _ = resolve_battle(&attacker, &defender).unwrap();
    let _ = resolve_gauntlet(&[attacker], &defender).unwrap();
    assert_eq!(before, (attacker, defender));
}

#[test]
fn gauntlet_conserves_probability_across_the_chain() {
    let waves = [
        vec![unit(3.0, 83, 0)],
        vec![unit(3.0, 83, 0), unit(3.0, 100, 0)],
        vec![unit(2.0, 100, 0), unit(2.0, 100, 0), unit(3.3, 83, 0)],
    ];
    let defender = unit(3.0 * 1.65, 100, 0);

    for attackers in &waves {
        let result = resolve_gauntlet(attackers, &defender).unwrap();
        let attacker_mass: f64 = result
            .attacker_states
            .iter()
            .map(StateMap::win_probability)
            .sum();
        approx_eq(
            attacker_mass + result.defender_survival_probability(),
            1.0,
            1e-9,
        );
    }
}

#[test]
fn archer_gauntlet_golden_values() {
    // Two archers against a fortified forest archer. Pinned so any change
    // to the round or pre-phase formulas shows up as a diff here.
    let wave = [unit(3.0, 83, 2), unit(3.0, 100, 1)];
    let defender = unit(3.0 * 1.65, 100, 1);

    let result = resolve_gauntlet(&wave, &defender).unwrap();
    approx_eq(
        result.attacker_states[0].win_probability(),
        0.012_767_251_171_554_968,
        1e-9,
    );
    approx_eq(
        result.attacker_states[1].win_probability(),
        0.454_400_236_384_978_3,
        1e-9,
    );
    approx_eq(
        result.defender_survival_probability(),
        0.532_832_512_443_466_9,
        1e-9,
    );
}

#[test]
fn gauntlet_defender_only_weakens() {
    let defender = unit(3.0 * 1.65, 100, 1);
    let wave = [unit(3.0, 83, 2), unit(3.0, 100, 1)];
    let result = resolve_gauntlet(&wave, &defender).unwrap();

    let after_one = resolve_gauntlet(&wave[..1], &defender).unwrap();
    assert!(
        result.defender_survival_probability() <= after_one.defender_survival_probability(),
        "an extra attacker cannot improve the defender's survival"
    );
    for (&hp, _) in result.defender_states.iter() {
        assert!(hp >= 1 && hp <= defender.hp);
    }
}

#[test]
fn wounded_defender_branches_use_current_health() {
    // A defender branch at low health must be easier to beat than the
    // full-health defender.
    let attacker = unit(2.0, 100, 0);
    let defender = unit(3.0, 100, 0);
    let fresh = resolve_battle(&attacker, &defender).unwrap();
    let wounded = resolve_battle(&attacker, &defender.at_hp(30)).unwrap();
    assert!(wounded.attacker.win_probability() > fresh.attacker.win_probability());
}

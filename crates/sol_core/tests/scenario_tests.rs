//! End-to-end gameplay scenarios.
//!
//! Each test drives a session or state through the public API the way a
//! client would: clicks, ticks and the fixed-step clock.

use sol_core::combat::ArrivalOutcome;
use sol_core::data::LevelRegistry;
use sol_core::dispatch::{dispatch, DispatchOrder};
use sol_core::math::{percent, Fixed};
use sol_core::motion;
use sol_core::owner::Owner;
use sol_core::planet::PlanetId;
use sol_core::selection::ClickOutcome;
use sol_core::simulation::{SimConfig, Simulation};
use sol_core::state::GameStatus;
use sol_test_utils::fixtures::{builtin_levels, duel, fixed, playing_level, StateBuilder};

/// Tick seconds at the default rate.
fn tick_seconds() -> Fixed {
    SimConfig::default().tick_seconds()
}

#[test]
fn attack_on_stronger_planet_is_repelled() {
    let mut state = duel();

    let id = dispatch(
        &mut state,
        &DispatchOrder::new(PlanetId(0), PlanetId(1), percent(50)),
    )
    .unwrap();
    assert_eq!(state.planets[0].fleet_count, fixed(5));
    let fleet = state.fleet(id).unwrap();
    assert_eq!(fleet.count, 5);
    assert_eq!(fleet.owner, Owner::Player);
    assert_eq!(fleet.progress, Fixed::ZERO);

    let mut reports = Vec::new();
    for _ in 0..2000 {
        reports.extend(motion::run(&mut state, tick_seconds()));
        if state.fleets.is_empty() {
            break;
        }
    }

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, ArrivalOutcome::Repelled);
    assert_eq!(state.planets[1].fleet_count, fixed(45));
    assert_eq!(state.planets[1].owner, Owner::Ai);
}

#[test]
fn attack_on_weaker_neutral_captures_it() {
    let mut state = StateBuilder::new()
        .planet(Owner::Player, fixed(20))
        .planet(Owner::Ai, fixed(10))
        .planet(Owner::Neutral, fixed(5))
        .build();

    dispatch(
        &mut state,
        &DispatchOrder::new(PlanetId(0), PlanetId(2), percent(50)),
    )
    .unwrap();
    while !state.fleets.is_empty() {
        motion::run(&mut state, tick_seconds());
    }

    assert_eq!(state.planets[2].owner, Owner::Player);
    assert_eq!(state.planets[2].fleet_count, fixed(5));
}

#[test]
fn two_clicks_send_half_the_garrison() {
    let mut sim = playing_level(1, 42);

    assert_eq!(
        sim.click_planet(PlanetId(0)),
        ClickOutcome::Selected(PlanetId(0))
    );
    let ClickOutcome::Dispatched(Some(id)) = sim.click_planet(PlanetId(1)) else {
        panic!("expected a dispatch");
    };

    assert_eq!(sim.state().planets[0].fleet_count, fixed(5));
    assert_eq!(sim.state().fleet(id).unwrap().count, 5);
    assert_eq!(sim.selected(), None);
}

#[test]
fn fleet_travel_time_follows_speed() {
    let mut sim = playing_level(1, 42);
    sim.click_planet(PlanetId(0));
    sim.click_planet(PlanetId(1));

    let mut arrival_tick = None;
    for _ in 0..1000 {
        let events = sim.tick();
        if !events.arrivals.is_empty() {
            arrival_tick = Some(events.tick);
            break;
        }
    }

    // 0.3 progress per second: a little over three seconds at 60 Hz.
    let arrival_tick = arrival_tick.expect("fleet should arrive");
    assert!((195..=210).contains(&arrival_tick), "arrived at {arrival_tick}");
}

#[test]
fn faster_clock_does_not_change_travel_time_in_seconds() {
    let levels = builtin_levels();
    let config = SimConfig {
        tick_rate: 120,
        economy_interval_ticks: 120,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config);
    sim.start_level(&levels, 1).unwrap();
    sim.click_planet(PlanetId(0));
    sim.click_planet(PlanetId(1));

    let mut arrival_tick = None;
    for _ in 0..2000 {
        if !sim.tick().arrivals.is_empty() {
            arrival_tick = Some(sim.get_tick());
            break;
        }
    }
    let arrival_tick = arrival_tick.expect("fleet should arrive");
    assert!((390..=420).contains(&arrival_tick), "arrived at {arrival_tick}");
}

#[test]
fn advance_with_wall_clock_matches_manual_ticks() {
    let mut by_clock = playing_level(3, 5);
    let mut by_tick = playing_level(3, 5);

    // Ten seconds in uneven frame deltas.
    let frame = Fixed::from_num(1) / Fixed::from_num(30);
    let mut ticks_run = 0u64;
    for _ in 0..300 {
        ticks_run += by_clock.advance(frame).len() as u64;
    }
    for _ in 0..ticks_run {
        by_tick.tick();
    }

    assert_eq!(by_clock.get_tick(), ticks_run);
    assert_eq!(by_clock.state_hash(), by_tick.state_hash());
}

#[test]
fn player_wins_by_eliminating_the_ai() {
    let mut sim = Simulation::default();
    let levels = LevelRegistry::from_ron_str(
        r#"[
            LevelData(
                id: 1,
                name: "Walkover",
                planets: [
                    (name: "Home", fleet_count: 100.0, owner: Player, production_rate: 1.0),
                    (name: "Outpost", fleet_count: 3.0, owner: Ai, production_rate: 0.0),
                ],
            ),
        ]"#,
        "walkover.ron",
    )
    .unwrap();
    sim.start_level(&levels, 1).unwrap();

    sim.click_planet(PlanetId(0));
    sim.click_planet(PlanetId(1));

    let status = sim.run_until_finished(2000);
    assert_eq!(status, GameStatus::Won);
    assert_eq!(sim.state().planets[1].owner, Owner::Player);
}

#[test]
fn passive_player_eventually_loses_the_inner_ring() {
    let mut sim = playing_level(1, 42);
    let status = sim.run_until_finished(60 * 60 * 20);
    assert_eq!(status, GameStatus::Lost);
}

#[test]
fn terminal_status_freezes_the_board() {
    let mut sim = playing_level(1, 42);
    sim.run_until_finished(60 * 60 * 20);
    assert!(sim.status().is_terminal());

    let hash = sim.state_hash();
    for _ in 0..100 {
        sim.tick();
    }
    assert!(sim.advance(Fixed::from_num(5)).is_empty());
    assert_eq!(sim.click_planet(PlanetId(0)), ClickOutcome::Ignored);
    assert_eq!(sim.state_hash(), hash);
}

#[test]
fn new_level_replaces_old_state() {
    let levels = builtin_levels();
    let mut sim = playing_level(5, 1);
    for _ in 0..600 {
        sim.tick();
    }

    sim.start_level(&levels, 2).unwrap();
    assert_eq!(sim.get_tick(), 0);
    assert_eq!(sim.state().current_level, 2);
    assert_eq!(sim.state().planets.len(), 5);
    assert!(sim.state().fleets.is_empty());
    assert_eq!(sim.status(), GameStatus::Playing);
}

#[test]
fn hud_summary_counts_fleets_in_flight() {
    let mut sim = playing_level(2, 42);
    let before = sim.player_summary();

    sim.click_planet(PlanetId(0));
    sim.click_planet(PlanetId(2));

    let after = sim.player_summary();
    assert_eq!(before.total_fleets, after.total_fleets);
    assert_eq!(after.planets_owned, 2);
    assert_eq!(after.planets_total, 5);
}

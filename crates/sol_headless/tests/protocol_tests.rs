//! The JSON protocol must drive a session exactly like direct API calls.

use proptest::prelude::*;
use sol_core::data::LevelRegistry;
use sol_core::owner::Owner;
use sol_core::planet::PlanetId;
use sol_headless::protocol::{Command, Response};
use sol_headless::runner::{HeadlessConfig, HeadlessRunner};
use sol_test_utils::determinism::{run_script, strategies, ScriptedClick};
use sol_test_utils::fixtures::playing_level;

fn runner(seed: u64) -> HeadlessRunner {
    let config = HeadlessConfig {
        seed,
        ..HeadlessConfig::default()
    };
    HeadlessRunner::new(LevelRegistry::builtin().unwrap(), config)
}

/// Replay a click script through protocol commands and return the hash.
fn hash_via_protocol(
    seed: u64,
    level: u32,
    script: &[ScriptedClick],
    ticks: u64,
) -> u64 {
    let mut runner = runner(seed);
    runner.handle(Command::StartLevel { level });

    let mut elapsed = 0u64;
    for click in script {
        if click.tick > elapsed {
            let count = u32::try_from(click.tick - elapsed).unwrap();
            runner.handle(Command::Tick { count });
            elapsed = click.tick;
        }
        runner.handle(Command::Click {
            planet: click.planet.0,
        });
    }
    if ticks > elapsed {
        let count = u32::try_from(ticks - elapsed).unwrap();
        runner.handle(Command::Tick { count });
    }

    match runner.handle(Command::Hash).as_slice() {
        [Response::StateHash { hash, .. }] => *hash,
        other => panic!("unexpected response {other:?}"),
    }
}

#[test]
fn protocol_session_matches_direct_session() {
    let script = [
        ScriptedClick {
            tick: 0,
            planet: PlanetId(1),
        },
        ScriptedClick {
            tick: 30,
            planet: PlanetId(2),
        },
        ScriptedClick {
            tick: 31,
            planet: PlanetId(0),
        },
    ];

    let mut direct = playing_level(5, 99);
    run_script(&mut direct, &script, 1200);

    assert_eq!(hash_via_protocol(99, 5, &script, 1200), direct.state_hash());
}

#[test]
fn full_session_over_a_byte_stream() {
    let input = [
        r#"{"cmd":"start_level","level":1}"#,
        r#"{"cmd":"click","planet":0}"#,
        r#"{"cmd":"click","planet":1}"#,
        r#"{"cmd":"advance","seconds":1.0}"#,
        r#"{"cmd":"query"}"#,
        r#"{"cmd":"quit"}"#,
    ]
    .join("\n");

    let mut output = Vec::new();
    runner(42).run(input.as_bytes(), &mut output).unwrap();
    let responses: Vec<Response> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let states: Vec<_> = responses
        .iter()
        .filter_map(|r| match r {
            Response::State(view) => Some(view),
            _ => None,
        })
        .collect();
    assert_eq!(states.len(), 2);
    assert_eq!(states[0].tick, 60);
    assert_eq!(states[0], states[1]);
    assert_eq!(
        states[1]
            .fleets
            .iter()
            .filter(|f| f.owner == Owner::Player)
            .count(),
        1
    );
    assert!((states[1].planets[0].fleet_count - 6.0).abs() < 1e-9);
    assert_eq!(responses.last(), Some(&Response::Bye));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn random_protocol_scripts_match_direct_play(
        seed in any::<u64>(),
        level in 1u32..=5,
        script in strategies::arb_click_script(8, 600, 12),
    ) {
        let mut direct = playing_level(level, seed);
        run_script(&mut direct, &script, 600);
        prop_assert_eq!(hash_via_protocol(seed, level, &script, 600), direct.state_hash());
    }
}

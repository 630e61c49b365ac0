use rand::rngs::StdRng;
use rand::SeedableRng;
use turret_arena::autopilot::TurretAutopilot;
use turret_arena::input::InputState;

fn run(seed: u64, ticks: usize) -> Vec<InputState> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pilot = TurretAutopilot::new();
    (0..ticks).map(|_| pilot.next_input(&mut rng)).collect()
}

#[test]
fn same_seed_replays_the_same_sequence() {
    assert_eq!(run(42, 500), run(42, 500));
}

#[test]
fn presses_buttons_eventually() {
    let inputs = run(3, 2000);
    let pressed = inputs
        .iter()
        .filter(|i| i.top_buttons.iter().chain(&i.bottom_buttons).any(|b| *b))
        .count();
    assert!(pressed > 0);
}

#[test]
fn holds_last_at_least_sixty_ticks() {
    let inputs = run(11, 3000);
    let column: Vec<bool> = inputs.iter().map(|i| i.top_buttons[0]).collect();
    let mut run_len = 0;
    let mut runs = Vec::new();
    for pressed in column {
        if pressed {
            run_len += 1;
        } else if run_len > 0 {
            runs.push(run_len);
            run_len = 0;
        }
    }
    assert!(!runs.is_empty());
    // Back-to-back holds can merge, so only the lower bound is exact.
    assert!(runs.iter().all(|&n| n >= 60), "runs: {runs:?}");
}

#[test]
fn never_touches_pointer_or_fire() {
    for input in run(5, 2000) {
        assert!(input.pointer.is_none());
        assert!(!input.fire);
    }
}

#[test]
fn holds_count_down_to_zero() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut pilot = TurretAutopilot::new();
    for _ in 0..3000 {
        pilot.next_input(&mut rng);
        assert!(pilot.holds().iter().all(|&h| h < 240));
    }
}

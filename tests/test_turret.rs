use turret_arena::assets::AssetMetadata;
use turret_arena::config::{ArenaConfig, TurretPlacement};
use turret_arena::entities::{Entity, FireType};
use turret_arena::pool::Poolable;
use turret_arena::surface::{DrawCall, ImageId, Layers};
use turret_arena::turret::Turret;

const FIRE_DELAY: u32 = 60;

fn make_turret(fire_type: FireType) -> Turret {
    let config = ArenaConfig::default();
    let placement = config
        .turrets
        .iter()
        .find(|p| p.fire_type == fire_type)
        .copied()
        .expect("default table has every fire type");
    Turret::new(&placement, &AssetMetadata::default(), FIRE_DELAY, 4.0)
}

fn run(turret: &mut Turret, ticks: u32) {
    for _ in 0..ticks {
        turret.update();
    }
}

fn state(turret: &Turret) -> (u8, u8) {
    (turret.level(), turret.phase())
}

// ── Rest state ────────────────────────────────────────────────────────────────

#[test]
fn idle_turret_stays_pinned_at_rest() {
    let mut t = make_turret(FireType::Down);
    for _ in 0..1000 {
        t.update();
        assert_eq!(state(&t), (0, 0));
        assert_eq!(t.counter(), 0);
    }
    assert!(t.is_idle());
    assert_eq!(t.pool().alive_count(), 0);
}

// ── Escalation ────────────────────────────────────────────────────────────────

#[test]
fn held_turret_steps_phase_every_third_of_fire_delay() {
    let mut t = make_turret(FireType::Down);
    t.set_in_use(true);
    run(&mut t, 19);
    assert_eq!(state(&t), (0, 0));
    run(&mut t, 1);
    assert_eq!(state(&t), (0, 1));
    run(&mut t, 20);
    assert_eq!(state(&t), (0, 2));
}

#[test]
fn held_turret_gains_a_level_per_fire_delay() {
    let mut t = make_turret(FireType::Down);
    t.set_in_use(true);
    run(&mut t, FIRE_DELAY);
    assert_eq!(state(&t), (1, 0));
    run(&mut t, FIRE_DELAY);
    assert_eq!(state(&t), (2, 0));
}

#[test]
fn level_never_exceeds_two() {
    let mut t = make_turret(FireType::Up);
    t.set_in_use(true);
    for _ in 0..2000 {
        t.update();
        assert!(t.level() <= 2);
        assert!(t.phase() <= 2);
    }
    assert_eq!(t.level(), 2);
}

// ── De-escalation ─────────────────────────────────────────────────────────────

#[test]
fn release_from_max_mirrors_escalation_time() {
    let mut t = make_turret(FireType::Left);
    t.set_in_use(true);
    run(&mut t, 2 * FIRE_DELAY);
    assert_eq!(state(&t), (2, 0));

    t.set_in_use(false);
    run(&mut t, 2 * FIRE_DELAY - 1);
    assert_eq!(state(&t), (0, 1));
    run(&mut t, 1);
    assert_eq!(state(&t), (0, 0));
    assert!(t.is_idle());
}

#[test]
fn release_steps_down_through_phase_two() {
    let mut t = make_turret(FireType::Right);
    t.set_in_use(true);
    run(&mut t, FIRE_DELAY);
    assert_eq!(state(&t), (1, 0));

    t.set_in_use(false);
    run(&mut t, FIRE_DELAY / 3);
    assert_eq!(state(&t), (0, 2));
}

#[test]
fn rehold_mid_decay_climbs_again() {
    let mut t = make_turret(FireType::Down);
    t.set_in_use(true);
    run(&mut t, FIRE_DELAY);
    t.set_in_use(false);
    run(&mut t, 20);
    assert_eq!(state(&t), (0, 2));

    t.set_in_use(true);
    run(&mut t, 20);
    assert_eq!(state(&t), (1, 0));
}

// ── Fire side effects ─────────────────────────────────────────────────────────

#[test]
fn reaching_level_one_lights_the_fire() {
    let mut t = make_turret(FireType::Down);
    t.set_in_use(true);
    run(&mut t, FIRE_DELAY - 1);
    assert_eq!(t.pool().alive_count(), 0);
    run(&mut t, 1);
    assert_eq!(t.pool().alive_count(), 1);
    assert_eq!(t.pool().slot(0).level(), 1);
    assert_eq!(t.pool().slot(0).origin(), t.mouth());
}

#[test]
fn fire_level_follows_turret_level() {
    let mut t = make_turret(FireType::Up);
    t.set_in_use(true);
    run(&mut t, 2 * FIRE_DELAY);
    assert_eq!(t.pool().slot(0).level(), 2);

    t.set_in_use(false);
    run(&mut t, FIRE_DELAY);
    assert_eq!(t.level(), 1);
    assert_eq!(t.pool().slot(0).level(), 1);

    run(&mut t, FIRE_DELAY);
    assert_eq!(t.level(), 0);
    assert_eq!(t.pool().slot(0).level(), 0);
}

#[test]
fn dropped_fire_is_released_by_animation() {
    let mut t = make_turret(FireType::Down);
    let mut layers = Layers::recording(500.0, 460.0);
    t.set_in_use(true);
    for _ in 0..FIRE_DELAY + 30 {
        t.tick(&mut layers);
        t.animate_fire(&mut layers);
    }
    assert_eq!(t.pool().alive_count(), 1);

    t.set_in_use(false);
    for _ in 0..FIRE_DELAY + 100 {
        t.tick(&mut layers);
        t.animate_fire(&mut layers);
    }
    assert_eq!(t.level(), 0);
    assert_eq!(t.pool().alive_count(), 0);
}

// ── Geometry & drawing ────────────────────────────────────────────────────────

#[test]
fn mouth_sits_on_the_arena_facing_edge() {
    // Frames are 100 wide, the sheet is 60 tall.
    assert_eq!(make_turret(FireType::Down).mouth(), (150.0, 60.0));
    assert_eq!(make_turret(FireType::Up).mouth(), (150.0, 400.0));
    assert_eq!(make_turret(FireType::Left).mouth(), (440.0, 130.0));
    assert_eq!(make_turret(FireType::Right).mouth(), (60.0, 130.0));
}

#[test]
fn sprite_source_indexes_level_and_phase() {
    let mut t = make_turret(FireType::Down);
    assert_eq!(t.sprite_source().x, 0.0);
    t.set_in_use(true);
    run(&mut t, FIRE_DELAY + 40);
    assert_eq!(state(&t), (1, 2));
    assert_eq!(t.sprite_source().x, 500.0);
    assert_eq!(t.sprite_source().width, 100.0);
}

#[test]
fn tick_draws_rotated_sprite_on_ship_layer() {
    let placement = TurretPlacement {
        x: 420.0,
        y: 100.0,
        angle: 90.0,
        fire_type: FireType::Left,
    };
    let mut t = Turret::new(&placement, &AssetMetadata::default(), FIRE_DELAY, 4.0);
    let mut layers = Layers::recording(500.0, 460.0);
    t.tick(&mut layers);

    let calls = layers.ship.calls();
    assert_eq!(calls[0], DrawCall::Save);
    assert_eq!(calls[1], DrawCall::Translate(470.0, 130.0));
    assert_eq!(calls[2], DrawCall::Rotate(90.0_f32.to_radians()));
    assert_eq!(layers.ship.images_of(ImageId::Turret), 1);
    assert!(layers.main.calls().is_empty());
}

use turret_arena::config::ArenaConfig;
use turret_arena::entities::{CollisionKind, Entity, Rect};
use turret_arena::game::{detect_collisions, Collider, ColliderId, Game};
use turret_arena::input::InputState;
use turret_arena::pool::Poolable;
use turret_arena::quadtree::QuadTree;
use turret_arena::surface::{DrawCall, ImageId, Layers, RecordingSurface};

fn new_game() -> (Game, Layers<RecordingSurface>) {
    let game = Game::new(ArenaConfig::default());
    let layers = Layers::recording(500.0, 460.0);
    (game, layers)
}

fn player_collider(bounds: Rect) -> Collider {
    Collider {
        id: ColliderId::Player,
        kind: CollisionKind::Player,
        collides_with: Some(CollisionKind::Fire),
        bounds,
    }
}

fn fire_collider(turret: usize, bounds: Rect) -> Collider {
    Collider {
        id: ColliderId::Fire { turret, slot: 0 },
        kind: CollisionKind::Fire,
        collides_with: Some(CollisionKind::Player),
        bounds,
    }
}

fn tree_of(colliders: &[Collider]) -> QuadTree<Collider> {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 500.0, 460.0));
    for c in colliders {
        tree.insert(*c).expect("finite bounds");
    }
    tree
}

/// Hold the middle top-row button (turret 1, directly above the start point).
fn hold_s() -> InputState {
    InputState { top_buttons: [false, true, false], ..InputState::default() }
}

// ── detect_collisions ─────────────────────────────────────────────────────────

#[test]
fn overlapping_compatible_pair_flags_both() {
    let tree = tree_of(&[
        player_collider(Rect::new(230.0, 200.0, 40.0, 60.0)),
        fire_collider(1, Rect::new(200.0, 60.0, 100.0, 245.0)),
    ]);
    let hits = detect_collisions(&tree);
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&ColliderId::Player));
    assert!(hits.contains(&ColliderId::Fire { turret: 1, slot: 0 }));
}

#[test]
fn separate_boxes_do_not_collide() {
    let tree = tree_of(&[
        player_collider(Rect::new(230.0, 200.0, 40.0, 60.0)),
        fire_collider(1, Rect::new(200.0, -62.5, 100.0, 245.0)),
    ]);
    assert!(detect_collisions(&tree).is_empty());
}

#[test]
fn touching_edges_do_not_collide() {
    let tree = tree_of(&[
        player_collider(Rect::new(230.0, 200.0, 40.0, 60.0)),
        fire_collider(1, Rect::new(200.0, -45.0, 100.0, 245.0)),
    ]);
    assert!(detect_collisions(&tree).is_empty());
}

#[test]
fn fires_never_collide_with_each_other() {
    let tree = tree_of(&[
        fire_collider(1, Rect::new(200.0, 60.0, 100.0, 245.0)),
        fire_collider(4, Rect::new(60.0, 180.0, 245.0, 100.0)),
    ]);
    assert!(detect_collisions(&tree).is_empty());
}

// ── Tick ──────────────────────────────────────────────────────────────────────

#[test]
fn first_tick_draws_scene_without_hits() {
    let (mut game, mut layers) = new_game();
    let report = game.tick(&InputState::default(), &mut layers);

    assert_eq!(report.frame, 1);
    assert!(!report.player_hit);
    assert_eq!(report.collisions, 0);
    assert_eq!(layers.background.images_of(ImageId::Background), 2);
    assert_eq!(layers.ship.images_of(ImageId::Player), 1);
    assert_eq!(layers.ship.images_of(ImageId::Turret), 12);
    assert_eq!(layers.ship.images_of(ImageId::Corner), 4);
    assert_eq!(
        layers.main.calls()[0],
        DrawCall::ClearRect(Rect::new(0.0, 0.0, 500.0, 460.0))
    );
    assert_eq!(game.quad_tree().len(), 1);
}

#[test]
fn draw_static_places_every_corner() {
    let (game, mut layers) = new_game();
    game.draw_static(&mut layers);
    assert_eq!(layers.ship.images_of(ImageId::Corner), 4);
}

#[test]
fn corners_survive_shots_fired_through_them() {
    let (mut game, mut layers) = new_game();
    let corner = Rect::new(0.0, 0.0, 100.0, 100.0);
    // Top-left of the allowed area: the left gun sits inside the corner.
    let input = InputState { fire: true, pointer: Some((0.0, 0.0)), ..InputState::default() };
    let mut erased = 0;
    for _ in 0..200 {
        layers.reset();
        game.tick(&input, &mut layers);

        let calls = layers.ship.calls();
        let last_erase = calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::ClearRect(r) if r.intersects(&corner)));
        let last_corner = calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Image { image: ImageId::Corner, .. }));
        if let Some(erase) = last_erase {
            erased += 1;
            assert!(last_corner.is_some_and(|c| c > erase), "frame {}", game.frame());
        }
    }
    assert_eq!(game.player().target(), (60.0, 60.0));
    assert!(erased > 0);
}

#[test]
fn background_pans_and_wraps() {
    let (mut game, mut layers) = new_game();
    for _ in 0..459 {
        game.tick(&InputState::default(), &mut layers);
    }
    assert_eq!(game.background().offset(), 459.0);
    game.tick(&InputState::default(), &mut layers);
    assert_eq!(game.background().offset(), 0.0);
}

#[test]
fn lit_fires_enter_the_quad_tree() {
    let (mut game, mut layers) = new_game();
    for _ in 0..61 {
        game.tick(&hold_s(), &mut layers);
    }
    assert_eq!(game.cluster().turret(1).pool().alive_count(), 1);
    assert_eq!(game.quad_tree().len(), 2);
}

#[test]
fn level_one_fire_falls_short_of_the_player() {
    let (mut game, mut layers) = new_game();
    for _ in 0..115 {
        let report = game.tick(&hold_s(), &mut layers);
        assert!(!report.player_hit, "hit at frame {}", report.frame);
    }
}

#[test]
fn level_two_fire_hits_and_freezes_the_player() {
    let (mut game, mut layers) = new_game();
    let hit_frame = (0..250)
        .map(|_| game.tick(&hold_s(), &mut layers))
        .find(|r| r.player_hit)
        .map(|r| r.frame)
        .expect("player should be hit while S is held");
    assert!(hit_frame > 120);

    let fire = game.cluster().turret(1).pool().slot(0);
    assert!(fire.is_alive());
    assert!(fire.body().is_colliding);

    let frozen = (game.player().body().x, game.player().body().y);
    let steer = InputState { pointer: Some((0.0, 0.0)), ..hold_s() };
    for _ in 0..30 {
        let report = game.tick(&steer, &mut layers);
        assert!(report.player_hit);
    }
    assert_eq!((game.player().body().x, game.player().body().y), frozen);
}

#[test]
fn releasing_the_turret_frees_the_player() {
    let (mut game, mut layers) = new_game();
    for _ in 0..250 {
        game.tick(&hold_s(), &mut layers);
    }
    assert!(game.player().is_colliding());

    let freed = (0..150)
        .map(|_| game.tick(&InputState::default(), &mut layers))
        .any(|r| !r.player_hit);
    assert!(freed);
    assert!(!game.cluster().turret(1).pool().slot(0).body().is_colliding);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_target_is_clamped_to_the_margin() {
    let (mut game, mut layers) = new_game();
    game.tick(&InputState { pointer: Some((0.0, 0.0)), ..InputState::default() }, &mut layers);
    assert_eq!(game.player().target(), (60.0, 60.0));

    game.tick(
        &InputState { pointer: Some((1000.0, 1000.0)), ..InputState::default() },
        &mut layers,
    );
    assert_eq!(game.player().target(), (400.0, 340.0));
}

#[test]
fn player_moves_toward_the_pointer_at_its_speed() {
    let (mut game, mut layers) = new_game();
    let start = game.player().body().x;
    // Pointer marks the centre: x = 320 puts the target at 300.
    let input = InputState { pointer: Some((320.0, 230.0)), ..InputState::default() };
    game.tick(&input, &mut layers);
    assert_eq!(game.player().body().x, start + 5.0);
    for _ in 0..20 {
        game.tick(&input, &mut layers);
    }
    assert_eq!(game.player().body().x, 300.0);
}

#[test]
fn fire_button_shoots_twin_bullets_on_cooldown() {
    let (mut game, mut layers) = new_game();
    let input = InputState { fire: true, ..InputState::default() };
    game.tick(&input, &mut layers);
    assert_eq!(game.player().bullets().alive_count(), 2);

    let xs: Vec<f32> = game
        .player()
        .bullets()
        .iter_alive()
        .map(|(_, b)| b.body().x)
        .collect();
    assert!(xs.contains(&236.0));
    assert!(xs.contains(&263.0));

    for _ in 0..14 {
        game.tick(&input, &mut layers);
    }
    assert_eq!(game.player().bullets().alive_count(), 2);
    game.tick(&input, &mut layers);
    assert_eq!(game.player().bullets().alive_count(), 4);
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn merge_turrets_ors_buttons_and_keeps_own_pointer() {
    let keyboard = InputState {
        top_buttons: [true, false, false],
        fire: true,
        pointer: Some((10.0, 20.0)),
        ..InputState::default()
    };
    let pilot = InputState {
        top_buttons: [false, false, true],
        bottom_buttons: [false, true, false],
        bottom_toggle: true,
        fire: false,
        pointer: Some((99.0, 99.0)),
        ..InputState::default()
    };
    let merged = keyboard.merge_turrets(&pilot);
    assert_eq!(merged.top_buttons, [true, false, true]);
    assert_eq!(merged.bottom_buttons, [false, true, false]);
    assert!(merged.bottom_toggle);
    assert!(!merged.top_toggle);
    assert!(merged.fire);
    assert_eq!(merged.pointer, Some((10.0, 20.0)));
}

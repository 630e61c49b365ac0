//! Per-tick orchestration.
//!
//! One call to `Game::tick` runs a whole frame to completion:
//!
//! 1. rebuild the quadtree from the player and every lit fire slot
//! 2. detect collisions and write the flags back
//! 3. pan the background
//! 4. move and redraw the player unless it is colliding
//! 5. step the player's bullets and redraw the corners over them
//! 6. clear the projectile surface and run the turret cluster

use std::collections::HashSet;

use crate::assets::AssetMetadata;
use crate::cluster::TurretCluster;
use crate::config::ArenaConfig;
use crate::entities::{CollisionKind, Entity, Rect};
use crate::input::InputState;
use crate::player::Player;
use crate::pool::Poolable;
use crate::quadtree::{Bounded, QuadTree};
use crate::scenery::{Background, Corner};
use crate::surface::{DrawSurface, Layers};

/// Stable handle to a collision participant (arena + index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColliderId {
    Player,
    Fire { turret: usize, slot: usize },
}

/// What the quadtree stores: a copy of a participant's box and tags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub id: ColliderId,
    pub kind: CollisionKind,
    pub collides_with: Option<CollisionKind>,
    pub bounds: Rect,
}

impl Bounded for Collider {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Flag every pair where `a` is tagged to collide with `b`'s kind and the
/// boxes overlap. Candidates for each object come from `find_objects`.
pub fn detect_collisions(tree: &QuadTree<Collider>) -> HashSet<ColliderId> {
    let mut colliding = HashSet::new();
    for a in tree.get_all_objects() {
        for b in tree.find_objects(&a.bounds) {
            if a.id == b.id {
                continue;
            }
            if a.collides_with == Some(b.kind) && a.bounds.intersects(&b.bounds) {
                colliding.insert(a.id);
                colliding.insert(b.id);
            }
        }
    }
    colliding
}

/// Advisory summary of one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    /// Participants flagged this tick.
    pub collisions: usize,
    pub player_hit: bool,
}

#[derive(Debug)]
pub struct Game {
    config: ArenaConfig,
    background: Background,
    player: Player,
    cluster: TurretCluster,
    corners: Vec<Corner>,
    quad_tree: QuadTree<Collider>,
    frame: u64,
}

impl Game {
    pub fn new(config: ArenaConfig) -> Self {
        let assets: AssetMetadata = config.assets.clone();
        let surface = Rect::new(0.0, 0.0, config.surface.width, config.surface.height);
        let game = Game {
            background: Background::new(
                config.surface.width,
                config.surface.height,
                config.background_speed,
            ),
            player: Player::new(&config),
            cluster: TurretCluster::new(&config, &assets),
            corners: config.corners.iter().map(|c| Corner::new(c, &assets)).collect(),
            quad_tree: QuadTree::new(surface),
            frame: 0,
            config,
        };
        log::info!(
            "arena ready: {}x{}, {} turrets, fire_delay {}",
            game.config.surface.width,
            game.config.surface.height,
            game.cluster.turrets().len(),
            game.config.fire_delay
        );
        game
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn cluster(&self) -> &TurretCluster {
        &self.cluster
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn quad_tree(&self) -> &QuadTree<Collider> {
        &self.quad_tree
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Draw the corner decorations. They share the ship layer with the player
    /// and its bullets, so `tick` repeats this after their dirty rectangles.
    pub fn draw_static<S: DrawSurface>(&self, layers: &mut Layers<S>) {
        for corner in &self.corners {
            corner.draw(layers.get_mut(corner.layer()));
        }
    }

    fn colliders(&self) -> Vec<Collider> {
        let mut out = Vec::new();
        let body = self.player.body();
        if let Some(kind) = body.kind {
            out.push(Collider {
                id: ColliderId::Player,
                kind,
                collides_with: body.collides_with,
                bounds: body.bounds(),
            });
        }
        for (t, turret) in self.cluster.turrets().iter().enumerate() {
            for (slot, fire) in turret.pool().iter_alive() {
                let body = fire.body();
                if let Some(kind) = body.kind {
                    out.push(Collider {
                        id: ColliderId::Fire { turret: t, slot },
                        kind,
                        collides_with: body.collides_with,
                        bounds: body.bounds(),
                    });
                }
            }
        }
        out
    }

    fn rebuild_quad_tree(&mut self) {
        self.quad_tree.clear();
        for collider in self.colliders() {
            // Bodies are built from finite config values; a rejected one is
            // already logged by the tree and simply sits out this tick.
            let _ = self.quad_tree.insert(collider);
        }
    }

    fn apply_collisions(&mut self, colliding: &HashSet<ColliderId>) {
        self.player.body_mut().is_colliding = colliding.contains(&ColliderId::Player);
        for t in 0..self.cluster.turrets().len() {
            let pool = self.cluster.turret_mut(t).pool_mut();
            for slot in 0..pool.capacity() {
                let fire = pool.slot_mut(slot);
                let hit = fire.is_alive() && colliding.contains(&ColliderId::Fire { turret: t, slot });
                fire.body_mut().is_colliding = hit;
            }
        }
    }

    pub fn tick<S: DrawSurface>(&mut self, input: &InputState, layers: &mut Layers<S>) -> TickReport {
        self.frame += 1;

        self.rebuild_quad_tree();

        let colliding = detect_collisions(&self.quad_tree);
        self.apply_collisions(&colliding);

        self.background.update();
        self.background.draw(layers.get_mut(self.background.layer()));

        if !self.player.is_colliding() {
            self.player.steer(input);
            self.player.tick(layers);
        }

        self.player.animate_bullets(layers);
        self.draw_static(layers);

        layers.main.clear();
        self.cluster.update(input, layers);

        TickReport {
            frame: self.frame,
            collisions: colliding.len(),
            player_hit: self.player.is_colliding(),
        }
    }
}

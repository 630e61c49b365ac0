//! A turret's projectile: a jet of fire that slides out of the turret mouth
//! to a reach set by the turret's intensity level and slides back in when the
//! level drops.
//!
//! Position is tracked on the axis implied by the fire type. The cross axis
//! stays centred on the mouth for the projectile's whole life.

use crate::assets::AssetMetadata;
use crate::entities::{Body, CollisionKind, Entity, FireType, Rect};
use crate::pool::{Poolable, SpawnRequest};
use crate::surface::{DrawSurface, ImageId, Layer};

/// Ticks between sprite frames.
pub const SPRITE_FRAME_TICKS: u32 = 7;
pub const SPRITE_FRAMES: u8 = 4;
pub const MAX_LEVEL: u8 = 2;

#[derive(Clone, Debug)]
pub struct Fire {
    body: Body,
    alive: bool,
    origin: (f32, f32),
    speed: f32,
    level: u8,
    previous_level: u8,
    fire_type: FireType,
    retracting: bool,
    done: bool,
    frame_counter: u32,
    sprite_index: u8,
    /// Sprite frame size, unrotated: cross-axis width by length.
    frame_width: f32,
    length: f32,
}

impl Fire {
    pub fn new(assets: &AssetMetadata) -> Self {
        let frame_width = assets.fire_frame_width();
        let length = assets.fire_sheet.height;
        Fire {
            body: Body::new(0.0, 0.0, frame_width, length, Layer::Main)
                .with_collision(CollisionKind::Fire, CollisionKind::Player),
            alive: false,
            origin: (0.0, 0.0),
            speed: 0.0,
            level: 0,
            previous_level: 0,
            fire_type: FireType::Down,
            retracting: false,
            done: false,
            frame_counter: 0,
            sprite_index: 0,
            frame_width,
            length,
        }
    }

    pub fn fire_type(&self) -> FireType {
        self.fire_type
    }

    pub fn previous_level(&self) -> u8 {
        self.previous_level
    }

    pub fn is_retracting(&self) -> bool {
        self.retracting
    }

    pub fn sprite_index(&self) -> u8 {
        self.sprite_index
    }

    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// How far the jet may extend past the mouth at `level`.
    pub fn reach(&self, level: u8) -> f32 {
        self.length * f32::from(level.min(MAX_LEVEL)) / f32::from(MAX_LEVEL)
    }

    /// Coordinate (x for horizontal types, y otherwise) where the jet is
    /// fully hidden behind the mouth.
    fn rest_position(&self) -> f32 {
        let (ox, oy) = self.origin;
        match self.fire_type {
            FireType::Down => oy - self.length,
            FireType::Up => oy,
            FireType::Left => ox,
            FireType::Right => ox - self.length,
        }
    }

    /// Coordinate at which the jet is extended to `reach(level)`.
    fn cap_position(&self, level: u8) -> f32 {
        let reach = self.reach(level);
        let rest = self.rest_position();
        match self.fire_type {
            FireType::Down | FireType::Right => rest + reach,
            FireType::Up | FireType::Left => rest - reach,
        }
    }

    /// +1 when extending moves the tracked coordinate up, -1 otherwise.
    fn extend_sign(&self) -> f32 {
        match self.fire_type {
            FireType::Down | FireType::Right => 1.0,
            FireType::Up | FireType::Left => -1.0,
        }
    }

    fn position(&self) -> f32 {
        if self.fire_type.is_horizontal() {
            self.body.x
        } else {
            self.body.y
        }
    }

    fn set_position(&mut self, value: f32) {
        if self.fire_type.is_horizontal() {
            self.body.x = value;
        } else {
            self.body.y = value;
        }
    }

    fn extend(&mut self) {
        let sign = self.extend_sign();
        let cap = self.cap_position(self.level);
        let next = self.position() + sign * self.speed;
        // Never past the reach for the current level.
        let next = if sign > 0.0 { next.min(cap) } else { next.max(cap) };
        // A jet already beyond a lowered cap waits for the retract rule.
        if (next - self.position()) * sign >= 0.0 {
            self.set_position(next);
        }
    }

    fn retract(&mut self) {
        let sign = self.extend_sign();
        let position = self.position();

        // Still lit: fall back only as far as the current level's reach.
        if self.level > 0 {
            let cap = self.cap_position(self.level);
            if (position - cap) * sign <= 0.0 {
                self.retracting = false;
                self.extend();
                return;
            }
            let next = position - sign * self.speed;
            if (next - cap) * sign <= 0.0 {
                self.set_position(cap);
                self.retracting = false;
            } else {
                self.set_position(next);
            }
            return;
        }

        let rest = self.rest_position();
        let next = position - sign * self.speed;
        if (next - rest) * sign <= 0.0 {
            self.set_position(rest);
            self.done = true;
        } else {
            self.set_position(next);
        }
    }

    fn follow_level_edges(&mut self) {
        if self.previous_level > self.level {
            self.retracting = true;
        } else if self.level > self.previous_level {
            self.retracting = false;
        }
        self.previous_level = self.level;
    }

    fn source_rect(&self) -> Rect {
        Rect::new(
            f32::from(self.sprite_index) * self.frame_width,
            0.0,
            self.frame_width,
            self.length,
        )
    }
}

impl Entity for Fire {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        if !self.alive {
            return;
        }
        self.follow_level_edges();
        if self.level == 0 {
            self.retracting = true;
        }

        if self.retracting {
            self.retract();
        } else {
            self.extend();
        }

        self.frame_counter += 1;
        if self.frame_counter % SPRITE_FRAME_TICKS == 0 {
            self.sprite_index = (self.sprite_index + 1) % SPRITE_FRAMES;
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        if !self.alive {
            return;
        }
        let b = &self.body;
        surface.save();
        surface.translate(b.x + b.width / 2.0, b.y + b.height / 2.0);
        surface.rotate(self.fire_type.sprite_angle().to_radians());
        surface.draw_image(
            ImageId::Fire,
            self.source_rect(),
            Rect::new(
                -self.frame_width / 2.0,
                -self.length / 2.0,
                self.frame_width,
                self.length,
            ),
        );
        surface.restore();
    }
}

impl Poolable for Fire {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn spawn(&mut self, request: &SpawnRequest) {
        self.alive = true;
        self.done = false;
        self.origin = (request.x, request.y);
        self.speed = request.speed;
        self.fire_type = request.fire_type;
        self.level = request.level.min(MAX_LEVEL);
        self.previous_level = self.level;
        self.retracting = false;
        self.frame_counter = 0;
        self.sprite_index = 0;
        self.body.is_colliding = false;
        self.body.angle = self.fire_type.sprite_angle();

        let (ox, oy) = self.origin;
        if self.fire_type.is_horizontal() {
            self.body.width = self.length;
            self.body.height = self.frame_width;
            self.body.y = oy - self.frame_width / 2.0;
        } else {
            self.body.width = self.frame_width;
            self.body.height = self.length;
            self.body.x = ox - self.frame_width / 2.0;
        }
        let rest = self.rest_position();
        self.set_position(rest);
    }

    fn retarget(&mut self, level: u8) {
        self.previous_level = self.level;
        self.level = level.min(MAX_LEVEL);
    }

    fn extinguish(&mut self) {
        if self.level != 0 {
            self.retarget(0);
        }
    }

    fn finished(&self) -> bool {
        self.done
    }

    fn clear(&mut self) {
        self.alive = false;
        self.done = false;
        self.level = 0;
        self.previous_level = 0;
        self.retracting = false;
        self.speed = 0.0;
        self.body.x = 0.0;
        self.body.y = 0.0;
        self.body.is_colliding = false;
    }

    fn level(&self) -> u8 {
        self.level
    }
}

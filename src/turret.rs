//! Turret ("forn") state machine.
//!
//! A turret climbs through nine (level, phase) states while its button is
//! held and falls back through them once released. Level drives both the
//! sprite and whether the turret's single fire slot is lit.
//!
//! Timing: one phase step every `fire_delay / 3` ticks, so a held turret
//! gains a level every `fire_delay` ticks and a released one loses a level
//! in the same time.

use crate::assets::AssetMetadata;
use crate::config::TurretPlacement;
use crate::entities::{Body, Entity, FireType, Rect};
use crate::fire::{Fire, MAX_LEVEL};
use crate::pool::{Pool, SpawnRequest};
use crate::surface::{DrawSurface, ImageId, Layer, Layers};

pub const PHASES: u8 = 3;

#[derive(Debug)]
pub struct Turret {
    body: Body,
    fire_type: FireType,
    in_use: bool,
    was_in_use: bool,
    level: u8,
    phase: u8,
    counter: u32,
    state_rate: u32,
    fire_speed: f32,
    frame_width: f32,
    pool: Pool<Fire>,
}

impl Turret {
    pub fn new(
        placement: &TurretPlacement,
        assets: &AssetMetadata,
        fire_delay: u32,
        fire_speed: f32,
    ) -> Self {
        let frame_width = assets.turret_frame_width();
        Turret {
            body: Body::new(
                placement.x,
                placement.y,
                frame_width,
                assets.turret_sheet.height,
                Layer::Ship,
            )
            .with_angle(placement.angle),
            fire_type: placement.fire_type,
            in_use: false,
            was_in_use: false,
            level: 0,
            phase: 0,
            counter: 0,
            state_rate: (fire_delay / 3).max(1),
            fire_speed,
            frame_width,
            pool: Pool::new(1, || Fire::new(assets)),
        }
    }

    pub fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }

    pub fn in_use(&self) -> bool {
        self.in_use
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn fire_type(&self) -> FireType {
        self.fire_type
    }

    /// (level, phase) == (0, 0) with nobody holding the button.
    pub fn is_idle(&self) -> bool {
        !self.in_use && self.level == 0 && self.phase == 0
    }

    pub fn pool(&self) -> &Pool<Fire> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool<Fire> {
        &mut self.pool
    }

    /// Point on the turret's arena-facing edge where its fire emerges.
    pub fn mouth(&self) -> (f32, f32) {
        let b = &self.body;
        let cx = b.x + self.frame_width / 2.0;
        let cy = b.y + b.height / 2.0;
        match self.fire_type {
            FireType::Down => (cx, b.y + b.height),
            FireType::Up => (cx, b.y),
            FireType::Left => (cx - b.height / 2.0, cy),
            FireType::Right => (cx + b.height / 2.0, cy),
        }
    }

    /// Source rectangle on the turret sheet for the current state.
    pub fn sprite_source(&self) -> Rect {
        let frame = u32::from(self.level) * u32::from(PHASES) + u32::from(self.phase);
        Rect::new(frame as f32 * self.frame_width, 0.0, self.frame_width, self.body.height)
    }

    fn escalate(&mut self) {
        if self.was_in_use != self.in_use {
            self.counter = 0;
        }
        self.counter += 1;
        if self.counter == self.state_rate {
            if self.phase + 1 == PHASES {
                self.phase = 0;
                if self.level < MAX_LEVEL {
                    self.level += 1;
                    log::debug!("turret {:?} escalated to level {}", self.fire_type, self.level);
                }
            } else {
                self.phase += 1;
            }
            self.counter = 0;
        }
    }

    fn decay(&mut self) {
        if self.level == 0 && self.phase == 0 {
            self.counter = 0;
            return;
        }
        if self.was_in_use != self.in_use || self.counter == 0 {
            self.counter = self.state_rate;
        }
        self.counter -= 1;
        if self.counter == 0 {
            if self.phase == 0 {
                self.level -= 1;
                self.phase = PHASES - 1;
                log::debug!("turret {:?} decayed to level {}", self.fire_type, self.level);
            } else {
                self.phase -= 1;
            }
            self.counter = self.state_rate;
        }
    }

    /// Request or cancel fire according to the current level.
    fn trigger(&mut self) {
        if self.level >= 1 {
            let (x, y) = self.mouth();
            self.pool.acquire(SpawnRequest {
                x,
                y,
                speed: self.fire_speed,
                level: self.level,
                fire_type: self.fire_type,
            });
        } else {
            self.pool.cancel();
        }
    }

    /// Advance, draw on the turret's layer and step the fire slot.
    pub fn tick<S: DrawSurface>(&mut self, layers: &mut Layers<S>) {
        self.update();
        self.draw(layers.get_mut(self.body.layer));
    }

    pub fn animate_fire<S: DrawSurface>(&mut self, layers: &mut Layers<S>) {
        self.pool.animate_all(layers);
    }
}

impl Entity for Turret {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        if self.in_use {
            self.escalate();
        } else {
            self.decay();
        }
        self.was_in_use = self.in_use;
        self.trigger();
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let b = &self.body;
        surface.save();
        surface.translate(b.x + self.frame_width / 2.0, b.y + b.height / 2.0);
        surface.rotate(b.angle.to_radians());
        surface.draw_image(
            ImageId::Turret,
            self.sprite_source(),
            Rect::new(-self.frame_width / 2.0, -b.height / 2.0, self.frame_width, b.height),
        );
        surface.restore();
    }
}

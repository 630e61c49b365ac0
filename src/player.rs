//! The player's sprite ("sardina").

use crate::bullet::Bullet;
use crate::config::ArenaConfig;
use crate::entities::{Body, CollisionKind, Entity, Rect};
use crate::input::InputState;
use crate::pool::{Pool, SpawnRequest};
use crate::surface::{DrawSurface, ImageId, Layer, Layers};

/// Horizontal offsets of the twin shot relative to the player's x.
const GUN_OFFSETS: (f32, f32) = (6.0, 33.0);

#[derive(Debug)]
pub struct Player {
    body: Body,
    speed: f32,
    margin: f32,
    surface_width: f32,
    surface_height: f32,
    target: (f32, f32),
    fire_cooldown: u32,
    fire_cooldown_ticks: u32,
    bullet_speed: f32,
    wants_fire: bool,
    /// Position the sprite occupied when last drawn.
    last_drawn: Option<Rect>,
    bullets: Pool<Bullet>,
}

impl Player {
    /// Start centred on the surface.
    pub fn new(config: &ArenaConfig) -> Self {
        let assets = &config.assets;
        let (w, h) = (assets.player.width, assets.player.height);
        let x = config.surface.width / 2.0 - w / 2.0;
        let y = config.surface.height / 2.0 - h / 2.0;
        let mut player = Player {
            body: Body::new(x, y, w, h, Layer::Ship)
                .with_collision(CollisionKind::Player, CollisionKind::Fire),
            speed: config.player_speed,
            margin: config.player_margin,
            surface_width: config.surface.width,
            surface_height: config.surface.height,
            target: (x, y),
            fire_cooldown: 0,
            fire_cooldown_ticks: config.player_fire_cooldown,
            bullet_speed: config.bullet_speed,
            wants_fire: false,
            last_drawn: None,
            bullets: Pool::new(config.player_pool_size, || Bullet::new(assets)),
        };
        player.target = player.clamp(x, y);
        player
    }

    pub fn bullets(&self) -> &Pool<Bullet> {
        &self.bullets
    }

    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    pub fn is_colliding(&self) -> bool {
        self.body.is_colliding
    }

    fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        let max_x = (self.surface_width - self.margin - self.body.width).max(self.margin);
        let max_y = (self.surface_height - self.margin - self.body.height).max(self.margin);
        (x.clamp(self.margin, max_x), y.clamp(self.margin, max_y))
    }

    /// Read pointer and fire button for the coming update. The pointer marks
    /// where the sprite's centre should go.
    pub fn steer(&mut self, input: &InputState) {
        if let Some((px, py)) = input.pointer {
            let x = px - self.body.width / 2.0;
            let y = py - self.body.height / 2.0;
            self.target = self.clamp(x, y);
        }
        self.wants_fire = input.fire;
    }

    fn fire(&mut self) {
        let b = &self.body;
        self.bullets.acquire_pair(
            SpawnRequest::simple(b.x + GUN_OFFSETS.0, b.y, self.bullet_speed),
            SpawnRequest::simple(b.x + GUN_OFFSETS.1, b.y, self.bullet_speed),
        );
    }

    /// Move, fire if asked and redraw, erasing the previous position first.
    pub fn tick<S: DrawSurface>(&mut self, layers: &mut Layers<S>) {
        self.update();
        let surface = layers.get_mut(self.body.layer);
        if let Some(previous) = self.last_drawn {
            surface.clear_rect(previous);
        }
        self.draw(surface);
        self.last_drawn = Some(self.body.bounds());
    }

    pub fn animate_bullets<S: DrawSurface>(&mut self, layers: &mut Layers<S>) {
        self.bullets.animate_all(layers);
    }
}

fn approach(from: f32, to: f32, step: f32) -> f32 {
    if (to - from).abs() <= step {
        to
    } else if to > from {
        from + step
    } else {
        from - step
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        let (tx, ty) = self.target;
        let x = approach(self.body.x, tx, self.speed);
        let y = approach(self.body.y, ty, self.speed);
        (self.body.x, self.body.y) = self.clamp(x, y);

        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        if self.wants_fire && self.fire_cooldown == 0 {
            self.fire();
            self.fire_cooldown = self.fire_cooldown_ticks;
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let b = &self.body;
        surface.draw_image(
            ImageId::Player,
            Rect::new(0.0, 0.0, b.width, b.height),
            b.bounds(),
        );
    }
}

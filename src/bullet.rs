use crate::assets::AssetMetadata;
use crate::entities::{Body, Entity, Rect};
use crate::pool::{Poolable, SpawnRequest};
use crate::surface::{DrawSurface, ImageId, Layer};

/// The player's shot. Travels straight up and is released once it has
/// left the top of the surface.
#[derive(Clone, Debug)]
pub struct Bullet {
    body: Body,
    alive: bool,
    speed: f32,
}

impl Bullet {
    pub fn new(assets: &AssetMetadata) -> Self {
        Bullet {
            body: Body::new(0.0, 0.0, assets.bullet.width, assets.bullet.height, Layer::Ship),
            alive: false,
            speed: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl Entity for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        if self.alive {
            self.body.y -= self.speed;
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let b = &self.body;
        // Dirty rectangle: last tick's position sits one step below.
        surface.clear_rect(Rect::new(b.x, b.y + self.speed, b.width, b.height));
        surface.draw_image(
            ImageId::Bullet,
            Rect::new(0.0, 0.0, b.width, b.height),
            b.bounds(),
        );
    }
}

impl Poolable for Bullet {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn spawn(&mut self, request: &SpawnRequest) {
        self.body.x = request.x;
        self.body.y = request.y;
        self.speed = request.speed;
        self.alive = true;
    }

    fn finished(&self) -> bool {
        self.body.bounds().bottom() <= 0.0
    }

    fn clear(&mut self) {
        self.body.x = 0.0;
        self.body.y = 0.0;
        self.speed = 0.0;
        self.alive = false;
    }
}

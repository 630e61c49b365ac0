//! Non-interactive drawables: the panning background and the corner pieces.

use crate::assets::AssetMetadata;
use crate::config::{CornerPlacement, SpriteOffset};
use crate::entities::{Body, Entity, Rect};
use crate::surface::{DrawSurface, ImageId, Layer};

/// Scrolls downward forever by drawing the image twice, stacked, and
/// wrapping once the first copy has moved a full surface height.
#[derive(Debug, Clone)]
pub struct Background {
    body: Body,
    speed: f32,
}

impl Background {
    pub fn new(width: f32, height: f32, speed: f32) -> Self {
        Background {
            body: Body::new(0.0, 0.0, width, height, Layer::Background),
            speed,
        }
    }

    pub fn offset(&self) -> f32 {
        self.body.y
    }
}

impl Entity for Background {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        self.body.y += self.speed;
        if self.body.y >= self.body.height {
            self.body.y = 0.0;
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let b = &self.body;
        let src = Rect::new(0.0, 0.0, b.width, b.height);
        surface.draw_image(ImageId::Background, src, Rect::new(b.x, b.y, b.width, b.height));
        surface.draw_image(
            ImageId::Background,
            src,
            Rect::new(b.x, b.y - b.height, b.width, b.height),
        );
    }
}

/// Static decoration, rotated about its centre.
#[derive(Debug, Clone)]
pub struct Corner {
    body: Body,
    sprite: SpriteOffset,
}

impl Corner {
    pub fn new(placement: &CornerPlacement, assets: &AssetMetadata) -> Self {
        Corner {
            body: Body::new(
                placement.x,
                placement.y,
                assets.corner.width,
                assets.corner.height,
                Layer::Ship,
            )
            .with_angle(placement.angle),
            sprite: placement.sprite.unwrap_or(SpriteOffset { sx: 0.0, sy: 0.0 }),
        }
    }
}

impl Entity for Corner {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {}

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let b = &self.body;
        surface.save();
        surface.translate(b.x + b.width / 2.0, b.y + b.height / 2.0);
        surface.rotate(b.angle.to_radians());
        surface.draw_image(
            ImageId::Corner,
            Rect::new(self.sprite.sx, self.sprite.sy, b.width, b.height),
            Rect::new(-b.width / 2.0, -b.height / 2.0, b.width, b.height),
        );
        surface.restore();
    }
}

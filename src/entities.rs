//! Shared entity types: bounding boxes, the common body every drawable
//! carries, collision tags and the fire direction enumeration.

use serde::{Deserialize, Serialize};

use crate::surface::{DrawSurface, Layer};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in surface pixels (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: rectangles that merely touch do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Finite coordinates and non-negative extent.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

// ── Collision tags ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    Player,
    Fire,
}

// ── Fire direction ────────────────────────────────────────────────────────────

/// Travel axis of a turret's projectile. The discriminants match the numeric
/// fire types used by the placement tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FireType {
    /// Extends downward from a turret on the top edge.
    Down = 0,
    /// Extends upward from a turret on the bottom edge.
    Up = 1,
    /// Extends leftward from a turret on the right edge.
    Left = 2,
    /// Extends rightward from a turret on the left edge.
    Right = 3,
}

impl FireType {
    /// Rotation applied to the projectile sprite, in degrees.
    pub fn sprite_angle(self) -> f32 {
        match self {
            FireType::Down => 180.0,
            FireType::Up => 0.0,
            FireType::Left => 270.0,
            FireType::Right => 90.0,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, FireType::Left | FireType::Right)
    }
}

impl TryFrom<u8> for FireType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FireType::Down),
            1 => Ok(FireType::Up),
            2 => Ok(FireType::Left),
            3 => Ok(FireType::Right),
            other => Err(format!("unknown fire type {other} (expected 0..=3)")),
        }
    }
}

impl From<FireType> for u8 {
    fn from(value: FireType) -> Self {
        value as u8
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Spatial and orientation attributes common to every entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise.
    pub angle: f32,
    /// Surface this entity draws on; assigned once at setup.
    pub layer: Layer,
    pub kind: Option<CollisionKind>,
    pub collides_with: Option<CollisionKind>,
    pub is_colliding: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32, layer: Layer) -> Self {
        Body {
            x,
            y,
            width,
            height,
            angle: 0.0,
            layer,
            kind: None,
            collides_with: None,
            is_colliding: false,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_collision(mut self, kind: CollisionKind, collides_with: CollisionKind) -> Self {
        self.kind = Some(kind);
        self.collides_with = Some(collides_with);
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Entity contract ───────────────────────────────────────────────────────────

/// Draw/update contract shared by the background, player, turrets and
/// projectiles.
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Advance one tick.
    fn update(&mut self);

    /// Issue this tick's draw calls.
    fn draw(&self, surface: &mut dyn DrawSurface);

    fn layer(&self) -> Layer {
        self.body().layer
    }
}

//! Abstract 2D drawing surface.
//!
//! The core never touches a real canvas; it issues save/restore scoped
//! transforms, image blits and rectangle clears against `DrawSurface`.
//! `RecordingSurface` keeps every call so tests and headless runs can inspect
//! what a tick drew.

use crate::entities::Rect;

/// Which sprite sheet an image blit reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageId {
    Background,
    Player,
    Bullet,
    Fire,
    Turret,
    Corner,
}

/// The three stacked surfaces, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Ship,
    Main,
}

pub trait DrawSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Clockwise rotation in radians.
    fn rotate(&mut self, radians: f32);

    /// Copy `src` (sheet pixels) of `image` onto `dst` (surface pixels under
    /// the current transform).
    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect);
    fn clear_rect(&mut self, rect: Rect);

    fn clear(&mut self) {
        let full = Rect::new(0.0, 0.0, self.width(), self.height());
        self.clear_rect(full);
    }
}

/// One surface per layer.
#[derive(Debug)]
pub struct Layers<S> {
    pub background: S,
    pub ship: S,
    pub main: S,
}

impl<S: DrawSurface> Layers<S> {
    pub fn new(background: S, ship: S, main: S) -> Self {
        Layers { background, ship, main }
    }

    pub fn get_mut(&mut self, layer: Layer) -> &mut S {
        match layer {
            Layer::Background => &mut self.background,
            Layer::Ship => &mut self.ship,
            Layer::Main => &mut self.main,
        }
    }
}

// ── Recording surface ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Image { image: ImageId, src: Rect, dst: Rect },
    ClearRect(Rect),
}

#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        RecordingSurface { width, height, calls: Vec::new() }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Count of image blits from a given sheet.
    pub fn images_of(&self, image: ImageId) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Image { image: i, .. } if *i == image))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.calls.push(DrawCall::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f32) {
        self.calls.push(DrawCall::Rotate(radians));
    }

    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect) {
        self.calls.push(DrawCall::Image { image, src, dst });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.calls.push(DrawCall::ClearRect(rect));
    }
}

impl Layers<RecordingSurface> {
    /// Three empty recording surfaces of the same size.
    pub fn recording(width: f32, height: f32) -> Self {
        Layers::new(
            RecordingSurface::new(width, height),
            RecordingSurface::new(width, height),
            RecordingSurface::new(width, height),
        )
    }

    pub fn reset(&mut self) {
        self.background.take_calls();
        self.ship.take_calls();
        self.main.take_calls();
    }
}

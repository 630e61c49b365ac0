//! Rendering layer: all terminal I/O lives here.
//!
//! `TerminalSurface` implements the core's drawing capability by rasterising
//! every blit into a character grid scaled down from surface pixels.
//! `render` composites the three layers back to front and writes the frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use turret_arena::assets::AssetMetadata;
use turret_arena::cluster::Overlay;
use turret_arena::entities::Rect;
use turret_arena::game::{Game, TickReport};
use turret_arena::surface::{DrawSurface, ImageId, Layers};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_BULLET: Color = Color::Cyan;
const C_CORNER: Color = Color::DarkGrey;
const C_TURRET: [Color; 3] = [Color::Grey, Color::Yellow, Color::Red];
const C_FIRE: [Color; 2] = [Color::Red, Color::Yellow];
const C_HUD: Color = Color::Yellow;
const C_HIT: Color = Color::Red;
const C_LABEL: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// Rows used above (HUD) and below (hint) the arena.
const HUD_ROWS: u16 = 1;
const HINT_ROWS: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

/// 2x3 affine transform, canvas style: (a c e / b d f).
#[derive(Clone, Copy, Debug)]
struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }
}

// ── Terminal surface ──────────────────────────────────────────────────────────

pub struct TerminalSurface {
    width: f32,
    height: f32,
    cols: u16,
    rows: u16,
    cells: Vec<Option<Cell>>,
    transform: Transform,
    stack: Vec<Transform>,
    turret_frame: f32,
    fire_frame: f32,
}

impl TerminalSurface {
    pub fn new(width: f32, height: f32, cols: u16, rows: u16, assets: &AssetMetadata) -> Self {
        TerminalSurface {
            width,
            height,
            cols,
            rows,
            cells: vec![None; cols as usize * rows as usize],
            transform: Transform::IDENTITY,
            stack: Vec::new(),
            turret_frame: assets.turret_frame_width(),
            fire_frame: assets.fire_frame_width(),
        }
    }

    fn scale(&self) -> (f32, f32) {
        (self.cols as f32 / self.width, self.rows as f32 / self.height)
    }

    /// Pixel position of the centre of a grid cell.
    pub fn cell_to_pixel(&self, col: u16, row: u16) -> (f32, f32) {
        let (sx, sy) = self.scale();
        ((col as f32 + 0.5) / sx, (row as f32 + 0.5) / sy)
    }

    fn cell(&self, col: u16, row: u16) -> Option<Cell> {
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Grid cells covered by `rect` under the current transform.
    fn covered_cells(&self, rect: Rect) -> Vec<(u16, u16)> {
        let corners = [
            self.transform.apply(rect.x, rect.y),
            self.transform.apply(rect.right(), rect.y),
            self.transform.apply(rect.x, rect.bottom()),
            self.transform.apply(rect.right(), rect.bottom()),
        ];
        let min_x = corners.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);

        let mut out = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (px, py) = self.cell_to_pixel(col, row);
                if px >= min_x && px < max_x && py >= min_y && py < max_y {
                    out.push((col, row));
                }
            }
        }
        out
    }

    /// Glyph for one covered cell; `top` is the blit's top edge in pixels.
    fn paint(&self, image: ImageId, src: Rect, top: f32, col: u16, row: u16) -> Option<Cell> {
        match image {
            ImageId::Background => {
                // Sparse star field that scrolls with the panned copies.
                let (_, py) = self.cell_to_pixel(col, row);
                let band = ((py - top) / 23.0) as i32;
                if (band + col as i32) % 7 == 0 {
                    Some(Cell { glyph: '.', color: C_BACKGROUND })
                } else {
                    None
                }
            }
            ImageId::Player => Some(Cell { glyph: '▲', color: C_PLAYER }),
            ImageId::Bullet => Some(Cell { glyph: '|', color: C_BULLET }),
            ImageId::Corner => Some(Cell { glyph: '▒', color: C_CORNER }),
            ImageId::Turret => {
                let frame = (src.x / self.turret_frame) as usize;
                let level = (frame / 3).min(2);
                let glyph = ['░', '▒', '▓', '█'][frame % 3 + usize::from(level == 2)];
                Some(Cell { glyph, color: C_TURRET[level] })
            }
            ImageId::Fire => {
                let frame = (src.x / self.fire_frame) as usize;
                Some(Cell { glyph: '▓', color: C_FIRE[frame % 2] })
            }
        }
    }
}

impl DrawSurface for TerminalSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let t = &mut self.transform;
        t.e += t.a * dx + t.c * dy;
        t.f += t.b * dx + t.d * dy;
    }

    fn rotate(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        let t = self.transform;
        self.transform = Transform {
            a: t.a * cos + t.c * sin,
            b: t.b * cos + t.d * sin,
            c: t.c * cos - t.a * sin,
            d: t.d * cos - t.b * sin,
            e: t.e,
            f: t.f,
        };
    }

    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect) {
        let (_, top) = self.transform.apply(dst.x, dst.y);
        for (col, row) in self.covered_cells(dst) {
            let cell = self.paint(image, src, top, col, row);
            self.cells[row as usize * self.cols as usize + col as usize] = cell;
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        for (col, row) in self.covered_cells(rect) {
            self.cells[row as usize * self.cols as usize + col as usize] = None;
        }
    }
}

/// Three terminal surfaces sized for the arena part of the screen.
pub fn terminal_layers(game: &Game, cols: u16, rows: u16) -> Layers<TerminalSurface> {
    let config = game.config();
    let arena_rows = rows.saturating_sub(HUD_ROWS + HINT_ROWS).max(1);
    let make = || {
        TerminalSurface::new(
            config.surface.width,
            config.surface.height,
            cols.max(1),
            arena_rows,
            &config.assets,
        )
    };
    Layers::new(make(), make(), make())
}

/// Convert a terminal cell (screen coordinates) to surface pixels.
pub fn screen_to_surface(layers: &Layers<TerminalSurface>, col: u16, row: u16) -> (f32, f32) {
    let arena_row = row.saturating_sub(HUD_ROWS);
    layers.main.cell_to_pixel(col, arena_row)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game,
    layers: &Layers<TerminalSurface>,
    report: &TickReport,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_arena(out, layers)?;
    draw_overlays(out, layers, &game.cluster().overlays())?;
    draw_hud(out, game, report)?;
    draw_controls_hint(out, layers.main.rows + HUD_ROWS)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}

// ── Arena ─────────────────────────────────────────────────────────────────────

fn draw_arena<W: Write>(out: &mut W, layers: &Layers<TerminalSurface>) -> std::io::Result<()> {
    let (cols, rows) = (layers.main.cols, layers.main.rows);
    for row in 0..rows {
        out.queue(cursor::MoveTo(0, row + HUD_ROWS))?;
        let mut current: Option<Color> = None;
        for col in 0..cols {
            let cell = layers
                .main
                .cell(col, row)
                .or_else(|| layers.ship.cell(col, row))
                .or_else(|| layers.background.cell(col, row));
            match cell {
                Some(Cell { glyph, color }) => {
                    if current != Some(color) {
                        out.queue(style::SetForegroundColor(color))?;
                        current = Some(color);
                    }
                    out.queue(Print(glyph))?;
                }
                None => {
                    out.queue(Print(' '))?;
                }
            }
        }
    }
    Ok(())
}

fn draw_overlays<W: Write>(
    out: &mut W,
    layers: &Layers<TerminalSurface>,
    overlays: &[Overlay],
) -> std::io::Result<()> {
    let (sx, sy) = layers.main.scale();
    out.queue(style::SetForegroundColor(C_LABEL))?;
    for overlay in overlays.iter().filter(|o| !o.hidden) {
        let col = (overlay.x * sx) as u16;
        let row = (overlay.y * sy) as u16 + HUD_ROWS;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(overlay.letter))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &Game, report: &TickReport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    let levels: String = game
        .cluster()
        .turrets()
        .iter()
        .map(|t| char::from(b'0' + t.level()))
        .collect();
    out.queue(Print(format!("Frame:{:>7}  Turrets:{}", report.frame, levels)))?;

    if report.player_hit {
        out.queue(style::SetForegroundColor(C_HIT))?;
        out.queue(Print("  ** HIT **"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, row: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Mouse/arrows: move  SPACE: shoot  ASD/JKL: turrets  W/I: swap rows  Q: quit",
    ))?;
    Ok(())
}

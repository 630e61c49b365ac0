//! Intrinsic sprite-sheet sizes. Images themselves are loaded by whatever
//! front end owns the real drawing surface; the core only needs their
//! dimensions to place sprites and compute reach limits.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetMetadata {
    /// Nine frames laid out horizontally: 3 levels x 3 phases.
    pub turret_sheet: SheetSize,
    /// Four animation frames laid out horizontally.
    pub fire_sheet: SheetSize,
    pub player: SheetSize,
    pub bullet: SheetSize,
    pub corner: SheetSize,
}

impl AssetMetadata {
    pub const TURRET_FRAMES: usize = 9;
    pub const FIRE_FRAMES: usize = 4;

    pub fn turret_frame_width(&self) -> f32 {
        self.turret_sheet.width / Self::TURRET_FRAMES as f32
    }

    pub fn fire_frame_width(&self) -> f32 {
        self.fire_sheet.width / Self::FIRE_FRAMES as f32
    }
}

impl Default for AssetMetadata {
    fn default() -> Self {
        AssetMetadata {
            turret_sheet: SheetSize { width: 900.0, height: 60.0 },
            fire_sheet: SheetSize { width: 400.0, height: 245.0 },
            player: SheetSize { width: 40.0, height: 60.0 },
            bullet: SheetSize { width: 6.0, height: 14.0 },
            corner: SheetSize { width: 100.0, height: 100.0 },
        }
    }
}

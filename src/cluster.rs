//! The twelve turrets and the input mapping that drives them.
//!
//! Only six buttons exist. The top three drive the top-edge row or, with the
//! top toggle set, the left-edge row; the bottom three drive the bottom-edge
//! row or the right-edge row. Rows not selected this tick are forced idle.

use crate::assets::AssetMetadata;
use crate::config::{ArenaConfig, OverlayLabel, ROW_LEN, TURRET_COUNT};
use crate::input::InputState;
use crate::surface::{DrawSurface, Layers};
use crate::turret::Turret;

pub const ROW_TOP: usize = 0;
pub const ROW_LEFT: usize = 1;
pub const ROW_RIGHT: usize = 2;
pub const ROW_BOTTOM: usize = 3;

/// A two-way row selector flipped by a debounced button.
#[derive(Debug, Clone, PartialEq)]
pub struct RowToggle {
    pub engaged: bool,
    cooldown: u32,
    cooldown_ticks: u32,
}

impl RowToggle {
    pub fn new(cooldown_ticks: u32) -> Self {
        RowToggle { engaged: false, cooldown: 0, cooldown_ticks }
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Count down, then flip if `pressed` and the cooldown has run out.
    /// Returns true when a flip happened.
    pub fn step(&mut self, pressed: bool) -> bool {
        self.cooldown = self.cooldown.saturating_sub(1);
        if pressed && self.cooldown == 0 {
            self.engaged = !self.engaged;
            self.cooldown = self.cooldown_ticks;
            return true;
        }
        false
    }
}

/// Label for one turret, hidden when its row is not receiving input.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub x: f32,
    pub y: f32,
    pub letter: char,
    pub hidden: bool,
}

#[derive(Debug)]
pub struct TurretCluster {
    turrets: Vec<Turret>,
    pub top_toggle: RowToggle,
    pub bottom_toggle: RowToggle,
    labels: Vec<OverlayLabel>,
}

impl TurretCluster {
    pub fn new(config: &ArenaConfig, assets: &AssetMetadata) -> Self {
        let turrets = config
            .turrets
            .iter()
            .map(|p| Turret::new(p, assets, config.fire_delay, config.fire_speed))
            .collect();
        let labels = if config.overlays.len() == TURRET_COUNT {
            config.overlays.clone()
        } else {
            Vec::new()
        };
        TurretCluster {
            turrets,
            top_toggle: RowToggle::new(config.toggle_cooldown),
            bottom_toggle: RowToggle::new(config.toggle_cooldown),
            labels,
        }
    }

    pub fn turrets(&self) -> &[Turret] {
        &self.turrets
    }

    pub fn turret(&self, index: usize) -> &Turret {
        &self.turrets[index]
    }

    pub fn turret_mut(&mut self, index: usize) -> &mut Turret {
        &mut self.turrets[index]
    }

    pub fn row(&self, row: usize) -> &[Turret] {
        &self.turrets[row * ROW_LEN..(row + 1) * ROW_LEN]
    }

    /// Rows currently wired to the (top, bottom) buttons.
    pub fn selected_rows(&self) -> (usize, usize) {
        let top = if self.top_toggle.engaged { ROW_LEFT } else { ROW_TOP };
        let bottom = if self.bottom_toggle.engaged { ROW_RIGHT } else { ROW_BOTTOM };
        (top, bottom)
    }

    /// Apply toggles and button state to every turret's in-use flag.
    pub fn map_input(&mut self, input: &InputState) {
        if self.top_toggle.step(input.top_toggle) {
            log::debug!("top row toggle -> {}", self.top_toggle.engaged);
        }
        if self.bottom_toggle.step(input.bottom_toggle) {
            log::debug!("bottom row toggle -> {}", self.bottom_toggle.engaged);
        }

        let (top, bottom) = self.selected_rows();
        for turret in &mut self.turrets {
            turret.set_in_use(false);
        }
        for (i, pressed) in input.top_buttons.iter().enumerate() {
            self.turrets[top * ROW_LEN + i].set_in_use(*pressed);
        }
        for (i, pressed) in input.bottom_buttons.iter().enumerate() {
            self.turrets[bottom * ROW_LEN + i].set_in_use(*pressed);
        }
    }

    /// One tick: map input, advance and draw every turret, then step every
    /// turret's fire.
    pub fn update<S: DrawSurface>(&mut self, input: &InputState, layers: &mut Layers<S>) {
        self.map_input(input);
        for turret in &mut self.turrets {
            turret.tick(layers);
        }
        for turret in &mut self.turrets {
            turret.animate_fire(layers);
        }
    }

    pub fn overlays(&self) -> Vec<Overlay> {
        let (top, bottom) = self.selected_rows();
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let row = i / ROW_LEN;
                Overlay {
                    x: label.x,
                    y: label.y,
                    letter: label.letter,
                    hidden: row != top && row != bottom,
                }
            })
            .collect()
    }
}

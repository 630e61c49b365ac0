//! Random turret operator for single-player sessions.
//!
//! All randomness comes through the injected `Rng`, so a seeded generator
//! replays the same button sequence.

use std::ops::Range;

use rand::Rng;

use crate::input::InputState;

/// Per-tick chance (1 in N) that an idle button starts being held.
const PRESS_ODDS: u32 = 90;
/// Per-tick chance (1 in N) that a row toggle is pressed.
const TOGGLE_ODDS: u32 = 600;
const HOLD_TICKS: Range<u32> = 60..240;

#[derive(Debug, Clone, Default)]
pub struct TurretAutopilot {
    /// Remaining hold ticks for A, S, D, J, K, L.
    holds: [u32; 6],
}

impl TurretAutopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holds(&self) -> &[u32; 6] {
        &self.holds
    }

    /// Produce this tick's turret controls. Pointer and fire stay unset.
    pub fn next_input(&mut self, rng: &mut impl Rng) -> InputState {
        let mut input = InputState::default();

        for (i, hold) in self.holds.iter_mut().enumerate() {
            if *hold == 0 && rng.gen_ratio(1, PRESS_ODDS) {
                *hold = rng.gen_range(HOLD_TICKS);
            }
            let pressed = *hold > 0;
            *hold = hold.saturating_sub(1);
            if i < 3 {
                input.top_buttons[i] = pressed;
            } else {
                input.bottom_buttons[i - 3] = pressed;
            }
        }

        input.top_toggle = rng.gen_ratio(1, TOGGLE_ODDS);
        input.bottom_toggle = rng.gen_ratio(1, TOGGLE_ODDS);
        input
    }
}

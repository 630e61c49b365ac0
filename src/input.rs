/// Decoded input for one tick. Producers (keyboard, mouse, autopilot) fill
/// this in; the core only reads it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    /// A, S, D: the three turrets of the top-edge row (or the left row when
    /// the top toggle is set).
    pub top_buttons: [bool; 3],
    /// J, K, L: the three turrets of the bottom-edge row (or the right row
    /// when the bottom toggle is set).
    pub bottom_buttons: [bool; 3],
    pub top_toggle: bool,
    pub bottom_toggle: bool,
    pub fire: bool,
    /// Pointer position in surface pixels, unclamped.
    pub pointer: Option<(f32, f32)>,
}

impl InputState {
    /// Logical OR of the turret controls; pointer and fire come from `self`.
    pub fn merge_turrets(&self, other: &InputState) -> InputState {
        let mut merged = self.clone();
        for i in 0..3 {
            merged.top_buttons[i] |= other.top_buttons[i];
            merged.bottom_buttons[i] |= other.bottom_buttons[i];
        }
        merged.top_toggle |= other.top_toggle;
        merged.bottom_toggle |= other.bottom_toggle;
        merged
    }
}

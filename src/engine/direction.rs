//! Compass direction classification
//!
//! Two classifiers share the [`Direction`] type: stick movement is classified
//! from the snapshot-to-snapshot delta vector on the tick the stick leaves
//! its dead zone, and the D-pad is classified from the currently-held button
//! combination with a fixed vertical-first priority.
//!
//! The delta classifier thresholds each axis symmetrically (`|d| > t`), so
//! negative-axis diagonals classify the same way as positive ones.

use super::snapshot::{ButtonSet, PadButton};

/// Per-axis delta magnitude a stick movement must exceed to register as
/// motion along that axis.
pub const DIRECTION_DETECT_THRESHOLD: f32 = 0.1;

/// One of eight compass directions, or `None` for rest/neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub fn is_none(self) -> bool {
        self == Direction::None
    }
}

/// Classify a stick delta vector into a compass direction.
///
/// An axis contributes only when its delta magnitude exceeds `threshold`;
/// a delta below threshold on both axes yields `Direction::None` even when
/// the caller has already observed a dead-zone transition.
pub fn classify_delta(dx: f32, dy: f32, threshold: f32) -> Direction {
    let horizontal = dx.abs() > threshold;
    let vertical = dy.abs() > threshold;

    match (horizontal, vertical) {
        (false, false) => Direction::None,
        (false, true) => {
            if dy > 0.0 {
                Direction::Up
            } else {
                Direction::Down
            }
        }
        (true, false) => {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        }
        (true, true) => match (dx > 0.0, dy > 0.0) {
            (true, true) => Direction::UpRight,
            (true, false) => Direction::DownRight,
            (false, true) => Direction::UpLeft,
            (false, false) => Direction::DownLeft,
        },
    }
}

/// Classify the currently-held D-pad buttons into a compass direction.
///
/// Vertical buttons take priority: a held Up (or Down) is checked for a
/// horizontal companion to form a diagonal before Left/Right are considered
/// on their own.
pub fn dpad_direction(buttons: ButtonSet) -> Direction {
    let left = buttons.contains(PadButton::DPadLeft);
    let right = buttons.contains(PadButton::DPadRight);

    if buttons.contains(PadButton::DPadUp) {
        if left {
            Direction::UpLeft
        } else if right {
            Direction::UpRight
        } else {
            Direction::Up
        }
    } else if buttons.contains(PadButton::DPadDown) {
        if left {
            Direction::DownLeft
        } else if right {
            Direction::DownRight
        } else {
            Direction::Down
        }
    } else if left {
        Direction::Left
    } else if right {
        Direction::Right
    } else {
        Direction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: f32 = DIRECTION_DETECT_THRESHOLD;

    #[test]
    fn test_vertical_dominance() {
        // Only the Y delta exceeds the threshold.
        assert_eq!(classify_delta(0.02, 0.3, T), Direction::Up);
        assert_eq!(classify_delta(0.02, -0.3, T), Direction::Down);
    }

    #[test]
    fn test_horizontal_dominance() {
        assert_eq!(classify_delta(0.3, 0.02, T), Direction::Right);
        assert_eq!(classify_delta(-0.3, 0.02, T), Direction::Left);
    }

    #[test]
    fn test_diagonals_symmetric_on_negative_axes() {
        assert_eq!(classify_delta(0.3, 0.3, T), Direction::UpRight);
        assert_eq!(classify_delta(0.3, -0.3, T), Direction::DownRight);
        assert_eq!(classify_delta(-0.3, 0.3, T), Direction::UpLeft);
        assert_eq!(classify_delta(-0.3, -0.3, T), Direction::DownLeft);
    }

    #[test]
    fn test_negligible_delta_is_none() {
        assert_eq!(classify_delta(0.05, 0.05, T), Direction::None);
        assert_eq!(classify_delta(-0.09, 0.0, T), Direction::None);
    }

    #[test]
    fn test_dpad_priority_up_overrides_horizontal() {
        let buttons = ButtonSet::from_iter([PadButton::DPadUp, PadButton::DPadLeft]);
        assert_eq!(dpad_direction(buttons), Direction::UpLeft);

        let buttons = ButtonSet::from_iter([PadButton::DPadUp, PadButton::DPadRight]);
        assert_eq!(dpad_direction(buttons), Direction::UpRight);
    }

    #[test]
    fn test_dpad_down_diagonals() {
        let buttons = ButtonSet::from_iter([PadButton::DPadDown, PadButton::DPadLeft]);
        assert_eq!(dpad_direction(buttons), Direction::DownLeft);

        let buttons = ButtonSet::from_iter([PadButton::DPadDown, PadButton::DPadRight]);
        assert_eq!(dpad_direction(buttons), Direction::DownRight);
    }

    #[test]
    fn test_dpad_cardinals_and_neutral() {
        assert_eq!(
            dpad_direction(ButtonSet::from_iter([PadButton::DPadLeft])),
            Direction::Left
        );
        assert_eq!(
            dpad_direction(ButtonSet::from_iter([PadButton::DPadRight])),
            Direction::Right
        );
        assert_eq!(dpad_direction(ButtonSet::EMPTY), Direction::None);
        // Non-dpad buttons never contribute.
        assert_eq!(
            dpad_direction(ButtonSet::from_iter([PadButton::A, PadButton::Start])),
            Direction::None
        );
    }
}

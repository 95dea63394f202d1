//! Inputs delivered to the core: per-tick motion samples and key events.

use usbd_hid::descriptor::MouseReport;
use zq_types::action::Action;

use crate::time::Timestamp;

/// One tick's worth of trackball motion.
///
/// `x`/`y` move the cursor, `h`/`v` are horizontal and vertical wheel.
/// Produced once per tick, consumed (zeroed) by whichever component claims it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    pub x: i8,
    pub y: i8,
    pub h: i8,
    pub v: i8,
}

impl MotionSample {
    pub const fn new(x: i8, y: i8, h: i8, v: i8) -> Self {
        Self { x, y, h, v }
    }

    /// Cursor-only sample
    pub const fn xy(x: i8, y: i8) -> Self {
        Self { x, y, h: 0, v: 0 }
    }

    /// Sum of absolute deltas on all four axes, `i8::MIN` counts as 128.
    pub fn magnitude(&self) -> u16 {
        self.x.unsigned_abs() as u16
            + self.y.unsigned_abs() as u16
            + self.h.unsigned_abs() as u16
            + self.v.unsigned_abs() as u16
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.h == 0 && self.v == 0
    }

    /// Build the HID mouse report carrying this motion with the given button bits
    pub fn to_mouse_report(self, buttons: u8) -> MouseReport {
        MouseReport {
            buttons,
            x: self.x,
            y: self.y,
            wheel: self.v,
            pan: self.h,
        }
    }
}

/// Physical position of a key in the matrix
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub row: u8,
    pub col: u8,
}

/// A key press or release, delivered before any other per-key processing.
///
/// `action` is what the key resolved to on the layer stack at the time of the
/// event, `time` is when it happened.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub pos: KeyPos,
    pub action: Action,
    pub pressed: bool,
    pub time: Timestamp,
}

impl KeyEvent {
    pub fn press(row: u8, col: u8, action: Action, time: Timestamp) -> Self {
        Self {
            pos: KeyPos { row, col },
            action,
            pressed: true,
            time,
        }
    }

    pub fn release(row: u8, col: u8, action: Action, time: Timestamp) -> Self {
        Self {
            pos: KeyPos { row, col },
            action,
            pressed: false,
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        assert_eq!(MotionSample::new(3, -4, 1, -1).magnitude(), 9);
        assert_eq!(MotionSample::new(i8::MIN, i8::MIN, i8::MIN, i8::MIN).magnitude(), 512);
        assert!(MotionSample::default().is_zero());
    }

    #[test]
    fn test_to_mouse_report() {
        let report = MotionSample::new(1, -2, 3, -4).to_mouse_report(0b1);
        assert_eq!(report.buttons, 1);
        assert_eq!(report.x, 1);
        assert_eq!(report.y, -2);
        assert_eq!(report.pan, 3);
        assert_eq!(report.wheel, -4);
    }
}

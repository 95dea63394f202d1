//! Keymap actions.
//!
//! An [`Action`] is what a keymap position resolves to on a given layer. The
//! core only inspects actions, it never executes layer actions itself.

use crate::keycode::HidKeyCode;
use crate::modifier::ModifierCombination;

/// A single basic action that a keymap position holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Default action, no action.
    #[default]
    No,
    /// Transparent action, next layer will be checked.
    Transparent,
    /// A normal key stroke, including mouse keys.
    Key(HidKeyCode),
    /// Key stroke with modifier combination triggered, e.g. `Alt+Left`.
    KeyWithModifier(HidKeyCode, ModifierCombination),
    /// Activate a layer while held
    LayerOn(u8),
}

impl Action {
    /// Returns `true` if this is exactly `Action::Key(key)`, without modifiers
    pub fn is_key(self, key: HidKeyCode) -> bool {
        self == Action::Key(key)
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Action::No)
    }
}

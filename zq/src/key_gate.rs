//! Which keys may be pressed without leaving the mouse layer.

use zq_types::action::Action;
use zq_types::keycode::HidKeyCode;

/// Decide whether a key press keeps the mouse layer engaged.
///
/// `action` must be the key's entry on the mouse layer itself, not whatever it
/// resolves to through the stack. Transparent entries are denied.
pub fn is_mouse_layer_key_allowed(action: Action) -> bool {
    match action {
        Action::Key(key) => {
            key.is_mouse_button()
                || key.is_mouse_wheel()
                || key.is_mouse_movement()
                || key.is_mouse_accel()
                || matches!(key, HidKeyCode::LShift | HidKeyCode::LCtrl | HidKeyCode::LAlt)
                || key.is_browser_key()
                || key.is_function_key()
        }
        // Word-wise cursor jumps on the mouse layer thumb keys
        Action::KeyWithModifier(HidKeyCode::Left | HidKeyCode::Right, modifiers) => modifiers.is_left_alt_only(),
        _ => false,
    }
}

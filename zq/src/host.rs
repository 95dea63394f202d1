//! Collaborators the core drives: keystroke output, plus the combined [`Host`] bound.

use zq_types::action::Action;

use crate::layer::LayerStack;
use crate::time::Clock;

/// Output-side keystroke injection
pub trait KeyEmitter {
    /// Press and release `action` as one keystroke
    fn tap(&mut self, action: Action);

    /// Register `action` as held
    fn press(&mut self, action: Action);

    /// Unregister a held `action`
    fn release(&mut self, action: Action);
}

/// Everything the controller needs from the firmware around it.
pub trait Host: Clock + LayerStack + KeyEmitter {}

impl<T: Clock + LayerStack + KeyEmitter> Host for T {}

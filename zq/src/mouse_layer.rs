//! Auto mouse layer.
//!
//! Trackball motion engages the mouse layer once enough of it has accumulated.
//! The layer is left again by the return button: a single click arms a return
//! that fires after the return term, a double click returns as soon as the
//! second release arrives. Pressing any key that has no business on the mouse
//! layer returns immediately.

use crate::config::MouseLayerConfig;
use crate::event::{KeyEvent, MotionSample};
use crate::key_gate::is_mouse_layer_key_allowed;
use crate::layer::LayerStack;
use crate::motion::{MotionAccumulator, MotionResult};
use crate::time::Timestamp;

/// State of the auto mouse layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseLayer {
    /// Whether this state machine engaged the mouse layer
    active: bool,
    motion: MotionAccumulator,
    /// Release time of the first click, `None` when no return is armed
    btn1_timer: Option<Timestamp>,
    btn1_pressed: bool,
    btn1_waiting_return: bool,
}

impl MouseLayer {
    pub const fn new() -> Self {
        Self {
            active: false,
            motion: MotionAccumulator::new(),
            btn1_timer: None,
            btn1_pressed: false,
            btn1_waiting_return: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn motion_accum(&self) -> u16 {
        self.motion.value()
    }

    pub fn btn1_timer(&self) -> Option<Timestamp> {
        self.btn1_timer
    }

    pub fn btn1_pressed(&self) -> bool {
        self.btn1_pressed
    }

    pub fn is_waiting_return(&self) -> bool {
        self.btn1_waiting_return
    }

    /// Whether key events should go through the return protocol
    fn is_engaged<L: LayerStack>(&self, config: &MouseLayerConfig, layers: &L) -> bool {
        self.active && layers.is_layer_on(config.mouse_layer())
    }

    /// Return to the default layer if an armed single-click return has timed out.
    ///
    /// Returns true if the layer was left.
    pub fn maybe_return<L: LayerStack>(&mut self, now: Timestamp, config: &MouseLayerConfig, layers: &mut L) -> bool {
        if !self.active || !self.btn1_waiting_return || self.btn1_pressed {
            return false;
        }
        let Some(released_at) = self.btn1_timer else {
            return false;
        };
        if now.has_elapsed(released_at, config.return_term()) {
            debug!("Mouse layer return term elapsed, released at {}", released_at.as_millis());
            self.return_to_default(config, layers);
            return true;
        }
        false
    }

    /// Follow layer changes made by someone else.
    ///
    /// Only `active` is corrected, the accumulator and button state are kept.
    pub fn reconcile<L: LayerStack>(&mut self, config: &MouseLayerConfig, layers: &L) {
        if self.active && !layers.is_layer_on(config.mouse_layer()) {
            debug!("Mouse layer was turned off externally");
            self.active = false;
        }
    }

    /// Feed one motion sample, engaging the mouse layer when the threshold is crossed.
    ///
    /// Returns true when the threshold was crossed by this sample.
    pub fn check_activation<L: LayerStack>(
        &mut self,
        sample: &MotionSample,
        config: &MouseLayerConfig,
        layers: &mut L,
    ) -> bool {
        if self.active {
            return false;
        }
        match self.motion.feed(sample, config.activation_threshold()) {
            MotionResult::ThresholdCrossed => {
                if config.auto_activate() {
                    info!("Motion threshold crossed, enabling mouse layer {}", config.mouse_layer());
                    layers.layer_on(config.mouse_layer());
                    self.active = true;
                }
                true
            }
            _ => false,
        }
    }

    /// Run the return protocol and the key gate for a key event.
    ///
    /// Never consumes the event, the key always continues to normal processing.
    pub fn process_key<L: LayerStack>(&mut self, event: &KeyEvent, config: &MouseLayerConfig, layers: &mut L) {
        if !self.is_engaged(config, layers) {
            return;
        }

        if event.action.is_key(config.return_button()) {
            if event.pressed {
                if self.btn1_waiting_return
                    && let Some(released_at) = self.btn1_timer
                    && !event.time.has_elapsed(released_at, config.return_term())
                {
                    // Second click of a double click, stay until it is released
                    self.btn1_waiting_return = false;
                    self.btn1_timer = None;
                }
                self.btn1_pressed = true;
            } else if self.btn1_pressed {
                self.btn1_pressed = false;
                if self.btn1_waiting_return {
                    debug!("Double click released, leaving mouse layer");
                    self.return_to_default(config, layers);
                } else {
                    self.btn1_waiting_return = true;
                    self.btn1_timer = Some(event.time);
                }
            }
        }

        if event.pressed && self.active {
            let action = layers.resolve(config.mouse_layer(), event.pos);
            if !is_mouse_layer_key_allowed(action) {
                debug!("Key {:?} is not allowed on the mouse layer, leaving", action);
                self.return_to_default(config, layers);
            }
        }
    }

    /// Move to the default layer and clear all state
    pub fn return_to_default<L: LayerStack>(&mut self, config: &MouseLayerConfig, layers: &mut L) {
        info!("Returning to default layer {}", config.default_layer());
        *self = Self::new();
        layers.move_to(config.default_layer());
    }

    /// Manually engage the mouse layer, e.g. from a layer key with auto activation turned off
    pub fn activate<L: LayerStack>(&mut self, config: &MouseLayerConfig, layers: &mut L) {
        if !self.active {
            layers.layer_on(config.mouse_layer());
            self.active = true;
        }
    }
}

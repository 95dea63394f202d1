//! The controller tying the mouse layer, gestures and scroll mode together.

use crate::config::ZqConfig;
use crate::event::{KeyEvent, MotionSample};
use crate::gesture::{GestureEngine, GestureError, GestureSlot};
use crate::host::Host;
use crate::mouse_layer::MouseLayer;
use crate::split::{SplitError, SplitState, SplitSync, SplitTransport};
use crate::tap_hold::HoldResolvable;

/// Owns all trackball state.
///
/// The firmware calls [`process_motion`](Self::process_motion) once per
/// sensor tick, [`process_key`](Self::process_key) for every key event before
/// any other key processing, and [`on_layer_change`](Self::on_layer_change)
/// whenever the engaged layers change. `N` is the number of gesture slots.
pub struct TrackballController<const N: usize> {
    config: ZqConfig,
    mouse_layer: MouseLayer,
    gestures: GestureEngine<N>,
    /// Motion goes to the wheel instead of the cursor
    scroll_mode: bool,
    /// Motion not yet sent as scroll because of the divider
    scroll_remainder: (i16, i16),
    split: SplitSync,
}

impl<const N: usize> TrackballController<N> {
    pub fn new(config: ZqConfig) -> Self {
        Self {
            config,
            mouse_layer: MouseLayer::new(),
            gestures: GestureEngine::new(),
            scroll_mode: false,
            scroll_remainder: (0, 0),
            split: SplitSync::new(),
        }
    }

    pub fn config(&self) -> &ZqConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ZqConfig {
        &mut self.config
    }

    pub fn mouse_layer(&self) -> &MouseLayer {
        &self.mouse_layer
    }

    pub fn gestures(&self) -> &GestureEngine<N> {
        &self.gestures
    }

    pub fn gestures_mut(&mut self) -> &mut GestureEngine<N> {
        &mut self.gestures
    }

    pub fn add_gesture(&mut self, slot: GestureSlot) -> Result<(), GestureError> {
        self.gestures.add_slot(slot).inspect_err(|e| {
            error!("Failed to add gesture slot: {:?}", e);
        })
    }

    pub fn is_scroll_mode(&self) -> bool {
        self.scroll_mode
    }

    pub fn split_state(&self) -> SplitState {
        self.split.state()
    }

    /// Handle one tick of trackball motion, returns what is left for the cursor.
    ///
    /// `holds` are the tap/hold keys which motion may force into hold.
    pub fn process_motion<H: Host, R: HoldResolvable>(
        &mut self,
        mut sample: MotionSample,
        host: &mut H,
        holds: &mut [R],
    ) -> MotionSample {
        let now = host.now();
        self.mouse_layer.maybe_return(now, &self.config.mouse_layer, host);
        self.mouse_layer.reconcile(&self.config.mouse_layer, host);

        self.gestures
            .interrupt_pending_holds(&sample, &self.config.gesture, holds, &mut *host);
        self.gestures
            .process_motion(&mut sample, now, &self.config.gesture, &mut *host);

        if self.scroll_mode {
            sample = self.convert_to_scroll(sample);
        }

        self.mouse_layer
            .check_activation(&sample, &self.config.mouse_layer, host);
        sample
    }

    /// Handle a key event, returns false if the event was consumed.
    pub fn process_key<H: Host>(&mut self, event: &KeyEvent, host: &mut H) -> bool {
        self.mouse_layer
            .maybe_return(event.time, &self.config.mouse_layer, host);
        self.mouse_layer
            .process_key(event, &self.config.mouse_layer, host);
        !self.gestures.process_key(event, &self.config.gesture, &mut *host)
    }

    /// Follow a change of the engaged layers, returns `layer_mask` unchanged.
    pub fn on_layer_change(&mut self, layer_mask: u32) -> u32 {
        let scroll = match self.config.scroll.scroll_layer() {
            Some(layer) if layer < 32 => layer_mask & (1 << layer) != 0,
            _ => false,
        };
        self.set_scroll_mode(scroll);
        self.split.set_layer_mask(layer_mask);
        layer_mask
    }

    pub fn set_scroll_mode(&mut self, enabled: bool) {
        if self.scroll_mode != enabled {
            info!("Scroll mode: {}", enabled);
            self.scroll_mode = enabled;
            self.scroll_remainder = (0, 0);
        }
        self.split.set_inverted(enabled);
    }

    /// Push the latest state to the other half if it changed
    pub fn sync_split<T: SplitTransport>(&mut self, transport: &mut T) -> Result<bool, SplitError> {
        self.split.sync(transport)
    }

    /// Move cursor motion to the wheels, rolling the ball away scrolls up
    fn convert_to_scroll(&mut self, sample: MotionSample) -> MotionSample {
        let divisor = 1i16 << self.config.scroll.divider();
        let (h, v) = self.scroll_remainder;
        let h = h.saturating_add(sample.x as i16);
        let v = v.saturating_sub(sample.y as i16);
        let out_h = h / divisor;
        let out_v = v / divisor;
        self.scroll_remainder = (h - out_h * divisor, v - out_v * divisor);
        MotionSample {
            x: 0,
            y: 0,
            h: sample.h.saturating_add(clamp_i8(out_h)),
            v: sample.v.saturating_add(clamp_i8(out_v)),
        }
    }
}

fn clamp_i8(value: i16) -> i8 {
    value.clamp(i8::MIN as i16, i8::MAX as i16) as i8
}

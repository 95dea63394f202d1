use embassy_time::Duration;
use zq_types::keycode::HidKeyCode;

/// Tunable configuration for the trackball core.
///
/// There are 3 groups:
/// 1. `MouseLayerConfig`: auto mouse layer activation and the return protocol.
/// 2. `GestureConfig`: directional gesture thresholds and timings.
/// 3. `ScrollConfig`: which layer switches the trackball into scroll mode.
///
/// Every numeric value is clamped when it is written, so readers never need to
/// range-check.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZqConfig {
    pub mouse_layer: MouseLayerConfig,
    pub gesture: GestureConfig,
    pub scroll: ScrollConfig,
}

pub const ACTIVATION_THRESHOLD_MIN: u16 = 1;
pub const ACTIVATION_THRESHOLD_MAX: u16 = 1000;
pub const RETURN_TERM_MIN_MS: u64 = 50;
pub const RETURN_TERM_MAX_MS: u64 = 1000;
pub const GESTURE_THRESHOLD_MIN: u16 = 10;
pub const GESTURE_THRESHOLD_MAX: u16 = 2000;
pub const HOLD_TERM_MAX_MS: u64 = 1000;
pub const REFRACTORY_MAX_MS: u64 = 2000;
pub const SCROLL_DIVIDER_MAX: u8 = 7;

/// Config for the auto mouse layer
#[derive(Clone, Copy, Debug)]
pub struct MouseLayerConfig {
    default_layer: u8,
    mouse_layer: u8,
    activation_threshold: u16,
    return_term: Duration,
    return_button: HidKeyCode,
    auto_activate: bool,
}

impl Default for MouseLayerConfig {
    fn default() -> Self {
        Self {
            default_layer: 0,
            mouse_layer: 4,
            activation_threshold: 50,
            return_term: Duration::from_millis(160),
            return_button: HidKeyCode::MouseBtn1,
            auto_activate: true,
        }
    }
}

impl MouseLayerConfig {
    pub fn new(default_layer: u8, mouse_layer: u8) -> Self {
        Self {
            default_layer,
            mouse_layer,
            ..Self::default()
        }
    }

    pub fn default_layer(&self) -> u8 {
        self.default_layer
    }

    pub fn mouse_layer(&self) -> u8 {
        self.mouse_layer
    }

    /// Accumulated motion magnitude needed to engage the mouse layer
    pub fn activation_threshold(&self) -> u16 {
        self.activation_threshold
    }

    pub fn set_activation_threshold(&mut self, threshold: u16) {
        self.activation_threshold = threshold.clamp(ACTIVATION_THRESHOLD_MIN, ACTIVATION_THRESHOLD_MAX);
    }

    /// Step the threshold up or down, e.g. from an adjust key on the settings layer
    pub fn adjust_activation_threshold(&mut self, delta: i32) {
        let next = (self.activation_threshold as i32 + delta)
            .clamp(ACTIVATION_THRESHOLD_MIN as i32, ACTIVATION_THRESHOLD_MAX as i32);
        self.activation_threshold = next as u16;
    }

    /// How long after a single release of the return button the layer stays engaged
    pub fn return_term(&self) -> Duration {
        self.return_term
    }

    pub fn set_return_term(&mut self, term: Duration) {
        let ms = term.as_millis().clamp(RETURN_TERM_MIN_MS, RETURN_TERM_MAX_MS);
        self.return_term = Duration::from_millis(ms);
    }

    pub fn return_button(&self) -> HidKeyCode {
        self.return_button
    }

    pub fn set_return_button(&mut self, button: HidKeyCode) {
        if button.is_mouse_button() {
            self.return_button = button;
        } else {
            warn!("Return button must be a mouse button, got {:?}", button);
        }
    }

    pub fn auto_activate(&self) -> bool {
        self.auto_activate
    }

    pub fn set_auto_activate(&mut self, enabled: bool) {
        self.auto_activate = enabled;
    }
}

/// What happens to an axis accumulator after its gesture fires
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccumulatorReset {
    /// Drop everything, including the overflow past the threshold
    #[default]
    Zero,
    /// Subtract the threshold and keep the remainder
    KeepRemainder,
}

/// Configurations for directional gestures
#[derive(Clone, Copy, Debug)]
pub struct GestureConfig {
    threshold: u16,
    hold_term: Duration,
    refractory: Duration,
    accumulator_reset: AccumulatorReset,
    interrupt_tap_hold: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            hold_term: Duration::from_millis(200),
            refractory: Duration::from_millis(150),
            accumulator_reset: AccumulatorReset::Zero,
            interrupt_tap_hold: true,
        }
    }
}

impl GestureConfig {
    /// Accumulated motion on one axis needed to fire a gesture keystroke
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u16) {
        self.threshold = threshold.clamp(GESTURE_THRESHOLD_MIN, GESTURE_THRESHOLD_MAX);
    }

    /// How long a trigger key must be held before motion becomes gestures
    pub fn hold_term(&self) -> Duration {
        self.hold_term
    }

    pub fn set_hold_term(&mut self, term: Duration) {
        self.hold_term = Duration::from_millis(term.as_millis().min(HOLD_TERM_MAX_MS));
    }

    /// Minimum time between two fires of the same slot
    pub fn refractory(&self) -> Duration {
        self.refractory
    }

    pub fn set_refractory(&mut self, refractory: Duration) {
        self.refractory = Duration::from_millis(refractory.as_millis().min(REFRACTORY_MAX_MS));
    }

    pub fn accumulator_reset(&self) -> AccumulatorReset {
        self.accumulator_reset
    }

    pub fn set_accumulator_reset(&mut self, policy: AccumulatorReset) {
        self.accumulator_reset = policy;
    }

    /// Whether trackball motion forces pending tap/hold keys to resolve as hold
    pub fn interrupt_tap_hold(&self) -> bool {
        self.interrupt_tap_hold
    }

    pub fn set_interrupt_tap_hold(&mut self, enabled: bool) {
        self.interrupt_tap_hold = enabled;
    }
}

/// Config for scroll mode
#[derive(Clone, Copy, Debug)]
pub struct ScrollConfig {
    scroll_layer: Option<u8>,
    divider: u8,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scroll_layer: Some(3),
            divider: 0,
        }
    }
}

impl ScrollConfig {
    /// Layer that turns scroll mode on while it is active
    pub fn scroll_layer(&self) -> Option<u8> {
        self.scroll_layer
    }

    pub fn set_scroll_layer(&mut self, layer: Option<u8>) {
        self.scroll_layer = layer;
    }

    /// Scroll speed divider, applied as a right shift of the motion
    pub fn divider(&self) -> u8 {
        self.divider
    }

    pub fn set_divider(&mut self, divider: u8) {
        self.divider = divider.min(SCROLL_DIVIDER_MAX);
    }
}

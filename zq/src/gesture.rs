//! Directional gestures: hold a trigger key and roll the ball to send keystrokes.
//!
//! Every slot is bound to one trigger action. Released before the hold term,
//! the trigger behaves like a normal key and taps its own action. Held past
//! the hold term, the slot swallows cursor motion and accumulates it per axis,
//! firing the mapped keystroke whenever an axis reaches the gesture threshold.

use heapless::Vec;
use zq_types::action::Action;
use zq_types::keycode::HidKeyCode;
use zq_types::modifier::{ALT, CTRL, GUI, ModifierCombination};

use crate::config::{AccumulatorReset, GestureConfig};
use crate::event::{KeyEvent, KeyPos, MotionSample};
use crate::host::KeyEmitter;
use crate::tap_hold::HoldResolvable;
use crate::time::Timestamp;

/// Errors of the gesture engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureError {
    /// All slots are in use
    TooManySlots,
    /// Another slot already uses this trigger
    DuplicateTrigger(Action),
    /// No slot is bound to this trigger
    NoSuchTrigger(Action),
}

/// Keystrokes sent per direction, `Action::No` sends nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectionCodes {
    /// Ball rolled away from the user, negative y
    pub forward: Action,
    /// Ball rolled towards the user, positive y
    pub backward: Action,
    pub left: Action,
    pub right: Action,
}

/// Operating system of the connected host, used to pick shortcut presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostOs {
    #[default]
    Unsure,
    Linux,
    Windows,
    MacOs,
    Ios,
}

impl HostOs {
    fn is_apple(self) -> bool {
        matches!(self, HostOs::MacOs | HostOs::Ios)
    }

    /// Modifier used for common shortcuts, Cmd on Apple hosts and Ctrl elsewhere
    fn shortcut_modifier(self) -> ModifierCombination {
        if self.is_apple() { GUI } else { CTRL }
    }
}

/// Built-in gesture mappings which depend on the host OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GesturePreset {
    /// Left/right switch virtual desktops, forward/backward open/close the overview
    Workspace,
    /// Forward zooms in, backward zooms out
    Zoom,
    /// Forward copies, backward pastes
    Clipboard,
}

impl DirectionCodes {
    pub const NONE: Self = Self {
        forward: Action::No,
        backward: Action::No,
        left: Action::No,
        right: Action::No,
    };

    pub fn preset(preset: GesturePreset, os: HostOs) -> Self {
        let with = |key, modifiers| Action::KeyWithModifier(key, modifiers);
        let m = os.shortcut_modifier();
        match preset {
            GesturePreset::Workspace => match os {
                HostOs::MacOs | HostOs::Ios => {
                    Self {
                        forward: with(HidKeyCode::Up, CTRL),
                        backward: with(HidKeyCode::Down, CTRL),
                        left: with(HidKeyCode::Left, CTRL),
                        right: with(HidKeyCode::Right, CTRL),
                    }
                }
                HostOs::Windows => {
                    let ctrl_gui = CTRL | GUI;
                    Self {
                        forward: with(HidKeyCode::Tab, GUI),
                        backward: Action::No,
                        left: with(HidKeyCode::Left, ctrl_gui),
                        right: with(HidKeyCode::Right, ctrl_gui),
                    }
                }
                HostOs::Linux | HostOs::Unsure => {
                    let ctrl_alt = CTRL | ALT;
                    Self {
                        forward: with(HidKeyCode::Up, ctrl_alt),
                        backward: with(HidKeyCode::Down, ctrl_alt),
                        left: with(HidKeyCode::Left, ctrl_alt),
                        right: with(HidKeyCode::Right, ctrl_alt),
                    }
                }
            },
            GesturePreset::Zoom => Self {
                forward: with(HidKeyCode::Equal, m),
                backward: with(HidKeyCode::Minus, m),
                ..Self::NONE
            },
            GesturePreset::Clipboard => Self {
                forward: with(HidKeyCode::C, m),
                backward: with(HidKeyCode::V, m),
                ..Self::NONE
            },
        }
    }
}

/// One trigger key and its gesture state
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureSlot {
    trigger: Action,
    /// Sent when the trigger is released before qualifying as hold
    tap: Action,
    codes: DirectionCodes,
    /// Codes follow this preset when the host OS changes
    preset: Option<GesturePreset>,
    /// Position the trigger was pressed at, so the release is matched even if layers changed
    pos: Option<KeyPos>,
    pressed: bool,
    held: bool,
    press_time: Timestamp,
    x_accum: i16,
    y_accum: i16,
    last_fire: Option<Timestamp>,
}

impl GestureSlot {
    pub fn new(trigger: Action, codes: DirectionCodes) -> Self {
        Self {
            trigger,
            tap: trigger,
            codes,
            preset: None,
            pos: None,
            pressed: false,
            held: false,
            press_time: Timestamp::default(),
            x_accum: 0,
            y_accum: 0,
            last_fire: None,
        }
    }

    /// Slot whose codes come from `preset` and follow host OS changes
    pub fn with_preset(trigger: Action, preset: GesturePreset, os: HostOs) -> Self {
        Self {
            preset: Some(preset),
            ..Self::new(trigger, DirectionCodes::preset(preset, os))
        }
    }

    /// Send `tap` instead of the trigger action on a short press
    pub fn with_tap(self, tap: Action) -> Self {
        Self { tap, ..self }
    }

    pub fn trigger(&self) -> Action {
        self.trigger
    }

    pub fn codes(&self) -> DirectionCodes {
        self.codes
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn accum(&self) -> (i16, i16) {
        (self.x_accum, self.y_accum)
    }

    fn reset(&mut self) {
        self.pressed = false;
        self.held = false;
        self.pos = None;
        self.x_accum = 0;
        self.y_accum = 0;
    }

    fn press(&mut self, pos: KeyPos, now: Timestamp) {
        self.reset();
        self.pressed = true;
        self.pos = Some(pos);
        self.press_time = now;
    }

    /// Promote a pressed slot to held once the hold term has passed
    fn qualify(&mut self, now: Timestamp, config: &GestureConfig) {
        if self.pressed && !self.held && now.has_elapsed(self.press_time, config.hold_term()) {
            debug!("Gesture {:?} qualified as hold", self.trigger);
            self.held = true;
            self.x_accum = 0;
            self.y_accum = 0;
        }
    }

    fn release(&mut self, now: Timestamp, config: &GestureConfig, emitter: &mut dyn KeyEmitter) {
        self.qualify(now, config);
        if !self.held {
            emitter.tap(self.tap);
        }
        self.reset();
    }

    fn in_refractory(&self, now: Timestamp, config: &GestureConfig) -> bool {
        match self.last_fire {
            Some(fired) => !now.has_elapsed(fired, config.refractory()),
            None => false,
        }
    }

    /// Accumulate the sample's cursor motion, fire, and swallow the motion while held.
    fn consume(&mut self, sample: &mut MotionSample, now: Timestamp, config: &GestureConfig, emitter: &mut dyn KeyEmitter) {
        if !self.pressed {
            return;
        }
        self.x_accum = self.x_accum.saturating_add(sample.x as i16);
        self.y_accum = self.y_accum.saturating_add(sample.y as i16);
        if !self.held {
            return;
        }
        sample.x = 0;
        sample.y = 0;

        let threshold = config.threshold();
        if !self.in_refractory(now, config) && self.x_accum.unsigned_abs() >= threshold {
            let code = if self.x_accum > 0 { self.codes.right } else { self.codes.left };
            self.x_accum = reset_axis(self.x_accum, threshold, config.accumulator_reset());
            self.fire(code, now, emitter);
        }
        if !self.in_refractory(now, config) && self.y_accum.unsigned_abs() >= threshold {
            let code = if self.y_accum < 0 { self.codes.forward } else { self.codes.backward };
            self.y_accum = reset_axis(self.y_accum, threshold, config.accumulator_reset());
            self.fire(code, now, emitter);
        }
    }

    /// Every crossing opens the refractory window, unmapped directions just emit nothing
    fn fire(&mut self, code: Action, now: Timestamp, emitter: &mut dyn KeyEmitter) {
        self.last_fire = Some(now);
        if code.is_empty() {
            return;
        }
        debug!("Gesture {:?} fired {:?}", self.trigger, code);
        emitter.tap(code);
    }
}

fn reset_axis(accum: i16, threshold: u16, policy: AccumulatorReset) -> i16 {
    match policy {
        AccumulatorReset::Zero => 0,
        AccumulatorReset::KeepRemainder => {
            let threshold = threshold as i16;
            if accum > 0 { accum - threshold } else { accum + threshold }
        }
    }
}

/// A fixed set of gesture slots
pub struct GestureEngine<const N: usize> {
    slots: Vec<GestureSlot, N>,
    os: HostOs,
}

impl<const N: usize> Default for GestureEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> GestureEngine<N> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            os: HostOs::Unsure,
        }
    }

    pub fn slots(&self) -> &[GestureSlot] {
        &self.slots
    }

    pub fn host_os(&self) -> HostOs {
        self.os
    }

    pub fn add_slot(&mut self, slot: GestureSlot) -> Result<(), GestureError> {
        if self.slots.iter().any(|s| s.trigger == slot.trigger) {
            return Err(GestureError::DuplicateTrigger(slot.trigger));
        }
        let slot = match slot.preset {
            Some(preset) => GestureSlot {
                codes: DirectionCodes::preset(preset, self.os),
                ..slot
            },
            None => slot,
        };
        self.slots.push(slot).map_err(|_| GestureError::TooManySlots)
    }

    /// Replace the codes of the slot bound to `trigger`, detaching it from its preset
    pub fn set_direction_codes(&mut self, trigger: Action, codes: DirectionCodes) -> Result<(), GestureError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.trigger == trigger)
            .ok_or(GestureError::NoSuchTrigger(trigger))?;
        slot.codes = codes;
        slot.preset = None;
        Ok(())
    }

    /// Re-derive the codes of every preset slot for a newly detected host
    pub fn set_host_os(&mut self, os: HostOs) {
        info!("Host OS set to {:?}", os);
        self.os = os;
        for slot in self.slots.iter_mut() {
            if let Some(preset) = slot.preset {
                slot.codes = DirectionCodes::preset(preset, os);
            }
        }
    }

    /// Whether any slot currently swallows motion
    pub fn is_holding(&self) -> bool {
        self.slots.iter().any(|s| s.held)
    }

    /// Qualify holds and let held slots consume the sample's cursor motion
    pub fn process_motion(
        &mut self,
        sample: &mut MotionSample,
        now: Timestamp,
        config: &GestureConfig,
        emitter: &mut dyn KeyEmitter,
    ) {
        for slot in self.slots.iter_mut() {
            slot.qualify(now, config);
            slot.consume(sample, now, config, emitter);
        }
    }

    /// Force every undecided tap/hold key into hold when the ball moves
    pub fn interrupt_pending_holds<R: HoldResolvable>(
        &self,
        sample: &MotionSample,
        config: &GestureConfig,
        holds: &mut [R],
        emitter: &mut dyn KeyEmitter,
    ) {
        if !config.interrupt_tap_hold() || sample.is_zero() {
            return;
        }
        for hold in holds.iter_mut() {
            if hold.is_pending_first_tap() {
                hold.force_hold(emitter);
            }
        }
    }

    /// Handle trigger keys, returns true if the event was consumed
    pub fn process_key(&mut self, event: &KeyEvent, config: &GestureConfig, emitter: &mut dyn KeyEmitter) -> bool {
        if event.pressed {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.trigger == event.action) {
                slot.press(event.pos, event.time);
                return true;
            }
            return false;
        }

        let idx = self
            .slots
            .iter()
            .position(|s| s.pressed && s.pos == Some(event.pos))
            .or_else(|| {
                self.slots
                    .iter()
                    .position(|s| s.pressed && s.trigger == event.action)
            });
        match idx {
            Some(i) => {
                self.slots[i].release(event.time, config, emitter);
                true
            }
            None => false,
        }
    }
}

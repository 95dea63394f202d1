//! Tap-or-hold keys and the hook that lets trackball motion decide them early.

use embassy_time::Duration;
use zq_types::action::Action;

use crate::event::{KeyEvent, KeyPos};
use crate::host::KeyEmitter;
use crate::time::Timestamp;

/// An input that can be waiting for its tap-or-hold decision.
///
/// The gesture engine uses this to force pending keys into hold as soon as the
/// trackball moves, instead of waiting for their own timeout.
pub trait HoldResolvable {
    /// Whether the key is pressed for the first time and not decided yet
    fn is_pending_first_tap(&self) -> bool;

    /// Resolve a pending key as hold right now
    fn force_hold(&mut self, emitter: &mut dyn KeyEmitter);
}

impl<T: HoldResolvable + ?Sized> HoldResolvable for &mut T {
    fn is_pending_first_tap(&self) -> bool {
        (**self).is_pending_first_tap()
    }

    fn force_hold(&mut self, emitter: &mut dyn KeyEmitter) {
        (**self).force_hold(emitter)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldState {
    /// Not pressed
    Idle,
    /// Pressed at the given time, not decided yet
    Pending(Timestamp),
    /// Resolved as hold, hold action is registered until release
    Held,
}

/// A key sending `tap` when released quickly, `hold` while held past `timeout`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapHoldKey {
    pos: KeyPos,
    tap: Action,
    hold: Action,
    timeout: Duration,
    state: TapHoldState,
}

impl TapHoldKey {
    pub fn new(pos: KeyPos, tap: Action, hold: Action, timeout: Duration) -> Self {
        Self {
            pos,
            tap,
            hold,
            timeout,
            state: TapHoldState::Idle,
        }
    }

    pub fn state(&self) -> TapHoldState {
        self.state
    }

    pub fn pos(&self) -> KeyPos {
        self.pos
    }

    /// Handle a key event, returns true if the event belongs to this key.
    pub fn process_key(&mut self, event: &KeyEvent, emitter: &mut dyn KeyEmitter) -> bool {
        if event.pos != self.pos {
            return false;
        }
        if event.pressed {
            self.state = TapHoldState::Pending(event.time);
            return true;
        }
        // A timeout that passed without a tick still counts
        self.tick(event.time, emitter);
        match self.state {
            TapHoldState::Pending(_) => {
                debug!("Tap-hold key {:?} released before timeout, tap", self.pos);
                emitter.tap(self.tap);
            }
            TapHoldState::Held => emitter.release(self.hold),
            TapHoldState::Idle => (),
        }
        self.state = TapHoldState::Idle;
        true
    }

    /// Resolve as hold once the timeout has passed.
    pub fn tick(&mut self, now: Timestamp, emitter: &mut dyn KeyEmitter) {
        if let TapHoldState::Pending(pressed_at) = self.state
            && now.has_elapsed(pressed_at, self.timeout)
        {
            debug!("Tap-hold key {:?} timed out, hold", self.pos);
            self.enter_hold(emitter);
        }
    }

    fn enter_hold(&mut self, emitter: &mut dyn KeyEmitter) {
        emitter.press(self.hold);
        self.state = TapHoldState::Held;
    }
}

impl HoldResolvable for TapHoldKey {
    fn is_pending_first_tap(&self) -> bool {
        matches!(self.state, TapHoldState::Pending(_))
    }

    fn force_hold(&mut self, emitter: &mut dyn KeyEmitter) {
        if self.is_pending_first_tap() {
            info!("Tap-hold key {:?} interrupted by motion, hold", self.pos);
            self.enter_hold(emitter);
        }
    }
}

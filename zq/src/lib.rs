//! Trackball core of the ZQ split keyboard.
//!
//! Two state machines share the trackball: the auto mouse layer, which turns
//! on when the ball moves and returns after a click, and the directional
//! gesture engine, which turns ball motion into keystrokes while a trigger key
//! is held. Both are owned by [`processor::TrackballController`].
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod event;
pub mod gesture;
pub mod host;
pub mod host_report;
pub mod key_gate;
pub mod layer;
pub mod motion;
pub mod mouse_layer;
pub mod processor;
pub mod runner;
pub mod split;
pub mod tap_hold;
pub mod time;

pub use zq_types::{action, keycode, modifier};

/// Mutex used by every channel of the crate
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

//! Channels connecting the controller task to the rest of the firmware

pub use embassy_sync::channel;
use embassy_sync::channel::Channel;
use usbd_hid::descriptor::MouseReport;

use crate::RawMutex;
use crate::event::{KeyEvent, MotionSample};
use crate::host_report::RAW_REPORT_SIZE;

pub const MOTION_CHANNEL_SIZE: usize = 8;
pub const KEY_EVENT_CHANNEL_SIZE: usize = 16;
pub const REPORT_CHANNEL_SIZE: usize = 16;

pub type MotionChannel = Channel<RawMutex, MotionSample, MOTION_CHANNEL_SIZE>;
pub type KeyEventChannel = Channel<RawMutex, KeyEvent, KEY_EVENT_CHANNEL_SIZE>;
pub type MouseReportChannel = Channel<RawMutex, MouseReport, REPORT_CHANNEL_SIZE>;
pub type LayerReportChannel = Channel<RawMutex, [u8; RAW_REPORT_SIZE], REPORT_CHANNEL_SIZE>;

/// One sample per sensor tick, zero samples included so timers keep being polled
pub static MOTION_CHANNEL: MotionChannel = Channel::new();
/// Key events from the matrix, before any other key processing
pub static KEY_EVENT_CHANNEL: KeyEventChannel = Channel::new();
/// Cursor and wheel reports for the HID writer
pub static MOUSE_REPORT_CHANNEL: MouseReportChannel = Channel::new();
/// Key events the controller did not consume, for the regular keymap processing
pub static PASSTHROUGH_KEY_CHANNEL: KeyEventChannel = Channel::new();
/// Encoded layer reports for the raw HID writer
pub static LAYER_REPORT_CHANNEL: LayerReportChannel = Channel::new();

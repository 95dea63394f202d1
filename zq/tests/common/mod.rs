#![allow(dead_code)]

use heapless::Vec;
use zq::action::Action;
use zq::config::{MouseLayerConfig, ZqConfig};
use zq::event::{KeyEvent, KeyPos};
use zq::host::KeyEmitter;
use zq::keycode::HidKeyCode;
use zq::layer::{LayerStack, Layers};
use zq::modifier::ALT;
use zq::split::SplitTransport;
use zq::time::{Clock, Timestamp};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const DEFAULT_LAYER: u8 = 0;
pub const SCROLL_LAYER: u8 = 3;
pub const MOUSE_LAYER: u8 = 4;

pub const BTN1_COL: u8 = 0;
pub const SHIFT_COL: u8 = 1;
pub const GESTURE_COL: u8 = 2;
pub const TAP_HOLD_COL: u8 = 3;
pub const F5_COL: u8 = 4;
pub const ALT_LEFT_COL: u8 = 5;

pub const GESTURE_TRIGGER: Action = Action::Key(HidKeyCode::Kc1);
pub const TAP_HOLD_TAP: Action = Action::Key(HidKeyCode::Space);
pub const TAP_HOLD_HOLD: Action = Action::LayerOn(1);

const A: Action = Action::Key(HidKeyCode::A);
const B: Action = Action::Key(HidKeyCode::B);
const C: Action = Action::Key(HidKeyCode::C);
const D: Action = Action::Key(HidKeyCode::D);
const T: Action = Action::Transparent;

#[rustfmt::skip]
pub static KEYMAP: [[[Action; 6]; 1]; 5] = [
    [[A, B, GESTURE_TRIGGER, TAP_HOLD_TAP, C, D]],
    [[T, T, T, T, T, T]],
    [[T, T, T, T, T, T]],
    [[T, T, T, T, T, T]],
    [[
        Action::Key(HidKeyCode::MouseBtn1),
        Action::Key(HidKeyCode::LShift),
        T,
        T,
        Action::Key(HidKeyCode::F5),
        Action::KeyWithModifier(HidKeyCode::Left, ALT),
    ]],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    Tap(Action),
    Press(Action),
    Release(Action),
}

/// Host with a manual clock which records every emitted keystroke
pub struct MockHost {
    pub now: u32,
    pub layers: Layers<'static, 1, 6, 5>,
    pub emitted: Vec<Emitted, 64>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            now: 0,
            layers: Layers::new(&KEYMAP, DEFAULT_LAYER),
            emitted: Vec::new(),
        }
    }

    pub fn set_time(&mut self, ms: u32) {
        self.now = ms;
    }

    pub fn taps(&self) -> impl Iterator<Item = Action> + '_ {
        self.emitted.iter().filter_map(|e| match e {
            Emitted::Tap(a) => Some(*a),
            _ => None,
        })
    }

    pub fn tap_count(&self) -> usize {
        self.taps().count()
    }

    /// A key event at `col` with the action the key resolves to right now
    pub fn key(&self, col: u8, pressed: bool) -> KeyEvent {
        let action = self.layers.resolve_active(KeyPos { row: 0, col });
        KeyEvent {
            pos: KeyPos { row: 0, col },
            action,
            pressed,
            time: Timestamp(self.now),
        }
    }
}

impl Clock for MockHost {
    fn now(&self) -> Timestamp {
        Timestamp(self.now)
    }
}

impl LayerStack for MockHost {
    fn is_layer_on(&self, layer: u8) -> bool {
        self.layers.is_layer_on(layer)
    }

    fn layer_on(&mut self, layer: u8) {
        self.layers.layer_on(layer)
    }

    fn layer_off(&mut self, layer: u8) {
        self.layers.layer_off(layer)
    }

    fn move_to(&mut self, layer: u8) {
        self.layers.move_to(layer)
    }

    fn resolve(&self, layer: u8, pos: KeyPos) -> Action {
        self.layers.resolve(layer, pos)
    }

    fn layer_mask(&self) -> u32 {
        self.layers.layer_mask()
    }
}

impl KeyEmitter for MockHost {
    fn tap(&mut self, action: Action) {
        self.emitted.push(Emitted::Tap(action)).unwrap();
    }

    fn press(&mut self, action: Action) {
        self.emitted.push(Emitted::Press(action)).unwrap();
    }

    fn release(&mut self, action: Action) {
        self.emitted.push(Emitted::Release(action)).unwrap();
    }
}

/// Transport failing the first `failures` sends, then recording the rest
pub struct MockTransport {
    pub failures: usize,
    pub sent: Vec<Vec<u8, 16>, 16>,
}

impl MockTransport {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            sent: Vec::new(),
        }
    }
}

impl SplitTransport for MockTransport {
    fn try_send(&mut self, data: &[u8]) -> bool {
        if self.failures > 0 {
            self.failures -= 1;
            return false;
        }
        self.sent.push(Vec::from_slice(data).unwrap()).unwrap();
        true
    }
}

/// Default config with layer numbers matching [`KEYMAP`]
pub fn test_config() -> ZqConfig {
    ZqConfig {
        mouse_layer: MouseLayerConfig::new(DEFAULT_LAYER, MOUSE_LAYER),
        ..Default::default()
    }
}

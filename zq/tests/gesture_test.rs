pub mod common;

use embassy_time::Duration;
use zq::action::Action;
use zq::config::AccumulatorReset;
use zq::event::{KeyPos, MotionSample};
use zq::gesture::{DirectionCodes, GesturePreset, GestureSlot, HostOs};
use zq::keycode::HidKeyCode;
use zq::layer::LayerStack;
use zq::modifier::ModifierCombination;
use zq::processor::TrackballController;
use zq::tap_hold::{HoldResolvable, TapHoldKey, TapHoldState};

use crate::common::*;

type Controller = TrackballController<2>;

const FORWARD: Action = Action::Key(HidKeyCode::Up);
const BACKWARD: Action = Action::Key(HidKeyCode::Down);
const LEFT: Action = Action::Key(HidKeyCode::Left);
const RIGHT: Action = Action::Key(HidKeyCode::Right);

fn controller() -> Controller {
    let mut controller = Controller::new(test_config());
    let codes = DirectionCodes {
        forward: FORWARD,
        backward: BACKWARD,
        left: LEFT,
        right: RIGHT,
    };
    controller
        .add_gesture(GestureSlot::new(GESTURE_TRIGGER, codes))
        .unwrap();
    controller
}

fn tick(controller: &mut Controller, host: &mut MockHost, ms: u32, sample: MotionSample) -> MotionSample {
    host.set_time(ms);
    let mut holds: [TapHoldKey; 0] = [];
    controller.process_motion(sample, host, &mut holds)
}

fn key(controller: &mut Controller, host: &mut MockHost, col: u8, pressed: bool, ms: u32) -> bool {
    host.set_time(ms);
    let event = host.key(col, pressed);
    controller.process_key(&event, host)
}

#[test]
fn test_hold_then_fire_once_per_crossing() {
    let mut controller = controller();
    let mut host = MockHost::new();

    // The trigger is consumed
    assert!(!key(&mut controller, &mut host, GESTURE_COL, true, 0));

    // Not qualified yet, motion goes to the cursor
    let out = tick(&mut controller, &mut host, 50, MotionSample::xy(60, 0));
    assert_eq!(out, MotionSample::xy(60, 0));

    // Qualified, motion before the hold is dropped
    tick(&mut controller, &mut host, 200, MotionSample::default());
    assert!(controller.gestures().is_holding());
    assert_eq!(controller.gestures().slots()[0].accum(), (0, 0));

    let out = tick(&mut controller, &mut host, 210, MotionSample::xy(60, 0));
    assert_eq!(out, MotionSample::default());
    assert_eq!(host.tap_count(), 0);

    tick(&mut controller, &mut host, 220, MotionSample::xy(50, 0));
    assert_eq!(host.taps().collect::<Vec<_>>(), vec![RIGHT]);

    // Refractory window, nothing fires even though the threshold is crossed again
    tick(&mut controller, &mut host, 250, MotionSample::xy(127, 0));
    tick(&mut controller, &mut host, 300, MotionSample::xy(0, -127));
    assert_eq!(host.tap_count(), 1);

    // Window over, x goes first
    tick(&mut controller, &mut host, 370, MotionSample::default());
    assert_eq!(host.taps().collect::<Vec<_>>(), vec![RIGHT, RIGHT]);
    tick(&mut controller, &mut host, 520, MotionSample::default());
    assert_eq!(host.taps().collect::<Vec<_>>(), vec![RIGHT, RIGHT, FORWARD]);

    // Release after a hold sends no tap
    assert!(!key(&mut controller, &mut host, GESTURE_COL, false, 600));
    assert_eq!(host.tap_count(), 3);
    assert!(!controller.gestures().is_holding());
}

#[test]
fn test_short_press_taps_regardless_of_motion() {
    let mut controller = controller();
    let mut host = MockHost::new();

    key(&mut controller, &mut host, GESTURE_COL, true, 0);
    for t in 1..20 {
        let out = tick(&mut controller, &mut host, t * 10, MotionSample::xy(-100, 100));
        assert_eq!(out.x, -100);
    }
    key(&mut controller, &mut host, GESTURE_COL, false, 199);
    assert_eq!(host.taps().collect::<Vec<_>>(), vec![GESTURE_TRIGGER]);
}

#[test]
fn test_release_in_same_tick_as_qualification() {
    let mut controller = controller();
    let mut host = MockHost::new();
    key(&mut controller, &mut host, GESTURE_COL, true, 0);
    tick(&mut controller, &mut host, 150, MotionSample::default());
    key(&mut controller, &mut host, GESTURE_COL, false, 230);
    assert_eq!(host.tap_count(), 0);
}

#[test]
fn test_each_direction() {
    let mut config = test_config();
    config.gesture.set_refractory(Duration::from_millis(0));
    let mut controller = Controller::new(config);
    let codes = DirectionCodes {
        forward: FORWARD,
        backward: BACKWARD,
        left: LEFT,
        right: RIGHT,
    };
    controller
        .add_gesture(GestureSlot::new(GESTURE_TRIGGER, codes))
        .unwrap();
    let mut host = MockHost::new();
    key(&mut controller, &mut host, GESTURE_COL, true, 0);
    tick(&mut controller, &mut host, 200, MotionSample::default());

    tick(&mut controller, &mut host, 210, MotionSample::xy(100, 0));
    tick(&mut controller, &mut host, 220, MotionSample::xy(-100, 0));
    tick(&mut controller, &mut host, 230, MotionSample::xy(0, -100));
    tick(&mut controller, &mut host, 240, MotionSample::xy(0, 100));
    assert_eq!(
        host.taps().collect::<Vec<_>>(),
        vec![RIGHT, LEFT, FORWARD, BACKWARD]
    );
}

#[test]
fn test_keep_remainder_policy() {
    let mut config = test_config();
    config
        .gesture
        .set_accumulator_reset(AccumulatorReset::KeepRemainder);
    config.gesture.set_refractory(Duration::from_millis(0));
    let mut controller = Controller::new(config);
    controller
        .add_gesture(GestureSlot::new(
            GESTURE_TRIGGER,
            DirectionCodes {
                right: RIGHT,
                ..DirectionCodes::NONE
            },
        ))
        .unwrap();
    let mut host = MockHost::new();
    key(&mut controller, &mut host, GESTURE_COL, true, 0);
    tick(&mut controller, &mut host, 200, MotionSample::default());

    tick(&mut controller, &mut host, 210, MotionSample::xy(120, 0));
    assert_eq!(controller.gestures().slots()[0].accum(), (20, 0));
    tick(&mut controller, &mut host, 220, MotionSample::xy(80, 0));
    assert_eq!(host.tap_count(), 2);
    assert_eq!(controller.gestures().slots()[0].accum(), (0, 0));
}

#[test]
fn test_held_gesture_blocks_mouse_layer() {
    let mut controller = controller();
    let mut host = MockHost::new();
    key(&mut controller, &mut host, GESTURE_COL, true, 0);
    tick(&mut controller, &mut host, 200, MotionSample::default());
    for t in 0..10 {
        tick(&mut controller, &mut host, 210 + t * 10, MotionSample::xy(40, 40));
    }
    assert!(!controller.mouse_layer().is_active());
    assert!(!host.is_layer_on(MOUSE_LAYER));
}

#[test]
fn test_motion_forces_pending_tap_hold() {
    let mut controller = controller();
    let mut host = MockHost::new();
    let mut tap_hold = [TapHoldKey::new(
        KeyPos { row: 0, col: TAP_HOLD_COL },
        TAP_HOLD_TAP,
        TAP_HOLD_HOLD,
        Duration::from_millis(200),
    )];

    host.set_time(0);
    let event = host.key(TAP_HOLD_COL, true);
    assert!(controller.process_key(&event, &mut host));
    tap_hold[0].process_key(&event, &mut host);
    assert!(tap_hold[0].is_pending_first_tap());

    // No motion, nothing happens
    host.set_time(10);
    controller.process_motion(MotionSample::default(), &mut host, &mut tap_hold);
    assert!(tap_hold[0].is_pending_first_tap());

    host.set_time(20);
    controller.process_motion(MotionSample::xy(1, 0), &mut host, &mut tap_hold);
    assert_eq!(tap_hold[0].state(), TapHoldState::Held);
    assert_eq!(host.emitted.as_slice(), &[Emitted::Press(TAP_HOLD_HOLD)]);

    host.set_time(50);
    let event = host.key(TAP_HOLD_COL, false);
    tap_hold[0].process_key(&event, &mut host);
    assert_eq!(
        host.emitted.as_slice(),
        &[Emitted::Press(TAP_HOLD_HOLD), Emitted::Release(TAP_HOLD_HOLD)]
    );
}

#[test]
fn test_motion_interrupt_disabled() {
    let mut config = test_config();
    config.gesture.set_interrupt_tap_hold(false);
    let mut controller = Controller::new(config);
    let mut host = MockHost::new();
    let mut tap_hold = TapHoldKey::new(
        KeyPos { row: 0, col: TAP_HOLD_COL },
        TAP_HOLD_TAP,
        TAP_HOLD_HOLD,
        Duration::from_millis(200),
    );
    let event = host.key(TAP_HOLD_COL, true);
    tap_hold.process_key(&event, &mut host);

    host.set_time(20);
    let mut holds: [&mut dyn HoldResolvable; 1] = [&mut tap_hold];
    controller.process_motion(MotionSample::xy(10, 10), &mut host, &mut holds);
    assert!(tap_hold.is_pending_first_tap());
    assert!(host.emitted.is_empty());
}

#[test]
fn test_preset_follows_host_os() {
    let mut controller = Controller::new(test_config());
    controller
        .add_gesture(GestureSlot::with_preset(
            GESTURE_TRIGGER,
            GesturePreset::Workspace,
            HostOs::Unsure,
        ))
        .unwrap();
    controller.gestures_mut().set_host_os(HostOs::MacOs);

    let mut host = MockHost::new();
    key(&mut controller, &mut host, GESTURE_COL, true, 0);
    tick(&mut controller, &mut host, 200, MotionSample::default());
    tick(&mut controller, &mut host, 210, MotionSample::xy(-100, 0));
    let ctrl = ModifierCombination::new().with_ctrl(true);
    assert_eq!(
        host.taps().collect::<Vec<_>>(),
        vec![Action::KeyWithModifier(HidKeyCode::Left, ctrl)]
    );
}

#[test]
fn test_non_trigger_keys_pass_through() {
    let mut controller = controller();
    let mut host = MockHost::new();
    assert!(key(&mut controller, &mut host, SHIFT_COL, true, 0));
    assert!(key(&mut controller, &mut host, SHIFT_COL, false, 10));
    assert!(host.emitted.is_empty());
}

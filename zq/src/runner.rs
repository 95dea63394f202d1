//! Async task driving a [`TrackballController`] from channels.

use embassy_futures::select::{Either, select};

use crate::channel::{KeyEventChannel, LayerReportChannel, MotionChannel, MouseReportChannel};
use crate::event::{KeyEvent, MotionSample};
use crate::host::Host;
use crate::host_report::LayerReport;
use crate::processor::TrackballController;
use crate::split::{SplitError, SplitTransport};
use crate::tap_hold::TapHoldKey;

/// Channels used by a [`ControllerRunner`]
pub struct RunnerChannels<'a> {
    /// Input, one sample per sensor tick
    pub motion: &'a MotionChannel,
    /// Input, every key event
    pub key_events: &'a KeyEventChannel,
    /// Output, motion left for the cursor and the wheel
    pub mouse_reports: &'a MouseReportChannel,
    /// Output, key events not consumed by the controller or a tap/hold key
    pub passthrough: &'a KeyEventChannel,
    /// Output, layer state for the companion tool
    pub layer_reports: &'a LayerReportChannel,
}

impl RunnerChannels<'static> {
    /// The crate's static channels
    pub fn statics() -> Self {
        use crate::channel::*;
        Self {
            motion: &MOTION_CHANNEL,
            key_events: &KEY_EVENT_CHANNEL,
            mouse_reports: &MOUSE_REPORT_CHANNEL,
            passthrough: &PASSTHROUGH_KEY_CHANNEL,
            layer_reports: &LAYER_REPORT_CHANNEL,
        }
    }
}

/// Runs the controller, one handler at a time.
///
/// ```text
/// +-------------------- loop --------------------+
/// ¦ motion.receive()        key_events.receive() ¦
/// ¦     ¦                         ¦              ¦
/// ¦     V                         V              ¦
/// ¦ process_motion()        process_key()        ¦
/// ¦     ¦                         ¦              ¦
/// ¦     +-> mouse_reports         +-> passthrough¦
/// ¦                 ¦                            ¦
/// ¦                 V                            ¦
/// ¦   layers changed? -> on_layer_change()       ¦
/// ¦                     -> layer_reports         ¦
/// ¦   sync_split()                               ¦
/// +----------------------------------------------+
/// ```
pub struct ControllerRunner<'a, H: Host, T: SplitTransport, const N: usize> {
    controller: &'a mut TrackballController<N>,
    host: &'a mut H,
    transport: &'a mut T,
    tap_holds: &'a mut [TapHoldKey],
    channels: RunnerChannels<'a>,
}

impl<'a, H: Host, T: SplitTransport, const N: usize> ControllerRunner<'a, H, T, N> {
    pub fn new(
        controller: &'a mut TrackballController<N>,
        host: &'a mut H,
        transport: &'a mut T,
        tap_holds: &'a mut [TapHoldKey],
        channels: RunnerChannels<'a>,
    ) -> Self {
        Self {
            controller,
            host,
            transport,
            tap_holds,
            channels,
        }
    }

    pub fn controller(&self) -> &TrackballController<N> {
        &*self.controller
    }

    pub async fn run(&mut self) -> ! {
        info!("Trackball controller started");
        loop {
            self.run_once().await;
        }
    }

    /// Wait for one input and handle it
    pub async fn run_once(&mut self) {
        match select(self.channels.motion.receive(), self.channels.key_events.receive()).await {
            Either::First(sample) => self.handle_motion(sample).await,
            Either::Second(event) => self.handle_key(event).await,
        }
    }

    async fn handle_motion(&mut self, sample: MotionSample) {
        let before = self.host.layer_mask();
        let now = self.host.now();
        for key in self.tap_holds.iter_mut() {
            key.tick(now, &mut *self.host);
        }
        let sample = self
            .controller
            .process_motion(sample, &mut *self.host, &mut *self.tap_holds);
        if !sample.is_zero() {
            self.channels.mouse_reports.send(sample.to_mouse_report(0)).await;
        }
        self.after_handler(before).await;
    }

    async fn handle_key(&mut self, event: KeyEvent) {
        let before = self.host.layer_mask();
        for key in self.tap_holds.iter_mut() {
            key.tick(event.time, &mut *self.host);
        }
        if self.controller.process_key(&event, &mut *self.host) {
            let claimed = self
                .tap_holds
                .iter_mut()
                .any(|key| key.process_key(&event, &mut *self.host));
            if !claimed {
                self.channels.passthrough.send(event).await;
            }
        }
        self.after_handler(before).await;
    }

    async fn after_handler(&mut self, before: u32) {
        let after = self.host.layer_mask();
        if after != before {
            debug!("Layer mask changed: {:#x} -> {:#x}", before, after);
            self.controller.on_layer_change(after);
            let report = LayerReport::from_layer_mask(after).encode();
            if self.channels.layer_reports.try_send(report).is_err() {
                warn!("Layer report channel full, dropping report");
            }
        }
        match self.controller.sync_split(&mut *self.transport) {
            Ok(_) | Err(SplitError::SendFailed) => (),
            Err(e) => error!("Split sync error: {:?}", e),
        }
    }
}

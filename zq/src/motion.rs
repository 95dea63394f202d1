//! Motion accumulation toward the mouse layer activation threshold.

use crate::event::MotionSample;

/// Result of feeding one sample into the [`MotionAccumulator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionResult {
    /// The sample carried no motion, nothing changed
    NoMotion,
    /// Motion was added, threshold not reached yet
    Accumulated,
    /// The running total reached the threshold and was reset
    ThresholdCrossed,
}

/// Bucket that fills with motion magnitude and empties only when it overflows.
///
/// There is no decay over time: small movements spread over minutes still
/// add up until the threshold is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionAccumulator {
    accum: u16,
}

impl MotionAccumulator {
    pub const fn new() -> Self {
        Self { accum: 0 }
    }

    pub fn value(&self) -> u16 {
        self.accum
    }

    pub fn reset(&mut self) {
        self.accum = 0;
    }

    /// Add the magnitude of `sample`, report a crossing at most once per `threshold`
    pub fn feed(&mut self, sample: &MotionSample, threshold: u16) -> MotionResult {
        let delta = sample.magnitude();
        if delta == 0 {
            return MotionResult::NoMotion;
        }
        self.accum = self.accum.saturating_add(delta);
        if self.accum >= threshold {
            self.accum = 0;
            MotionResult::ThresholdCrossed
        } else {
            MotionResult::Accumulated
        }
    }
}

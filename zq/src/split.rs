//! State sync from the master half to the other half.
//!
//! The other half only needs the latest state, so updates overwrite each other
//! and the newest one is retried until the transport accepts it.

use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

/// Maximum size of a serialized split message
pub const SPLIT_MESSAGE_MAX_SIZE: usize = SplitState::POSTCARD_MAX_SIZE;

/// Summary of the master's state mirrored on the other half
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SplitState {
    /// Engaged layers, bit N for layer N
    pub layer_mask: u32,
    /// Whether the display is inverted, follows scroll mode
    pub inverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SplitError {
    SerializeError,
    DeserializeError,
    /// The transport did not accept the message, it will be retried
    SendFailed,
}

/// Best-effort link to the other half
pub trait SplitTransport {
    /// Try to send `data` right now, returns false if it was not accepted
    fn try_send(&mut self, data: &[u8]) -> bool;
}

pub fn encode_split_state<'a>(state: &SplitState, buf: &'a mut [u8]) -> Result<&'a [u8], SplitError> {
    postcard::to_slice(state, buf)
        .map(|bytes| &*bytes)
        .map_err(|_| SplitError::SerializeError)
}

pub fn decode_split_state(data: &[u8]) -> Result<SplitState, SplitError> {
    postcard::from_bytes(data).map_err(|_| SplitError::DeserializeError)
}

/// Last-value-wins sender of [`SplitState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitSync {
    state: SplitState,
    /// The other half has not seen `state` yet
    dirty: bool,
}

impl SplitSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SplitState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_layer_mask(&mut self, layer_mask: u32) {
        self.update(SplitState { layer_mask, ..self.state });
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.update(SplitState { inverted, ..self.state });
    }

    /// Replace the pending state, marking it for sending if it changed
    pub fn update(&mut self, state: SplitState) {
        if state != self.state {
            self.state = state;
            self.dirty = true;
        }
    }

    /// Send the pending state if there is one.
    ///
    /// Returns `Ok(true)` when a message was sent, `Ok(false)` when there was
    /// nothing to send. On `Err(SplitError::SendFailed)` the state stays
    /// pending and the next call tries again.
    pub fn sync<T: SplitTransport>(&mut self, transport: &mut T) -> Result<bool, SplitError> {
        if !self.dirty {
            return Ok(false);
        }
        let mut buf = [0u8; SPLIT_MESSAGE_MAX_SIZE];
        let bytes = encode_split_state(&self.state, &mut buf)?;
        if transport.try_send(bytes) {
            trace!("Split state sent: {:?}", self.state);
            self.dirty = false;
            Ok(true)
        } else {
            warn!("Failed to send split state, retrying later");
            Err(SplitError::SendFailed)
        }
    }
}

//! Layer stack and keymap lookup.

use zq_types::action::Action;

use crate::event::KeyPos;

/// Layer-stack control and static keymap lookup consumed by the core.
pub trait LayerStack {
    /// Whether the given layer is currently engaged
    fn is_layer_on(&self, layer: u8) -> bool;

    /// Engage an overlay layer on top of the current stack
    fn layer_on(&mut self, layer: u8);

    /// Disengage a layer
    fn layer_off(&mut self, layer: u8);

    /// Disengage every layer and engage only `layer`
    fn move_to(&mut self, layer: u8);

    /// The action stored at `pos` on `layer`, transparent entries are returned as-is
    fn resolve(&self, layer: u8, pos: KeyPos) -> Action;

    /// Bitmask of engaged layers, bit N for layer N
    fn layer_mask(&self) -> u32;

    /// Highest engaged layer
    fn highest_layer(&self) -> u8 {
        let mask = self.layer_mask();
        if mask == 0 { 0 } else { (31 - mask.leading_zeros()) as u8 }
    }
}

/// Keymap with a simple layer stack.
///
/// `ROW`/`COL` are the matrix size, `NUM_LAYER` the number of layers in the keymap.
pub struct Layers<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    keymap: &'a [[[Action; COL]; ROW]; NUM_LAYER],
    layer_state: [bool; NUM_LAYER],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Layers<'a, ROW, COL, NUM_LAYER> {
    pub fn new(keymap: &'a [[[Action; COL]; ROW]; NUM_LAYER], default_layer: u8) -> Self {
        let mut layer_state = [false; NUM_LAYER];
        if (default_layer as usize) < NUM_LAYER {
            layer_state[default_layer as usize] = true;
        }
        Self { keymap, layer_state }
    }

    /// Resolve `pos` through the engaged layers from the top, skipping transparent entries.
    pub fn resolve_active(&self, pos: KeyPos) -> Action {
        for layer in (0..NUM_LAYER).rev() {
            if !self.layer_state[layer] {
                continue;
            }
            match self.resolve(layer as u8, pos) {
                Action::Transparent => continue,
                action => return action,
            }
        }
        Action::No
    }

    fn check_layer(layer: u8) -> bool {
        if layer as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer, NUM_LAYER
            );
            return false;
        }
        true
    }
}

impl<const ROW: usize, const COL: usize, const NUM_LAYER: usize> LayerStack for Layers<'_, ROW, COL, NUM_LAYER> {
    fn is_layer_on(&self, layer: u8) -> bool {
        (layer as usize) < NUM_LAYER && self.layer_state[layer as usize]
    }

    fn layer_on(&mut self, layer: u8) {
        if Self::check_layer(layer) {
            self.layer_state[layer as usize] = true;
        }
    }

    fn layer_off(&mut self, layer: u8) {
        if Self::check_layer(layer) {
            self.layer_state[layer as usize] = false;
        }
    }

    fn move_to(&mut self, layer: u8) {
        if Self::check_layer(layer) {
            self.layer_state = [false; NUM_LAYER];
            self.layer_state[layer as usize] = true;
        }
    }

    fn resolve(&self, layer: u8, pos: KeyPos) -> Action {
        self.keymap
            .get(layer as usize)
            .and_then(|l| l.get(pos.row as usize))
            .and_then(|r| r.get(pos.col as usize))
            .copied()
            .unwrap_or(Action::No)
    }

    fn layer_mask(&self) -> u32 {
        self.layer_state
            .iter()
            .enumerate()
            .take(32)
            .fold(0, |mask, (i, on)| if *on { mask | (1 << i) } else { mask })
    }
}

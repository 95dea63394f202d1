//! Layer state report for the desktop companion tool.
//!
//! Sent over the raw HID interface whenever the engaged layers change. The
//! message is a fixed 32-byte frame:
//!
//! | byte | content |
//! | --- | --- |
//! | 0 | app id, `0xFF` |
//! | 1 | report version, `0x01` |
//! | 2 | message type, `0x00` for layer state |
//! | 3 | highest engaged layer |
//! | 4 | mask of engaged layers 0-7 |
//! | 5.. | zero |

pub const RAW_APP_ID: u8 = 0xFF;
pub const RAW_REPORT_VERSION: u8 = 0x01;
pub const RAW_REPORT_SIZE: usize = 32;

/// Message types of the raw report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RawMessageType {
    LayerState = 0x00,
}

/// Active layer summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerReport {
    pub version: u8,
    pub highest_layer: u8,
    /// Layers 0-7 only, higher layers are not reported
    pub mask: u8,
}

impl LayerReport {
    /// Build a report from a full layer mask
    pub fn from_layer_mask(layer_mask: u32) -> Self {
        let highest_layer = if layer_mask == 0 {
            0
        } else {
            (31 - layer_mask.leading_zeros()) as u8
        };
        Self {
            version: RAW_REPORT_VERSION,
            highest_layer,
            mask: (layer_mask & 0xFF) as u8,
        }
    }

    pub fn encode(&self) -> [u8; RAW_REPORT_SIZE] {
        let mut buf = [0u8; RAW_REPORT_SIZE];
        buf[0] = RAW_APP_ID;
        buf[1] = self.version;
        buf[2] = RawMessageType::LayerState as u8;
        buf[3] = self.highest_layer;
        buf[4] = self.mask;
        buf
    }

    /// Parse a received frame, anything that is not a layer report is dropped
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 5 {
            return None;
        }
        if data[0] != RAW_APP_ID || data[1] != RAW_REPORT_VERSION || data[2] != RawMessageType::LayerState as u8 {
            return None;
        }
        Some(Self {
            version: data[1],
            highest_layer: data[3],
            mask: data[4],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let report = LayerReport::from_layer_mask(0b1_0001);
        assert_eq!(report.highest_layer, 4);
        let buf = report.encode();
        assert_eq!(&buf[..5], &[0xFF, 0x01, 0x00, 4, 0b1_0001]);
        assert!(buf[5..].iter().all(|b| *b == 0));
        assert_eq!(LayerReport::parse(&buf), Some(report));
    }

    #[test]
    fn test_high_layers_not_in_mask() {
        let report = LayerReport::from_layer_mask(1 << 9 | 1);
        assert_eq!(report.highest_layer, 9);
        assert_eq!(report.mask, 1);
        assert_eq!(LayerReport::from_layer_mask(0).highest_layer, 0);
    }

    #[test]
    fn test_parse_rejects_foreign_frames() {
        assert_eq!(LayerReport::parse(&[0xFF, 0x01, 0x00, 1]), None);
        assert_eq!(LayerReport::parse(&[0xFE, 0x01, 0x00, 1, 1]), None);
        assert_eq!(LayerReport::parse(&[0xFF, 0x02, 0x00, 1, 1]), None);
        assert_eq!(LayerReport::parse(&[0xFF, 0x01, 0x03, 1, 1]), None);
        // Short frames without padding are fine
        assert_eq!(
            LayerReport::parse(&[0xFF, 0x01, 0x00, 2, 0b101]),
            Some(LayerReport {
                version: 1,
                highest_layer: 2,
                mask: 0b101
            })
        );
    }
}

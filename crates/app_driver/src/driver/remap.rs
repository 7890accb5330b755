//! Conversion between protocol levels and device levels.
//!
//! The mapping is linear with rounding, so it is lossy: 254 protocol steps
//! collapse onto 101 device steps and a round trip may land one step away.

use crate::data_model::cluster::level_control;

/// Highest protocol (Matter CurrentLevel) value
pub const MATTER_BRIGHTNESS: u8 = level_control::MAX_LEVEL;
/// Highest device (LED driver) value
pub const STANDARD_BRIGHTNESS: u8 = 100;

/// Scale `value` from `0..=from_max` onto `0..=to_max`, rounding to nearest.
///
/// Values above `from_max` are clamped to it first.
pub fn remap_to_range(value: u32, from_max: u32, to_max: u32) -> u32 {
    if from_max == 0 {
        return 0;
    }
    let value = u64::from(value.min(from_max));
    let (from_max, to_max) = (u64::from(from_max), u64::from(to_max));
    ((value * to_max + from_max / 2) / from_max) as u32
}

pub fn to_device_level(protocol_level: u8) -> u8 {
    remap_to_range(
        protocol_level.into(),
        MATTER_BRIGHTNESS.into(),
        STANDARD_BRIGHTNESS.into(),
    ) as u8
}

pub fn to_protocol_level(device_level: u8) -> u8 {
    remap_to_range(
        device_level.into(),
        STANDARD_BRIGHTNESS.into(),
        MATTER_BRIGHTNESS.into(),
    ) as u8
}

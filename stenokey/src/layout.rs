// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Physical layout of the sensor matrix.
//!
//! Each of the 4 analog inputs sits behind its own 8-channel multiplexer, so a sensor address is
//! `channel + 8 * input`:
//!
//! ```text
//! address  0  1  2  3  4  5  6  7 | 8  9  10 11 12 13 14 15 | 16 17 18 19 20 21 22 23 | 24 25 26 27
//! key      S- S- #  T- K- .  P- W-| A  H- R- O  *  *  E  F- | -R -U -P -B -L -G .  -T | -S #  -D -Z
//! ```
//!
//! Addresses 5, 22, 25 and 28..=31 are not wired on the current board.

use crate::bitmap::KeyBitmap;

/// Number of addressable sensors.
pub const SENSOR_COUNT: usize = 32;

/// Channels per multiplexer.
pub const MUX_CHANNELS: usize = 8;

/// Analog inputs, one per multiplexer.
pub const ANALOG_INPUTS: usize = 4;

/// Sensors that are physically wired.
pub const DEFAULT_MASK: KeyBitmap = KeyBitmap::from_bits(0x0DBF_FFDF);

/// Human-readable name of every address, as spelled back in calibration error reports.
pub const KEY_NAMES: [&str; SENSOR_COUNT] = [
    "S1", "S2", "#", "T", "K", "x5", "P", "W", // input 0
    "A", "H", "R", "O", "*1", "*2", "E", "F", // input 1
    "-R", "-U", "-P", "-B", "-L", "-G", "x22", "-T", // input 2
    "-S", "#2", "-D", "-Z", "x28", "x29", "x30", "x31", // input 3
];

/// Sensor address read on `channel` of the multiplexer feeding analog `input`.
#[inline]
pub const fn address(channel: usize, input: usize) -> usize {
    channel + MUX_CHANNELS * input
}

/// Name of a sensor address.
#[inline]
pub fn key_name(addr: usize) -> &'static str {
    KEY_NAMES.get(addr).copied().unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_cover_all_sensors_once() {
        let mut seen = KeyBitmap::EMPTY;
        for channel in 0..MUX_CHANNELS {
            for input in 0..ANALOG_INPUTS {
                let addr = address(channel, input);
                assert!(!seen.is_set(addr), "address {addr} produced twice");
                seen.set(addr);
            }
        }
        assert_eq!(seen.count() as usize, SENSOR_COUNT);
    }

    #[test]
    fn default_mask_skips_unwired_positions() {
        assert_eq!(DEFAULT_MASK.count(), 25);
        for addr in [5, 22, 25, 28, 29, 30, 31] {
            assert!(!DEFAULT_MASK.is_set(addr), "{} should not be wired", key_name(addr));
        }
        assert!(DEFAULT_MASK.is_set(0));
        assert!(DEFAULT_MASK.is_set(27));
    }
}

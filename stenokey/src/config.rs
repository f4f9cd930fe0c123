// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Static keyboard configuration.
//!
//! Everything here is fixed at build time. Only the calibration pair (zero, max) ever changes at
//! runtime, and its defaults live here too.

use thiserror::Error;

use crate::bitmap::KeyBitmap;
use crate::calibration::Calibration;
use crate::layout::{DEFAULT_MASK, SENSOR_COUNT};

/// Factory resting reading for every sensor.
pub const DEFAULT_ZERO: u16 = 32913;
/// Factory fully-pressed reading for every sensor.
pub const DEFAULT_MAX: u16 = 51227;

/// Default press threshold on the normalized 0..=255 scale.
pub const DEFAULT_THRESH_HIGH: u8 = 128;
/// Default release threshold on the normalized 0..=255 scale.
pub const DEFAULT_THRESH_LOW: u8 = 100;

/// Smallest raw distance between resting and pressed readings for a key to count as calibrated.
pub const DEFAULT_MIN_DEFLECTION: u16 = 2048;

/// Delays and durations used by the main loop and the calibration procedure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Multiplexer settle time with inhibit asserted (µs).
    pub mux_settle_us: u32,
    /// How long the calibration button must be held to capture resting values (ms).
    pub dwell_ms: u32,
    /// Anti-bounce delay around calibration button transitions (ms).
    pub debounce_ms: u32,
    /// Minimum spacing between two chord packets (ms).
    pub packet_spacing_ms: u32,
    /// Poll interval while waiting for the calibration button to be released (ms).
    pub button_poll_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            mux_settle_us: 1_000,
            dwell_ms: 2_000,
            debounce_ms: 100,
            packet_spacing_ms: 100,
            button_poll_ms: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Addresses that are physically wired.
    pub mask: KeyBitmap,
    /// Per-address press thresholds.
    pub thresh_high: [u8; SENSOR_COUNT],
    /// Per-address release thresholds, each strictly below its press threshold.
    pub thresh_low: [u8; SENSOR_COUNT],
    /// Calibration used when nothing is stored and after a factory reset.
    pub default_calibration: Calibration,
    /// Minimum raw deflection required for every masked key during calibration.
    pub min_deflection: u16,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mask: DEFAULT_MASK,
            thresh_high: [DEFAULT_THRESH_HIGH; SENSOR_COUNT],
            thresh_low: [DEFAULT_THRESH_LOW; SENSOR_COUNT],
            default_calibration: Calibration::uniform(DEFAULT_ZERO, DEFAULT_MAX),
            min_deflection: DEFAULT_MIN_DEFLECTION,
            timing: Timing::default(),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("address {address}: release threshold {low} is not below press threshold {high}")]
    Hysteresis { address: usize, low: u8, high: u8 },
    #[error("minimum calibration deflection must be non-zero")]
    ZeroDeflection,
}

impl Config {
    /// Check the invariants the rest of the firmware relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_deflection == 0 {
            return Err(ConfigError::ZeroDeflection);
        }
        for address in self.mask.iter() {
            let (low, high) = (self.thresh_low[address], self.thresh_high[address]);
            if low >= high {
                return Err(ConfigError::Hysteresis { address, low, high });
            }
        }
        Ok(())
    }
}

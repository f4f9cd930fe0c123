// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Sensor Calibration
//!
//! Hall-effect sensors differ in their resting output and in which way the reading moves when
//! the magnet approaches, so every address gets its own (zero, max) pair.
//!
//! ## Procedure
//!
//! 1. **Resting capture**: the user holds the calibration button without touching any key. The
//!    lowest and highest reading of every sensor are tracked to absorb jitter. Releasing the
//!    button before the dwell time aborts.
//! 2. **Pressed capture**: the user presses every key all the way down once, then presses the
//!    calibration button again. For each sensor the reading farthest from rest is kept.
//! 3. **Validate**: every wired key must have moved by at least the minimum deflection. One bad
//!    key rejects the whole attempt and the previous calibration stays in place.
//!
//! [`Calibrator`] is the pure state machine. The blocking driver that scans, blinks the
//! indicator, talks to the user and persists the result lives in
//! [`Keyboard::calibrate`](crate::keyboard::Keyboard::calibrate).
//!
//! ## Modules
//!
//! - [`store`] - Persistent storage of the calibration record on NOR flash.

pub mod store;

pub use store::{CalibrationStore, FlashStore, StorageError};

use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

use crate::bitmap::KeyBitmap;
use crate::layout::SENSOR_COUNT;

/// Per-address reference readings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, MaxSize)]
pub struct Calibration {
    /// Resting (unpressed) reading.
    pub zero: [u16; SENSOR_COUNT],
    /// Fully pressed reading, on either side of `zero`.
    pub max: [u16; SENSOR_COUNT],
}

impl Calibration {
    /// Same pair for every address.
    pub const fn uniform(zero: u16, max: u16) -> Self {
        Self {
            zero: [zero; SENSOR_COUNT],
            max: [max; SENSOR_COUNT],
        }
    }

    /// Raw distance between the resting and pressed references of `addr`.
    #[inline]
    pub fn range(&self, addr: usize) -> u16 {
        self.max[addr].abs_diff(self.zero[addr])
    }

    /// Masked addresses whose range is zero and therefore can never be pressed.
    pub fn degenerate(&self, mask: KeyBitmap) -> KeyBitmap {
        let mut bad = KeyBitmap::EMPTY;
        for addr in mask.iter().filter(|&addr| self.range(addr) == 0) {
            bad.set(addr);
        }
        bad
    }
}

/// Current phase of the procedure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Button held; capturing resting values since `started_ms`.
    Resting { started_ms: u32 },
    /// Button released; waiting for every key to be pressed.
    Pressed,
}

/// What a single [`Calibrator::step`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalibrationEvent {
    /// Still capturing.
    Capturing,
    /// Button released before the dwell time; nothing changed.
    Aborted,
    /// Resting values captured; the user should now press every key.
    RestingCaptured,
    /// Button pressed again; the capture is complete and validated.
    Finished(Result<Calibration, KeyBitmap>),
}

/// Indicator blink period while capturing resting values (2^6 ms half period).
const FAST_BLINK_SHIFT: u32 = 6;
/// Indicator blink period while capturing pressed values (2^8 ms half period).
const SLOW_BLINK_SHIFT: u32 = 8;

pub struct Calibrator {
    mask: KeyBitmap,
    dwell_ms: u32,
    min_deflection: u16,
    phase: Phase,
    base: Calibration,
    rest_min: [u16; SENSOR_COUNT],
    rest_max: [u16; SENSOR_COUNT],
    pressed: [u16; SENSOR_COUNT],
}

impl Calibrator {
    pub fn new(mask: KeyBitmap, dwell_ms: u32, min_deflection: u16) -> Self {
        Self {
            mask,
            dwell_ms,
            min_deflection,
            phase: Phase::Idle,
            base: Calibration::uniform(0, 0),
            rest_min: [u16::MAX; SENSOR_COUNT],
            rest_max: [0; SENSOR_COUNT],
            pressed: [0; SENSOR_COUNT],
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Begin resting capture. Unmasked addresses of the result are copied from `current`.
    pub fn start(&mut self, now_ms: u32, current: &Calibration) {
        self.base = current.clone();
        self.rest_min = [u16::MAX; SENSOR_COUNT];
        self.rest_max = [0; SENSOR_COUNT];
        self.pressed = [0; SENSOR_COUNT];
        self.phase = Phase::Resting { started_ms: now_ms };
    }

    /// Advance with the latest button state and raw readings.
    pub fn step(
        &mut self,
        now_ms: u32,
        button_held: bool,
        readings: &[u16; SENSOR_COUNT],
    ) -> CalibrationEvent {
        match self.phase {
            Phase::Idle => CalibrationEvent::Capturing,

            Phase::Resting { started_ms } => {
                if button_held {
                    for addr in self.mask.iter() {
                        self.rest_min[addr] = self.rest_min[addr].min(readings[addr]);
                        self.rest_max[addr] = self.rest_max[addr].max(readings[addr]);
                    }
                    return CalibrationEvent::Capturing;
                }

                if now_ms.wrapping_sub(started_ms) < self.dwell_ms {
                    self.phase = Phase::Idle;
                    return CalibrationEvent::Aborted;
                }
                self.pressed = self.rest_min;
                self.phase = Phase::Pressed;
                CalibrationEvent::RestingCaptured
            }

            Phase::Pressed => {
                if !button_held {
                    for addr in self.mask.iter() {
                        let rest = self.rest_min[addr];
                        if readings[addr].abs_diff(rest) > self.pressed[addr].abs_diff(rest) {
                            self.pressed[addr] = readings[addr];
                        }
                    }
                    return CalibrationEvent::Capturing;
                }

                self.phase = Phase::Idle;
                CalibrationEvent::Finished(self.finish())
            }
        }
    }

    /// Indicator state for the current phase: fast blink during the dwell time, then dark;
    /// slow blink while waiting for key presses.
    pub fn indicator(&self, now_ms: u32) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Resting { started_ms } => {
                now_ms.wrapping_sub(started_ms) < self.dwell_ms
                    && (now_ms >> FAST_BLINK_SHIFT) & 1 == 1
            }
            Phase::Pressed => (now_ms >> SLOW_BLINK_SHIFT) & 1 == 1,
        }
    }

    /// Pick the resting reference matching each key's polarity and validate the deflection.
    fn finish(&self) -> Result<Calibration, KeyBitmap> {
        let mut result = self.base.clone();
        let mut failed = KeyBitmap::EMPTY;

        for addr in self.mask.iter() {
            let pressed = self.pressed[addr];
            let zero = if pressed < self.rest_min[addr] {
                self.rest_min[addr]
            } else {
                self.rest_max[addr]
            };
            if pressed.abs_diff(zero) < self.min_deflection {
                failed.set(addr);
            }
            result.zero[addr] = zero;
            result.max[addr] = pressed;
        }

        if failed.is_empty() {
            Ok(result)
        } else {
            Err(failed)
        }
    }
}

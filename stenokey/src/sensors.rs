// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sensor matrix scanning and normalization.
//!
//! One scan walks the 8 multiplexer channels and samples the 4 analog inputs on each, giving a
//! raw 16-bit reading for every wired address. Each reading is then mapped onto 0..=255 using the
//! per-address calibration pair, where 0 is the resting position and 255 is fully pressed.

use embedded_hal::delay::DelayNs;

use crate::bitmap::KeyBitmap;
use crate::calibration::Calibration;
use crate::hw::{AdcRead, MuxSelect};
use crate::layout::{address, ANALOG_INPUTS, MUX_CHANNELS, SENSOR_COUNT};

/// Map a raw reading onto 0..=255.
///
/// `|raw - zero| * 255 / |max - zero|`, clamped to 255. Works for either magnet polarity. A
/// degenerate calibration (`max == zero`) reads as 0, i.e. the key stays released.
pub fn normalize(raw: u16, zero: u16, max: u16) -> u8 {
    let range = u32::from(max.abs_diff(zero));
    if range == 0 {
        return 0;
    }
    let scaled = u32::from(raw.abs_diff(zero)) * 255 / range;
    scaled.min(255) as u8
}

pub struct SensorMatrix<MUX, ADC> {
    mux: MUX,
    adc: ADC,
    mask: KeyBitmap,
    calibration: Calibration,
    readings: [u16; SENSOR_COUNT],
    output: [u8; SENSOR_COUNT],
    prev_output: [u8; SENSOR_COUNT],
}

impl<MUX, ADC> SensorMatrix<MUX, ADC>
where
    MUX: MuxSelect,
    ADC: AdcRead,
{
    pub fn new(mux: MUX, adc: ADC, mask: KeyBitmap, calibration: Calibration) -> Self {
        Self {
            mux,
            adc,
            mask,
            calibration,
            readings: [0; SENSOR_COUNT],
            output: [0; SENSOR_COUNT],
            prev_output: [0; SENSOR_COUNT],
        }
    }

    /// Read and normalize every masked address.
    ///
    /// Unmasked addresses keep their previous values. Returns true if any masked normalized
    /// value differs from the previous scan.
    pub fn scan<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        core::mem::swap(&mut self.output, &mut self.prev_output);
        self.output = self.prev_output;

        let mut changed = false;
        for channel in 0..MUX_CHANNELS {
            self.mux.select(channel as u8, delay);
            for input in 0..ANALOG_INPUTS {
                let addr = address(channel, input);
                if !self.mask.is_set(addr) {
                    continue;
                }
                let raw = self.adc.read_channel(input as u8);
                self.readings[addr] = raw;

                let value = normalize(
                    raw,
                    self.calibration.zero[addr],
                    self.calibration.max[addr],
                );
                self.output[addr] = value;
                changed |= value != self.prev_output[addr];
            }
        }
        changed
    }

    /// Raw 16-bit readings from the latest scan.
    #[inline]
    pub fn readings(&self) -> &[u16; SENSOR_COUNT] {
        &self.readings
    }

    /// Normalized values from the latest scan.
    #[inline]
    pub fn output(&self) -> &[u8; SENSOR_COUNT] {
        &self.output
    }

    /// Normalized values from the scan before the latest one.
    #[inline]
    pub fn prev_output(&self) -> &[u8; SENSOR_COUNT] {
        &self.prev_output
    }

    #[inline]
    pub fn mask(&self) -> KeyBitmap {
        self.mask
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Adopt a new calibration; takes effect on the next scan.
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    /// Zero all reading and output buffers.
    pub fn clear(&mut self) {
        self.readings = [0; SENSOR_COUNT];
        self.output = [0; SENSOR_COUNT];
        self.prev_output = [0; SENSOR_COUNT];
    }

    pub fn free(self) -> (MUX, ADC) {
        (self.mux, self.adc)
    }
}

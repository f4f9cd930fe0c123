// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Press/release detection and stroke accumulation.
//!
//! Each address runs its own Schmitt trigger on the normalized value: it presses above
//! `thresh_high`, releases below `thresh_low`, and holds its state in between.
//!
//! A stroke is the union of every key pressed since the last time all keys were up. It is
//! complete when the last key is released, so keys lifted early in a chord still count.

use crate::bitmap::KeyBitmap;
use crate::layout::SENSOR_COUNT;

/// Outcome of one [`KeyState::update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// Pressed set is the same as before.
    Unchanged,
    /// Pressed set changed and at least one key is still down.
    Changed,
    /// Last key released; the finished stroke is handed over for emission.
    Stroke(KeyBitmap),
}

impl KeyEvent {
    /// Whether the pressed bitmap changed.
    #[inline]
    pub fn changed(self) -> bool {
        !matches!(self, KeyEvent::Unchanged)
    }
}

/// Single-address hysteresis step.
#[inline]
pub fn hysteresis(pressed: bool, value: u8, thresh_high: u8, thresh_low: u8) -> bool {
    if pressed {
        value >= thresh_low
    } else {
        value > thresh_high
    }
}

pub struct KeyState {
    mask: KeyBitmap,
    thresh_high: [u8; SENSOR_COUNT],
    thresh_low: [u8; SENSOR_COUNT],
    pressed: KeyBitmap,
    prev_pressed: KeyBitmap,
    stroke: KeyBitmap,
}

impl KeyState {
    pub fn new(
        mask: KeyBitmap,
        thresh_high: [u8; SENSOR_COUNT],
        thresh_low: [u8; SENSOR_COUNT],
    ) -> Self {
        Self {
            mask,
            thresh_high,
            thresh_low,
            pressed: KeyBitmap::EMPTY,
            prev_pressed: KeyBitmap::EMPTY,
            stroke: KeyBitmap::EMPTY,
        }
    }

    /// Re-evaluate every masked address against `output`.
    pub fn update(&mut self, output: &[u8; SENSOR_COUNT]) -> KeyEvent {
        self.prev_pressed = self.pressed;

        for addr in self.mask.iter() {
            let now = hysteresis(
                self.pressed.is_set(addr),
                output[addr],
                self.thresh_high[addr],
                self.thresh_low[addr],
            );
            if now {
                self.pressed.set(addr);
            } else {
                self.pressed.clear(addr);
            }
        }

        if self.pressed == self.prev_pressed {
            return KeyEvent::Unchanged;
        }

        if self.pressed.is_empty() {
            let stroke = self.stroke;
            self.stroke = KeyBitmap::EMPTY;
            KeyEvent::Stroke(stroke)
        } else {
            self.stroke |= self.pressed;
            KeyEvent::Changed
        }
    }

    /// Keys currently judged pressed.
    #[inline]
    pub fn pressed(&self) -> KeyBitmap {
        self.pressed
    }

    /// Pressed set before the latest update.
    #[inline]
    pub fn prev_pressed(&self) -> KeyBitmap {
        self.prev_pressed
    }

    /// Chord accumulated so far.
    #[inline]
    pub fn stroke(&self) -> KeyBitmap {
        self.stroke
    }

    /// Forget pressed keys and any partial stroke.
    pub fn reset(&mut self) {
        self.pressed = KeyBitmap::EMPTY;
        self.prev_pressed = KeyBitmap::EMPTY;
        self.stroke = KeyBitmap::EMPTY;
    }

    /// Replace the thresholds and forget all key state.
    pub fn set_thresholds(
        &mut self,
        thresh_high: [u8; SENSOR_COUNT],
        thresh_low: [u8; SENSOR_COUNT],
    ) {
        self.thresh_high = thresh_high;
        self.thresh_low = thresh_low;
        self.reset();
    }
}

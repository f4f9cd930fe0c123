// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hardware seams.
//!
//! Digital pins and delays come from `embedded-hal` 1.0. The analog front end and the
//! millisecond clock are small crate traits so the board crate can plug in whatever its HAL
//! offers.

pub mod button;
pub mod indicator;
pub mod mux;

pub use button::CalibrationButton;
pub use indicator::{ActiveLevel, Indicator};
pub use mux::{AddressBus, MuxSelect};

/// Trait for reading one of the analog inputs behind the multiplexers.
///
/// `input` is the analog input index (0..4). Implementations return the reading scaled to the
/// full 16-bit range, whatever the converter's native resolution.
pub trait AdcRead {
    fn read_channel(&mut self, input: u8) -> u16;
}

/// Free-running millisecond counter. Wraps around after ~49 days.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

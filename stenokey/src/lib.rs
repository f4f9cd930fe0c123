// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # StenoKey Firmware Core
//!
//! Hardware-independent core of a chorded steno keyboard built from 32 analog Hall-effect
//! sensors behind an 8-channel multiplexer. The board-specific crate (`stenokey-firmware`) wires
//! real STM32 peripherals into the traits used here.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Multiplexer address bus, calibration button, status indicators, ADC/clock seams |
//! | [`sensors`] | Scanning and 16-bit → 8-bit normalization of all sensor addresses |
//! | [`keys`] | Hysteresis press/release detection and stroke accumulation |
//! | [`calibration`] | Interactive calibration state machine and persistent storage |
//! | [`protocol`] | Gemini PR chord packets and finger-spelled feedback |
//! | [`keyboard`] | Main loop tying everything together |
//!
//! ## Data Flow
//!
//! ```text
//! raw ADC -> normalized value -> pressed bitmap -> stroke bitmap -> wire packet
//! ```
//!
//! ## Testing
//!
//! Everything in this crate runs on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod bitmap;
pub mod calibration;
pub mod config;
pub mod hw;
pub mod keyboard;
pub mod keys;
pub mod layout;
pub mod protocol;
pub mod sensors;

#[cfg(test)]
mod testing;

pub use bitmap::KeyBitmap;
pub use calibration::{Calibration, Calibrator};
pub use config::{Config, ConfigError, Timing};
pub use keyboard::{CalibrationOutcome, Indicators, Keyboard, Mode};
pub use keys::{KeyEvent, KeyState};
pub use sensors::SensorMatrix;

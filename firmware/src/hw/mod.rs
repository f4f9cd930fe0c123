// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod adc;
pub mod flash;
pub mod gpio;
pub mod pins;
pub mod time;
pub mod usart;

pub use adc::SensorAdc;
pub use flash::InternalFlash;
pub use gpio::Pin;
pub use pins::BoardPins;
pub use time::SysTimer;
pub use usart::Usart;

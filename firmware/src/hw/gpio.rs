// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `embedded-hal` 1.0 digital traits for HAL pins.
//!
//! The HAL pins only implement the 0.2 `digital::v2` traits; [`Pin`] re-exposes them through
//! the 1.0 traits used by the keyboard core.

use embedded_hal::digital::{self, ErrorKind};
use embedded_hal_02::digital::v2;

pub struct Pin<P>(P);

impl<P> Pin<P> {
    #[inline]
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    pub fn free(self) -> P {
        self.0
    }
}

impl<P> digital::ErrorType for Pin<P> {
    type Error = ErrorKind;
}

impl<P: v2::OutputPin> digital::OutputPin for Pin<P> {
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        v2::OutputPin::set_low(&mut self.0).map_err(|_| ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), ErrorKind> {
        v2::OutputPin::set_high(&mut self.0).map_err(|_| ErrorKind::Other)
    }
}

impl<P: v2::InputPin> digital::InputPin for Pin<P> {
    fn is_high(&mut self) -> Result<bool, ErrorKind> {
        v2::InputPin::is_high(&self.0).map_err(|_| ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, ErrorKind> {
        v2::InputPin::is_low(&self.0).map_err(|_| ErrorKind::Other)
    }
}

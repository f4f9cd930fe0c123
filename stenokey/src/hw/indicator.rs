// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Status indicators (activity and calibration LEDs).

use embedded_hal::digital::OutputPin;

/// Whether the indicator is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Indicator that remembers its active level and last commanded state.
pub struct Indicator<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> Indicator<PIN> {
    /// Wrap a pin and switch the indicator off.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut indicator = Self {
            pin,
            active,
            is_on: true,
        };
        indicator.off();
        indicator
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the indicator logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        let high = match self.active {
            ActiveLevel::High => on,
            ActiveLevel::Low => !on,
        };
        if high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

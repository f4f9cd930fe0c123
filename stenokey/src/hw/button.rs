// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Calibration push button, active-low with pull-up.

use embedded_hal::digital::InputPin;

pub struct CalibrationButton<PIN: InputPin> {
    pin: PIN,
}

impl<PIN: InputPin> CalibrationButton<PIN> {
    pub fn new(pin: PIN) -> Self {
        Self { pin }
    }

    /// Returns true while the button is pressed. A failed read counts as released.
    #[inline]
    pub fn is_held(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeInput;

    #[test]
    fn low_level_means_held() {
        let pin = FakeInput::default();
        let mut button = CalibrationButton::new(pin.clone());
        pin.set_high(true);
        assert!(!button.is_held());
        pin.set_high(false);
        assert!(button.is_held());
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Multiplexer address bus.
//!
//! Three address lines (A, B, C) pick one of 8 channels on every multiplexer at once. The
//! inhibit line disconnects the outputs while the address changes, so the ADC never samples a
//! transitional channel.
//!
//! Select sequence:
//! 1. INH high
//! 2. A/B/C from channel bits 0/1/2
//! 3. wait for the settle time
//! 4. INH low

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Anything that can route one multiplexer channel to the analog inputs.
pub trait MuxSelect {
    fn select<D: DelayNs>(&mut self, channel: u8, delay: &mut D);
}

pub struct AddressBus<A, B, C, INH> {
    a: A,
    b: B,
    c: C,
    inhibit: INH,
    settle_us: u32,
    selected: Option<u8>,
}

impl<A, B, C, INH> AddressBus<A, B, C, INH>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    INH: OutputPin,
{
    /// Create the bus with outputs inhibited until the first `select`.
    pub fn new(a: A, b: B, c: C, mut inhibit: INH, settle_us: u32) -> Self {
        inhibit.set_high().ok();
        Self {
            a,
            b,
            c,
            inhibit,
            settle_us,
            selected: None,
        }
    }

    /// Currently selected channel, `None` before the first selection.
    #[inline]
    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    pub fn free(self) -> (A, B, C, INH) {
        (self.a, self.b, self.c, self.inhibit)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) {
    if high {
        pin.set_high().ok();
    } else {
        pin.set_low().ok();
    }
}

impl<A, B, C, INH> MuxSelect for AddressBus<A, B, C, INH>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    INH: OutputPin,
{
    fn select<D: DelayNs>(&mut self, channel: u8, delay: &mut D) {
        let channel = channel & 0b111;

        self.inhibit.set_high().ok();
        drive(&mut self.a, channel & 0b001 != 0);
        drive(&mut self.b, channel & 0b010 != 0);
        drive(&mut self.c, channel & 0b100 != 0);
        delay.delay_us(self.settle_us);
        self.inhibit.set_low().ok();

        self.selected = Some(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeOutput, FakeTimer};

    #[test]
    fn select_drives_address_lines_and_releases_inhibit() {
        let (a, b, c, inh) = (
            FakeOutput::default(),
            FakeOutput::default(),
            FakeOutput::default(),
            FakeOutput::default(),
        );
        let mut bus = AddressBus::new(a.clone(), b.clone(), c.clone(), inh.clone(), 1_000);
        let mut timer = FakeTimer::default();

        assert!(inh.is_high());
        assert_eq!(bus.selected(), None);

        bus.select(0b101, &mut timer);
        assert!(a.is_high());
        assert!(!b.is_high());
        assert!(c.is_high());
        assert!(!inh.is_high());
        assert_eq!(bus.selected(), Some(5));

        bus.select(2, &mut timer);
        assert!(!a.is_high());
        assert!(b.is_high());
        assert!(!c.is_high());
    }

    #[test]
    fn inhibit_is_pulsed_around_every_change() {
        let inh = FakeOutput::default();
        let mut bus = AddressBus::new(
            FakeOutput::default(),
            FakeOutput::default(),
            FakeOutput::default(),
            inh.clone(),
            1_000,
        );
        let mut timer = FakeTimer::default();
        inh.clear_history();

        bus.select(3, &mut timer);
        assert_eq!(inh.history(), vec![true, false]);
        assert_eq!(timer.elapsed_us(), 1_000);
    }
}

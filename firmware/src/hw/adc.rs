// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hall sensor sampling on ADC1 using direct PAC register access.
//!
//! The four multiplexer outputs land on ADC1 IN0..IN3 (PA0..PA3). Conversions are 12-bit and
//! left-aligned, so every reading comes out on the full 16-bit scale the calibration uses.

use stm32f7xx_hal::pac;

use stenokey::hw::AdcRead;

use super::pins::SensorPins;

/// Number of analog inputs wired to the multiplexers.
const INPUTS: u8 = 4;

pub struct SensorAdc {
    adc: pac::ADC1,
    pins: SensorPins,
}

impl SensorAdc {
    /// Power up ADC1 for blocking single conversions on IN0..IN3.
    pub fn new(adc: pac::ADC1, pins: SensorPins) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        adc.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, left-aligned, software trigger
        adc.cr1.modify(|_, w| w.res().bits(0b00));
        adc.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().left();
            w.exten().disabled();
            w
        });

        // Longest sample time on every sensor input; the mux output is high impedance.
        adc.smpr2.modify(|_, w| {
            w.smp0().bits(0b111);
            w.smp1().bits(0b111);
            w.smp2().bits(0b111);
            w.smp3().bits(0b111);
            w
        });
        adc.sqr1.modify(|_, w| w.l().bits(0));

        adc.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc, pins }
    }

    /// Blocking conversion of one channel.
    pub fn read(&self, channel: u8) -> u16 {
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());

        while self.adc.sr.read().eoc().bit_is_clear() {}

        self.adc.dr.read().data().bits() as u16
    }

    #[inline]
    pub fn free(self) -> (pac::ADC1, SensorPins) {
        (self.adc, self.pins)
    }
}

impl AdcRead for SensorAdc {
    fn read_channel(&mut self, input: u8) -> u16 {
        debug_assert!(input < INPUTS);
        self.read(input)
    }
}

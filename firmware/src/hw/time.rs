// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond time base on SysTick.
//!
//! The SysTick exception only bumps an atomic counter. Short delays spin on the cycle counter,
//! millisecond delays follow the tick.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use cortex_m_rt::exception;
use embedded_hal::delay::DelayNs;

use stenokey::hw::Clock;

static MILLIS: AtomicU32 = AtomicU32::new(0);

#[exception]
fn SysTick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

pub struct SysTimer {
    syst: SYST,
    sysclk_hz: u32,
}

impl SysTimer {
    /// Start a 1 kHz tick from the core clock.
    pub fn new(mut syst: SYST, sysclk_hz: u32) -> Self {
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(sysclk_hz / 1_000 - 1);
        syst.clear_current();
        syst.enable_counter();
        syst.enable_interrupt();
        Self { syst, sysclk_hz }
    }

    pub fn free(mut self) -> SYST {
        self.syst.disable_interrupt();
        self.syst.disable_counter();
        self.syst
    }
}

impl Clock for SysTimer {
    #[inline]
    fn now_ms(&self) -> u32 {
        MILLIS.load(Ordering::Relaxed)
    }
}

impl DelayNs for SysTimer {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(self.sysclk_hz) / 1_000_000_000;
        cortex_m::asm::delay(cycles.max(1) as u32);
    }

    fn delay_ms(&mut self, ms: u32) {
        if ms == 0 {
            return;
        }
        // One extra tick: the first one may be only partly elapsed.
        let start = self.now_ms();
        while self.now_ms().wrapping_sub(start) <= ms {
            cortex_m::asm::nop();
        }
    }
}

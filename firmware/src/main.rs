// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! StenoKey firmware entry point for the STM32F777 board.
//!
//! Brings up clocks, pins, the sensor ADC, both USARTs and the SysTick time base, then hands
//! everything to [`stenokey::Keyboard`] and never returns.

#![no_main]
#![no_std]
#![allow(dead_code)]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config as SerialConfig, Serial},
};
use stm32f7xx_hal as hal;

use log::{error, info, LevelFilter};
use stenokey::calibration::FlashStore;
use stenokey::hw::{AddressBus, CalibrationButton, Indicator};
use stenokey::{Config, Indicators, Keyboard};

mod hw;
mod logger;
use hw::{BoardPins, InternalFlash, Pin, SensorAdc, SysTimer, Usart};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOC, dp.GPIOD, dp.GPIOE);

    // USART3 (DBG)
    let usart_cfg = SerialConfig {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let debug = Serial::new(
        dp.USART3,
        (pins.usart3.tx, pins.usart3.rx),
        &clocks,
        usart_cfg,
    );
    logger::init(Usart::new(debug), LevelFilter::Info);
    info!("stenokey firmware starting");

    // USART1 (Gemini PR)
    let usart_cfg = SerialConfig {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let data = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let wire = Usart::new(data);

    let config = Config::default();
    let timer = SysTimer::new(cp.SYST, clocks.sysclk().raw());

    let mux = AddressBus::new(
        Pin::new(pins.mux.a),
        Pin::new(pins.mux.b),
        Pin::new(pins.mux.c),
        Pin::new(pins.mux.inhibit),
        config.timing.mux_settle_us,
    );
    let adc = SensorAdc::new(dp.ADC1, pins.sensors);
    let button = CalibrationButton::new(Pin::new(pins.button));
    let indicators = Indicators {
        activity: Indicator::active_high(Pin::new(pins.leds.activity)),
        calibration: Indicator::active_high(Pin::new(pins.leds.calibration)),
    };
    let store = FlashStore::new(InternalFlash::new(dp.FLASH), 0);

    match Keyboard::new(mux, adc, button, indicators, wire, store, timer, config) {
        Ok(keyboard) => keyboard.run(),
        Err(e) => {
            error!("invalid configuration: {}", e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    }
}

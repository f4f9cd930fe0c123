// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 steno keyboard board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpioc, gpiod, gpioe, Alternate, Analog, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOC, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub mux: MuxPins,
    pub sensors: SensorPins,
    pub button: gpioc::PC13<Input<PullUp>>,
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub usart3: Usart3Pins,
}

/// Address and inhibit lines shared by all four multiplexers.
pub struct MuxPins {
    pub a: gpioe::PE2<Output<PushPull>>,
    pub b: gpioe::PE3<Output<PushPull>>,
    pub c: gpioe::PE4<Output<PushPull>>,
    pub inhibit: gpioe::PE5<Output<PushPull>>,
}

/// Multiplexer outputs, ADC1 IN0..IN3.
pub struct SensorPins {
    pub in0: gpioa::PA0<Analog>,
    pub in1: gpioa::PA1<Analog>,
    pub in2: gpioa::PA2<Analog>,
    pub in3: gpioa::PA3<Analog>,
}

pub struct LedPins {
    pub activity: gpiod::PD13<Output<PushPull>>,
    pub calibration: gpiod::PD14<Output<PushPull>>,
}

/// Gemini PR data to the steno host.
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Debug log.
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

impl BoardPins {
    pub fn new(gpioa: pac::GPIOA, gpioc: pac::GPIOC, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            mux: MuxPins {
                a: gpioe.pe2.into_push_pull_output(),
                b: gpioe.pe3.into_push_pull_output(),
                c: gpioe.pe4.into_push_pull_output(),
                inhibit: gpioe.pe5.into_push_pull_output(),
            },

            sensors: SensorPins {
                in0: gpioa.pa0.into_analog(),
                in1: gpioa.pa1.into_analog(),
                in2: gpioa.pa2.into_analog(),
                in3: gpioa.pa3.into_analog(),
            },

            button: gpioc.pc13.into_pull_up_input(),

            leds: LedPins {
                activity: gpiod.pd13.into_push_pull_output(),
                calibration: gpiod.pd14.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },
        }
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend printing to the debug USART.
//!
//! Lines look like `[INFO] stenokey::keyboard: keyboard active`, CRLF terminated for the
//! terminal.

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record};
use stm32f7xx_hal::pac::USART3;

use crate::hw::Usart;

static PORT: Mutex<RefCell<Option<Usart<USART3>>>> = Mutex::new(RefCell::new(None));
static LOGGER: SerialLogger = SerialLogger;

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(
                    port,
                    "[{}] {}: {}\r\n",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                port.flush();
            }
        });
    }
}

/// Route `log` output to `port`. Only the first call installs the logger.
pub fn init(port: Usart<USART3>, level: LevelFilter) {
    interrupt::free(|cs| {
        PORT.borrow(cs).replace(Some(port));
    });
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

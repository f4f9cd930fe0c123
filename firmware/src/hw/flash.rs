// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Internal flash sector used as calibration storage.
//!
//! Exposes sector 11 (the last 256 KiB of the 2 MiB single-bank layout) as a NOR flash whose
//! offsets start at the sector base. Programming is 32 bits at a time, which needs VDD above
//! 2.7 V.

use core::ptr;

use embedded_storage::nor_flash::{
    check_erase, check_read, check_write, ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash,
};
use log::error;
use stm32f7xx_hal::pac;

/// Base address of sector 11.
pub const SECTOR_BASE: u32 = 0x081C_0000;
/// Size of sector 11.
pub const SECTOR_SIZE: usize = 256 * 1024;
const SECTOR_NUMBER: u8 = 11;

const KEY1: u32 = 0x4567_0123;
const KEY2: u32 = 0xCDEF_89AB;

/// OPERR | WRPERR | PGAERR | PGPERR | ERSERR
const SR_ERRORS: u32 = 0b1111_0010;
/// Program parallelism x32.
const PSIZE_X32: u8 = 0b10;

pub struct InternalFlash {
    flash: pac::FLASH,
}

impl InternalFlash {
    pub fn new(flash: pac::FLASH) -> Self {
        Self { flash }
    }

    pub fn free(self) -> pac::FLASH {
        self.flash
    }

    fn unlock(&mut self) {
        if self.flash.cr.read().lock().bit_is_set() {
            self.flash.keyr.write(|w| unsafe { w.bits(KEY1) });
            self.flash.keyr.write(|w| unsafe { w.bits(KEY2) });
        }
    }

    fn lock(&mut self) {
        self.flash.cr.modify(|_, w| w.lock().set_bit());
    }

    /// Wait for the current operation and report (then clear) any error flags.
    fn wait(&mut self) -> Result<(), NorFlashErrorKind> {
        while self.flash.sr.read().bsy().bit_is_set() {}

        let errors = self.flash.sr.read().bits() & SR_ERRORS;
        if errors != 0 {
            self.flash.sr.write(|w| unsafe { w.bits(errors) });
            error!("flash operation failed, SR error bits {:#010b}", errors);
            return Err(NorFlashErrorKind::Other);
        }
        Ok(())
    }

    fn erase_sector(&mut self) -> Result<(), NorFlashErrorKind> {
        self.flash
            .cr
            .modify(|_, w| unsafe { w.ser().set_bit().snb().bits(SECTOR_NUMBER) });
        self.flash.cr.modify(|_, w| w.strt().set_bit());
        let result = self.wait();
        self.flash.cr.modify(|_, w| w.ser().clear_bit());
        result
    }

    fn program(&mut self, offset: u32, bytes: &[u8]) -> Result<(), NorFlashErrorKind> {
        self.flash
            .cr
            .modify(|_, w| unsafe { w.psize().bits(PSIZE_X32).pg().set_bit() });

        let mut result = Ok(());
        for (i, word) in bytes.chunks_exact(4).enumerate() {
            let addr = SECTOR_BASE + offset + 4 * i as u32;
            let value = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
            unsafe { ptr::write_volatile(addr as *mut u32, value) };
            cortex_m::asm::dsb();
            result = self.wait();
            if result.is_err() {
                break;
            }
        }

        self.flash.cr.modify(|_, w| w.pg().clear_bit());
        result
    }
}

impl ErrorType for InternalFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for InternalFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(self, offset, bytes.len())?;
        let src = (SECTOR_BASE + offset) as *const u8;
        unsafe { ptr::copy_nonoverlapping(src, bytes.as_mut_ptr(), bytes.len()) };
        Ok(())
    }

    fn capacity(&self) -> usize {
        SECTOR_SIZE
    }
}

impl NorFlash for InternalFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = SECTOR_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(self, from, to)?;
        if from == to {
            return Ok(());
        }
        self.unlock();
        let result = self.erase_sector();
        self.lock();
        result
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(self, offset, bytes.len())?;
        self.unlock();
        let result = self.program(offset, bytes);
        self.lock();
        result
    }
}

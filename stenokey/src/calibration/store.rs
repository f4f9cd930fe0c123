// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Persistent storage of the calibration record.
//!
//! The record occupies a fixed slot at the start of one erase sector:
//!
//! | Offset | Size | Content |
//! | ------ | ---- | ------- |
//! | 0 | 4 | magic `b"STNK"` |
//! | 4 | 2 | payload length, little endian |
//! | 6 | 2 | reserved (0xFF) |
//! | 8 | len | postcard-encoded [`Calibration`] |
//!
//! The payload is programmed before the header, so an interrupted save reads back as "no
//! record" rather than as a half-written one.

use core::fmt::Debug;

use embedded_storage::nor_flash::NorFlash;
use log::{debug, info};
use postcard::experimental::max_size::MaxSize;
use thiserror::Error;

use super::Calibration;

const MAGIC: [u8; 4] = *b"STNK";
const HEADER_LEN: usize = 8;
/// Slot size; a multiple of every common NOR write granularity.
pub const RECORD_LEN: usize = 256;

const _: () = assert!(HEADER_LEN + Calibration::POSTCARD_MAX_SIZE <= RECORD_LEN);

#[derive(Error, Debug)]
pub enum StorageError<E: Debug> {
    #[error("flash access failed: {0:?}")]
    Flash(E),
    #[error("stored record is corrupt (payload length {0})")]
    Corrupt(usize),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
}

/// Where calibration survives a power cycle.
pub trait CalibrationStore {
    type Error: Debug;

    /// Read the stored record. `Ok(None)` when nothing was ever saved or it was erased.
    fn load(&mut self) -> Result<Option<Calibration>, Self::Error>;

    /// Replace the stored record.
    fn save(&mut self, calibration: &Calibration) -> Result<(), Self::Error>;

    /// Remove the stored record.
    fn erase(&mut self) -> Result<(), Self::Error>;
}

/// [`CalibrationStore`] on one erase sector of a NOR flash.
pub struct FlashStore<F: NorFlash> {
    flash: F,
    offset: u32,
}

impl<F: NorFlash> FlashStore<F> {
    /// `offset` must be aligned to `F::ERASE_SIZE`; the whole sector starting there is owned by
    /// the store.
    pub fn new(flash: F, offset: u32) -> Self {
        Self { flash, offset }
    }

    pub fn free(self) -> F {
        self.flash
    }

    fn sector(&self) -> (u32, u32) {
        (self.offset, self.offset + F::ERASE_SIZE as u32)
    }
}

impl<F: NorFlash> CalibrationStore for FlashStore<F> {
    type Error = StorageError<F::Error>;

    fn load(&mut self) -> Result<Option<Calibration>, Self::Error> {
        let mut buf = [0u8; RECORD_LEN];
        self.flash
            .read(self.offset, &mut buf)
            .map_err(StorageError::Flash)?;

        if buf[..4] != MAGIC {
            debug!("no calibration record at {:#x}", self.offset);
            return Ok(None);
        }

        let len = u16::from_le_bytes([buf[4], buf[5]]) as usize;
        if len > RECORD_LEN - HEADER_LEN {
            return Err(StorageError::Corrupt(len));
        }

        let calibration = postcard::from_bytes(&buf[HEADER_LEN..HEADER_LEN + len])?;
        Ok(Some(calibration))
    }

    fn save(&mut self, calibration: &Calibration) -> Result<(), Self::Error> {
        let mut buf = [0xFFu8; RECORD_LEN];
        let len = postcard::to_slice(calibration, &mut buf[HEADER_LEN..])?.len();
        buf[..4].copy_from_slice(&MAGIC);
        buf[4..6].copy_from_slice(&(len as u16).to_le_bytes());

        let (from, to) = self.sector();
        self.flash.erase(from, to).map_err(StorageError::Flash)?;
        self.flash
            .write(self.offset + HEADER_LEN as u32, &buf[HEADER_LEN..])
            .map_err(StorageError::Flash)?;
        self.flash
            .write(self.offset, &buf[..HEADER_LEN])
            .map_err(StorageError::Flash)?;

        info!("calibration record saved ({} bytes)", len);
        Ok(())
    }

    fn erase(&mut self) -> Result<(), Self::Error> {
        let (from, to) = self.sector();
        self.flash.erase(from, to).map_err(StorageError::Flash)?;
        info!("calibration record erased");
        Ok(())
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side hardware doubles shared by the unit tests.
//!
//! Time only moves when somebody delays, like on the real board where every wait is a blocking
//! call. Sensors and the calibration button are scripted as functions of that time.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_storage::nor_flash::{self, NorFlash, NorFlashErrorKind, ReadNorFlash};

use crate::hw::{AdcRead, Clock, MuxSelect};
use crate::layout::address;
use crate::protocol::gemini::{Packet, PACKET_LEN};

/// Output pin recording its level and every level it was driven to.
#[derive(Clone, Default)]
pub struct FakeOutput {
    state: Rc<RefCell<(bool, Vec<bool>)>>,
}

impl FakeOutput {
    pub fn is_high(&self) -> bool {
        self.state.borrow().0
    }

    pub fn history(&self) -> Vec<bool> {
        self.state.borrow().1.clone()
    }

    pub fn clear_history(&self) {
        self.state.borrow_mut().1.clear();
    }

    fn drive(&self, high: bool) {
        let mut state = self.state.borrow_mut();
        state.0 = high;
        state.1.push(high);
    }
}

impl digital::ErrorType for FakeOutput {
    type Error = Infallible;
}

impl OutputPin for FakeOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.drive(true);
        Ok(())
    }
}

/// Input pin whose level is set by the test.
#[derive(Clone)]
pub struct FakeInput {
    high: Rc<Cell<bool>>,
}

impl Default for FakeInput {
    fn default() -> Self {
        // Pulled up.
        Self { high: Rc::new(Cell::new(true)) }
    }
}

impl FakeInput {
    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }
}

impl digital::ErrorType for FakeInput {
    type Error = Infallible;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

/// Shared simulated time, advanced only by delays.
#[derive(Clone, Default)]
pub struct FakeTimer {
    ns: Rc<Cell<u64>>,
}

impl FakeTimer {
    pub fn elapsed_us(&self) -> u64 {
        self.ns.get() / 1_000
    }
}

impl DelayNs for FakeTimer {
    fn delay_ns(&mut self, ns: u32) {
        self.ns.set(self.ns.get() + u64::from(ns));
    }
}

impl Clock for FakeTimer {
    fn now_ms(&self) -> u32 {
        (self.ns.get() / 1_000_000) as u32
    }
}

type SensorFn = Box<dyn FnMut(u32, usize) -> u16>;
type ButtonFn = Box<dyn Fn(u32) -> bool>;

/// Raw sensor readings as a function of `(now_ms, address)`.
#[derive(Clone)]
pub struct SensorScript {
    source: Rc<RefCell<SensorFn>>,
}

impl SensorScript {
    pub fn constant(value: u16) -> Self {
        Self::new(move |_, _| value)
    }

    pub fn new(f: impl FnMut(u32, usize) -> u16 + 'static) -> Self {
        Self { source: Rc::new(RefCell::new(Box::new(f))) }
    }

    pub fn replace(&self, f: impl FnMut(u32, usize) -> u16 + 'static) {
        *self.source.borrow_mut() = Box::new(f);
    }
}

/// Multiplexer double: remembers the channel and burns the settle time.
pub struct FakeMux {
    channel: Rc<Cell<u8>>,
    settle_us: u32,
}

/// ADC double reading the scripted sensor at the selected channel.
pub struct FakeAdc {
    channel: Rc<Cell<u8>>,
    timer: FakeTimer,
    sensors: SensorScript,
}

pub fn fake_front_end(timer: &FakeTimer, sensors: &SensorScript) -> (FakeMux, FakeAdc) {
    let channel = Rc::new(Cell::new(0));
    (
        FakeMux { channel: channel.clone(), settle_us: 1_000 },
        FakeAdc { channel, timer: timer.clone(), sensors: sensors.clone() },
    )
}

impl MuxSelect for FakeMux {
    fn select<D: DelayNs>(&mut self, channel: u8, delay: &mut D) {
        self.channel.set(channel);
        delay.delay_us(self.settle_us);
    }
}

impl AdcRead for FakeAdc {
    fn read_channel(&mut self, input: u8) -> u16 {
        let addr = address(self.channel.get() as usize, input as usize);
        let now = self.timer.now_ms();
        (self.sensors.source.borrow_mut())(now, addr)
    }
}

/// Calibration button held (`true`) or released as a function of time.
#[derive(Clone)]
pub struct ButtonScript {
    timer: FakeTimer,
    held: Rc<RefCell<ButtonFn>>,
}

impl ButtonScript {
    pub fn new(timer: &FakeTimer, held: impl Fn(u32) -> bool + 'static) -> Self {
        Self { timer: timer.clone(), held: Rc::new(RefCell::new(Box::new(held))) }
    }

    pub fn replace(&self, held: impl Fn(u32) -> bool + 'static) {
        *self.held.borrow_mut() = Box::new(held);
    }
}

impl digital::ErrorType for ButtonScript {
    type Error = Infallible;
}

impl InputPin for ButtonScript {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        let now = self.timer.now_ms();
        Ok((self.held.borrow())(now))
    }
}

/// Serial port double collecting every written byte. A disconnected wire fails every write.
#[derive(Clone, Default)]
pub struct Wire {
    bytes: Rc<RefCell<Vec<u8>>>,
    disconnected: Rc<Cell<bool>>,
}

impl Wire {
    pub fn set_connected(&self, connected: bool) {
        self.disconnected.set(!connected);
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }

    pub fn packets(&self) -> Vec<Packet> {
        self.bytes
            .borrow()
            .chunks(PACKET_LEN)
            .map(|chunk| {
                let mut packet = [0u8; PACKET_LEN];
                packet.copy_from_slice(chunk);
                packet
            })
            .collect()
    }
}

impl embedded_io::ErrorType for Wire {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for Wire {
    fn write(&mut self, buf: &[u8]) -> Result<usize, embedded_io::ErrorKind> {
        if self.disconnected.get() {
            return Err(embedded_io::ErrorKind::NotConnected);
        }
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), embedded_io::ErrorKind> {
        Ok(())
    }
}

/// RAM-backed NOR flash with real erase/program semantics: programming can only clear bits.
/// A locked flash still reads but refuses to erase or program.
#[derive(Clone)]
pub struct RamFlash {
    mem: Rc<RefCell<Vec<u8>>>,
    locked: Rc<Cell<bool>>,
}

impl RamFlash {
    pub const SIZE: usize = 4096;

    pub fn new() -> Self {
        Self {
            mem: Rc::new(RefCell::new(vec![0xFF; Self::SIZE])),
            locked: Rc::new(Cell::new(false)),
        }
    }

    pub fn set_locked(&self, locked: bool) {
        self.locked.set(locked);
    }

    pub fn poke(&self, offset: usize, bytes: &[u8]) {
        self.mem.borrow_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn peek(&self, offset: usize, len: usize) -> Vec<u8> {
        self.mem.borrow()[offset..offset + len].to_vec()
    }
}

impl nor_flash::ErrorType for RamFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), NorFlashErrorKind> {
        let start = offset as usize;
        let mem = self.mem.borrow();
        let src = mem
            .get(start..start + bytes.len())
            .ok_or(NorFlashErrorKind::OutOfBounds)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        Self::SIZE
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = 1024;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), NorFlashErrorKind> {
        if self.locked.get() {
            return Err(NorFlashErrorKind::Other);
        }
        let (from, to) = (from as usize, to as usize);
        if from % Self::ERASE_SIZE != 0 || to % Self::ERASE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if to > Self::SIZE || from > to {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        self.mem.borrow_mut()[from..to].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), NorFlashErrorKind> {
        if self.locked.get() {
            return Err(NorFlashErrorKind::Other);
        }
        let start = offset as usize;
        if start % Self::WRITE_SIZE != 0 || bytes.len() % Self::WRITE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        let mut mem = self.mem.borrow_mut();
        let dst = mem
            .get_mut(start..start + bytes.len())
            .ok_or(NorFlashErrorKind::OutOfBounds)?;
        for (d, s) in dst.iter_mut().zip(bytes) {
            *d &= *s;
        }
        Ok(())
    }
}

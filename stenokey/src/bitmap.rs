// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-width set of sensor addresses.
//!
//! Used for the sensor mask, the pressed bitmap and the stroke bitmap. Bit `n` stands for sensor
//! address `n`.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use crate::layout::SENSOR_COUNT;

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyBitmap(u32);

impl KeyBitmap {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Build a bitmap from a list of addresses. Addresses outside `0..32` are ignored.
    pub const fn from_addresses(addresses: &[usize]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < addresses.len() {
            if addresses[i] < SENSOR_COUNT {
                bits |= 1 << addresses[i];
            }
            i += 1;
        }
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_set(self, addr: usize) -> bool {
        addr < SENSOR_COUNT && (self.0 >> addr) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, addr: usize) {
        if addr < SENSOR_COUNT {
            self.0 |= 1 << addr;
        }
    }

    #[inline]
    pub fn clear(&mut self, addr: usize) {
        if addr < SENSOR_COUNT {
            self.0 &= !(1 << addr);
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate set addresses in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..SENSOR_COUNT).filter(move |&addr| self.is_set(addr))
    }
}

impl BitOr for KeyBitmap {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for KeyBitmap {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for KeyBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyBitmap({:#010x})", self.0)
    }
}

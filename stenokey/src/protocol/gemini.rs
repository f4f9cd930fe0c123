// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Gemini PR chord packets.
//!
//! Every packet is exactly six bytes. The most significant bit of each byte only marks framing:
//! it is 1 on the first byte and 0 on the other five, leaving seven steno bits per byte:
//!
//! ```text
//! byte 0:  -   #   #   #   #   #   #
//! byte 1:  S-  S-  T-  K-  P-  W-  H-
//! byte 2:  R-  A-  O-  *   *   -   -
//! byte 3:  -   *   *   -E  -U  -F  -R
//! byte 4:  -P  -B  -L  -G  -T  -S  -D
//! byte 5:  #   #   #   #   #   #   -Z
//! ```
//!
//! Column `i` of a row is bit `6 - i` of that byte.

use crate::bitmap::KeyBitmap;

/// Bytes per packet.
pub const PACKET_LEN: usize = 6;

/// Framing bit set on the first byte only.
pub const START_BIT: u8 = 0x80;

/// Steno bits per byte.
const BITS_PER_BYTE: usize = 7;

pub type Packet = [u8; PACKET_LEN];

/// Sensor address feeding each protocol bit; `None` bits are always zero.
///
/// Several bits share one address: the number bar (address 2) fills every `#` slot and both
/// asterisk sensors (12, 13) appear twice.
pub const LAYOUT: [[Option<u8>; BITS_PER_BYTE]; PACKET_LEN] = [
    [None, Some(2), Some(2), Some(2), Some(2), Some(2), Some(2)],
    [Some(0), Some(1), Some(3), Some(4), Some(6), Some(7), Some(9)],
    [Some(10), Some(8), Some(11), Some(12), Some(13), None, None],
    [None, Some(12), Some(13), Some(14), Some(17), Some(15), Some(16)],
    [Some(18), Some(19), Some(20), Some(21), Some(23), Some(24), Some(26)],
    [Some(2), Some(2), Some(2), Some(2), Some(2), Some(2), Some(27)],
];

/// Build the packet for a finished stroke.
pub fn encode_stroke(stroke: KeyBitmap) -> Packet {
    let mut packet = [0u8; PACKET_LEN];
    for (byte, row) in packet.iter_mut().zip(LAYOUT.iter()) {
        for (i, slot) in row.iter().enumerate() {
            if let Some(addr) = *slot {
                if stroke.is_set(addr as usize) {
                    *byte |= 1 << (BITS_PER_BYTE - 1 - i);
                }
            }
        }
    }
    packet[0] |= START_BIT;
    packet
}

/// Split a 48-bit chord code into a packet, first byte most significant, framing bit forced.
pub fn packet_from_code(code: u64) -> Packet {
    let mut packet = [0u8; PACKET_LEN];
    let bytes = code.to_be_bytes();
    packet.copy_from_slice(&bytes[8 - PACKET_LEN..]);
    packet[0] |= START_BIT;
    packet
}

/// 48-bit code of a protocol bit, as laid out in [`packet_from_code`].
const fn bit(byte: usize, column: usize) -> u64 {
    1 << (8 * (PACKET_LEN - 1 - byte) + (BITS_PER_BYTE - 1 - column))
}

/// Named steno keys as the host sees them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StenoKey {
    Number,
    S,
    T,
    K,
    P,
    W,
    H,
    R,
    A,
    O,
    Star,
    E,
    U,
    RightF,
    RightR,
    RightP,
    RightB,
    RightL,
    RightG,
    RightT,
    RightS,
    RightD,
    RightZ,
}

impl StenoKey {
    /// Every protocol bit that belongs to this key.
    pub const fn code(self) -> u64 {
        match self {
            StenoKey::Number => {
                bit(0, 1) | bit(0, 2) | bit(0, 3) | bit(0, 4) | bit(0, 5) | bit(0, 6)
                    | bit(5, 0) | bit(5, 1) | bit(5, 2) | bit(5, 3) | bit(5, 4) | bit(5, 5)
            }
            StenoKey::S => bit(1, 0) | bit(1, 1),
            StenoKey::T => bit(1, 2),
            StenoKey::K => bit(1, 3),
            StenoKey::P => bit(1, 4),
            StenoKey::W => bit(1, 5),
            StenoKey::H => bit(1, 6),
            StenoKey::R => bit(2, 0),
            StenoKey::A => bit(2, 1),
            StenoKey::O => bit(2, 2),
            StenoKey::Star => bit(2, 3) | bit(2, 4) | bit(3, 1) | bit(3, 2),
            StenoKey::E => bit(3, 3),
            StenoKey::U => bit(3, 4),
            StenoKey::RightF => bit(3, 5),
            StenoKey::RightR => bit(3, 6),
            StenoKey::RightP => bit(4, 0),
            StenoKey::RightB => bit(4, 1),
            StenoKey::RightL => bit(4, 2),
            StenoKey::RightG => bit(4, 3),
            StenoKey::RightT => bit(4, 4),
            StenoKey::RightS => bit(4, 5),
            StenoKey::RightD => bit(4, 6),
            StenoKey::RightZ => bit(5, 6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stroke_is_just_framing() {
        assert_eq!(encode_stroke(KeyBitmap::EMPTY), [0x80, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn s_and_a_keys() {
        let packet = encode_stroke(KeyBitmap::from_addresses(&[0, 8]));
        assert_eq!(packet, [0x80, 0x40, 0x20, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn number_bar_sets_every_slot() {
        let packet = encode_stroke(KeyBitmap::from_addresses(&[2]));
        assert_eq!(packet, [0x80 | 0x3F, 0, 0, 0, 0, 0x7E]);
    }

    #[test]
    fn right_hand_keys() {
        // -T (23) and -Z (27)
        let packet = encode_stroke(KeyBitmap::from_addresses(&[23, 27]));
        assert_eq!(packet, [0x80, 0, 0, 0, 0x04, 0x01]);
    }

    #[test]
    fn framing_bit_only_on_first_byte() {
        let packet = encode_stroke(KeyBitmap::from_bits(u32::MAX));
        assert_eq!(packet[0] & START_BIT, START_BIT);
        for byte in &packet[1..] {
            assert_eq!(byte & START_BIT, 0);
        }
        // Sentinel slots stay clear even with every address set.
        assert_eq!(packet[0] & 0x40, 0);
        assert_eq!(packet[2] & 0x03, 0);
        assert_eq!(packet[3] & 0x40, 0);
    }

    #[test]
    fn code_packing() {
        assert_eq!(packet_from_code(0), [0x80, 0, 0, 0, 0, 0]);
        assert_eq!(
            packet_from_code(0x0102_0304_0506),
            [0x81, 0x02, 0x03, 0x04, 0x05, 0x06]
        );
    }

    #[test]
    fn key_codes_match_layout() {
        let cases = [
            (StenoKey::Number, &[2][..]),
            (StenoKey::S, &[0, 1][..]),
            (StenoKey::T, &[3][..]),
            (StenoKey::K, &[4][..]),
            (StenoKey::P, &[6][..]),
            (StenoKey::W, &[7][..]),
            (StenoKey::H, &[9][..]),
            (StenoKey::R, &[10][..]),
            (StenoKey::A, &[8][..]),
            (StenoKey::O, &[11][..]),
            (StenoKey::Star, &[12, 13][..]),
            (StenoKey::E, &[14][..]),
            (StenoKey::U, &[17][..]),
            (StenoKey::RightF, &[15][..]),
            (StenoKey::RightR, &[16][..]),
            (StenoKey::RightP, &[18][..]),
            (StenoKey::RightB, &[19][..]),
            (StenoKey::RightL, &[20][..]),
            (StenoKey::RightG, &[21][..]),
            (StenoKey::RightT, &[23][..]),
            (StenoKey::RightS, &[24][..]),
            (StenoKey::RightD, &[26][..]),
            (StenoKey::RightZ, &[27][..]),
        ];
        for (key, addresses) in cases {
            assert_eq!(
                packet_from_code(key.code()),
                encode_stroke(KeyBitmap::from_addresses(addresses)),
                "{key:?}"
            );
        }
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(StenoKey::S.code(), 0x0060_0000_0000);
        assert_eq!(StenoKey::Number.code(), 0x3F00_0000_007E);
        assert_eq!(StenoKey::Star.code(), 0x0000_0C30_0000);
        assert_eq!(StenoKey::RightP.code(), 0x0000_0000_4000);
    }
}

use stenokey::hw::{AdcRead, MuxSelect};
use stenokey::layout::{DEFAULT_MASK, SENSOR_COUNT};
use stenokey::protocol::spelling::{char_code, spell_char, START};
use stenokey::protocol::*;
use stenokey::*;

use embedded_hal::delay::DelayNs;
extern crate std;

use core::cell::Cell;

/// Raw readings of every sensor plus the currently selected channel.
type Front = Cell<(u8, [u16; SENSOR_COUNT])>;

struct TableAdc<'a>(&'a Front);

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct SharedMux<'a>(&'a Front);

impl MuxSelect for SharedMux<'_> {
    fn select<D: DelayNs>(&mut self, channel: u8, _delay: &mut D) {
        let (_, raw) = self.0.get();
        self.0.set((channel, raw));
    }
}

impl AdcRead for TableAdc<'_> {
    fn read_channel(&mut self, input: u8) -> u16 {
        let (channel, raw) = self.0.get();
        raw[stenokey::layout::address(channel as usize, input as usize)]
    }
}

fn raw_with(pressed: &[usize]) -> [u16; SENSOR_COUNT] {
    let mut raw = [1_000; SENSOR_COUNT];
    for &addr in pressed {
        raw[addr] = 2_000;
    }
    raw
}

#[test]
fn test_scan_to_packet() {
    let cell = Cell::new((0, raw_with(&[])));
    let mut matrix = SensorMatrix::new(
        SharedMux(&cell),
        TableAdc(&cell),
        DEFAULT_MASK,
        Calibration::uniform(1_000, 2_000),
    );
    let mut keys = KeyState::new(DEFAULT_MASK, [128; SENSOR_COUNT], [100; SENSOR_COUNT]);
    let mut packets = std::vec::Vec::new();

    // S- and -Z, then -Z alone, then nothing.
    for pressed in [&[0, 27][..], &[27][..], &[][..]] {
        let (channel, _) = cell.get();
        cell.set((channel, raw_with(pressed)));
        if matrix.scan(&mut NoDelay) {
            if let KeyEvent::Stroke(stroke) = keys.update(matrix.output()) {
                packets.push(encode_stroke(stroke));
            }
        }
    }

    assert_eq!(packets, std::vec![[0x80, 0x40, 0, 0, 0, 0x01]]);
}

#[test]
fn test_fixed_codes() {
    assert_eq!(packet_from_code(StenoKey::A.code()), [0x80, 0, 0x20, 0, 0, 0]);
    assert_eq!(
        encode_stroke(KeyBitmap::from_addresses(&[12])),
        encode_stroke(KeyBitmap::from_addresses(&[13]))
    );
}

#[test]
fn test_finger_spelling_packets() {
    assert_eq!(char_code('a') & START, START);
    assert_eq!(
        spell_char('A'),
        packet_from_code(char_code('a') | StenoKey::RightP.code())
    );
    assert_eq!(spell_char('?'), packet_from_code(StenoKey::Star.code()));
}

#[test]
fn test_key_names() {
    let names = std::format!("{}", KeyNames(KeyBitmap::from_addresses(&[2, 14, 26])));
    assert_eq!(names, "# E -D");
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Finger-spelled text over the chord channel.
//!
//! The keyboard has no other way to talk to the user, so status messages are typed out one
//! character per packet using the usual steno finger-spelling chords. Uppercase letters add the
//! `-P` shift key.

use core::fmt;

use embedded_io::Write;

use super::gemini::{packet_from_code, Packet, StenoKey};
use crate::bitmap::KeyBitmap;
use crate::layout::key_name;

/// Start bit as a 48-bit code.
pub const START: u64 = 0x8000_0000_0000;

/// Key added to a letter to capitalize it.
pub const SHIFT: StenoKey = StenoKey::RightP;

/// Chord for a lowercase character, if it has one.
fn chord(c: char) -> Option<&'static [StenoKey]> {
    use StenoKey::*;

    let keys: &'static [StenoKey] = match c {
        'a' => &[A, Star],
        'b' => &[P, W, Star],
        'c' => &[K, R, Star],
        'd' => &[T, K, Star],
        'e' => &[E, Star],
        'f' => &[T, P, Star],
        'g' => &[T, P, K, W, Star],
        'h' => &[H, Star],
        'i' => &[E, U, Star],
        'j' => &[S, K, W, R, Star],
        'k' => &[K, Star],
        'l' => &[H, R, Star],
        'm' => &[P, H, Star],
        'n' => &[T, P, H, Star],
        'o' => &[O, Star],
        'p' => &[P, Star],
        'q' => &[K, W, Star],
        'r' => &[R, Star],
        's' => &[S, Star],
        't' => &[T, Star],
        'u' => &[U, Star],
        'v' => &[S, R, Star],
        'w' => &[W, Star],
        'x' => &[K, P, Star],
        'y' => &[K, W, R, Star],
        'z' => &[S, T, P, K, W, Star],
        ':' => &[K, H, R, RightP, RightB],
        '.' => &[P, RightP],
        ' ' => &[S, RightP],
        '\n' => &[R, RightR],
        '\'' => &[S, K, W, Star, RightT],
        '1' => &[Number, S],
        '2' => &[Number, T],
        ',' => &[W, RightB],
        '#' => &[Number],
        '-' => &[H, RightB],
        '*' => &[Star],
        '_' => &[R, U, RightP, RightB, RightD],
        _ => return None,
    };
    Some(keys)
}

/// 48-bit code for `c`, start bit included. Unknown characters come out as `*`.
pub fn char_code(c: char) -> u64 {
    let mut code = START;
    let lower = if c.is_uppercase() {
        code |= SHIFT.code();
        c.to_lowercase().next().unwrap_or(c)
    } else {
        c
    };
    let keys = chord(lower).unwrap_or(&[StenoKey::Star]);
    for key in keys {
        code |= key.code();
    }
    code
}

#[inline]
pub fn spell_char(c: char) -> Packet {
    packet_from_code(char_code(c))
}

/// Write one packet per character of `text`.
pub fn spell<W: Write>(wire: &mut W, text: &str) -> Result<(), W::Error> {
    for c in text.chars() {
        wire.write_all(&spell_char(c))?;
    }
    Ok(())
}

/// `core::fmt::Write` adapter, so feedback can be formatted straight onto the wire.
///
/// `fmt::Error` carries nothing, so the underlying error is kept for [`Speller::take_error`].
pub struct Speller<'a, W: Write> {
    wire: &'a mut W,
    error: Option<W::Error>,
}

impl<'a, W: Write> Speller<'a, W> {
    pub fn new(wire: &'a mut W) -> Self {
        Self { wire, error: None }
    }

    /// The wire error that made the last write fail, if any.
    pub fn take_error(&mut self) -> Option<W::Error> {
        self.error.take()
    }
}

impl<W: Write> fmt::Write for Speller<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        spell(&mut *self.wire, s).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

/// Space-separated key names of a bitmap, e.g. `T -Z`.
#[derive(Copy, Clone, Debug)]
pub struct KeyNames(pub KeyBitmap);

impl fmt::Display for KeyNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, addr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(key_name(addr))?;
        }
        Ok(())
    }
}

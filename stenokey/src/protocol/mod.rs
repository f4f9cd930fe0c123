// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Everything that goes out on the chord channel.

pub mod gemini;
pub mod spelling;

pub use gemini::{encode_stroke, packet_from_code, Packet, StenoKey, PACKET_LEN};
pub use spelling::{spell, KeyNames, Speller};

//! Disassembler: program image → assembly listing.
//!
//! One line per instruction, prefixed with its address in hex:
//!
//! ```text
//! 00: LDI R0,8
//! 03: PRN R0
//! 05: HLT
//! ```
//!
//! Bytes that do not decode are listed as `DB` data. Because `NN:` reads as
//! a label, the listing assembles back to the same bytes.

use ls8_common::program::sweep;
use ls8_common::DecodeError;

use crate::parser::DATA_DIRECTIVE;

/// Disassemble raw bytes into a listing.
pub fn disassemble(bytes: &[u8]) -> String {
    let mut lines = Vec::new();

    for (at, decoded) in sweep(bytes) {
        match decoded {
            Ok(instr) => lines.push(format!("{at:02X}: {instr}")),
            Err(DecodeError::Truncated { .. }) => {
                for (offset, byte) in bytes[at..].iter().enumerate() {
                    lines.push(data_line(at + offset, *byte));
                }
            }
            Err(_) => lines.push(data_line(at, bytes[at])),
        }
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn data_line(at: usize, byte: u8) -> String {
    format!("{at:02X}: {DATA_DIRECTIVE} 0x{byte:02X}")
}

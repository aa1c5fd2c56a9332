//! The `.ls8` program image format.
//!
//! One byte per line, written as binary digits. Everything from `#` to the
//! end of a line is a comment; blank lines are ignored:
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! ```

use ls8_common::program::sweep;
use ls8_common::MEMORY_SIZE;

use crate::error::AsmError;

/// Parse `.ls8` text into raw bytes, in file order.
pub fn load_image(text: &str) -> Result<Vec<u8>, AsmError> {
    let mut bytes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let code = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        if code.is_empty() {
            continue;
        }

        bytes.push(parse_binary(code).ok_or_else(|| AsmError::InvalidBinary {
            line: line_num,
            token: code.to_string(),
        })?);
    }

    if bytes.len() > MEMORY_SIZE {
        return Err(AsmError::ImageTooLarge { size: bytes.len() });
    }
    Ok(bytes)
}

fn parse_binary(code: &str) -> Option<u8> {
    let valid = (1..=8).contains(&code.len()) && code.bytes().all(|b| b == b'0' || b == b'1');
    if !valid {
        return None;
    }
    u8::from_str_radix(code, 2).ok()
}

/// Render bytes as `.ls8` text, commenting each instruction's opcode line
/// with its assembly form.
pub fn to_image_text(bytes: &[u8]) -> String {
    let items: Vec<_> = sweep(bytes).collect();
    let mut out = String::new();

    for (i, (at, decoded)) in items.iter().enumerate() {
        let end = items.get(i + 1).map_or(bytes.len(), |(next, _)| *next);
        for (offset, byte) in bytes[*at..end].iter().enumerate() {
            out.push_str(&format!("{byte:08b}"));
            if let (0, Ok(instr)) = (offset, decoded) {
                out.push_str(&format!(" # {instr}"));
            }
            out.push('\n');
        }
    }

    out
}

//! LS-8 loader and assembler — text ↔ program image translation.
//!
//! Two text formats are understood:
//!
//! - `.ls8` images: one byte per line as binary digits, `#` comments
//!   ([`load_image`], [`to_image_text`])
//! - assembly: mnemonics with register and immediate operands, `;`
//!   comments, `NAME:` labels and `DB` data ([`assemble`], [`disassemble`])
//!
//! # Usage
//!
//! ```
//! use ls8_asm::{assemble, disassemble, load_image, to_image_text};
//!
//! let bytes = assemble("LDI R0,8\nPRN R0\nHLT\n").unwrap();
//! assert_eq!(bytes, vec![0x82, 0x00, 0x08, 0x47, 0x00, 0x01]);
//!
//! let text = to_image_text(&bytes);
//! assert_eq!(load_image(&text).unwrap(), bytes);
//!
//! assert_eq!(disassemble(&bytes), "00: LDI R0,8\n03: PRN R0\n05: HLT\n");
//! ```

pub mod error;
pub mod image;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::disassemble;
pub use error::AsmError;
pub use image::{load_image, to_image_text};

use std::collections::HashMap;

use lexer::tokenize_line;
use ls8_common::MEMORY_SIZE;
use parser::{parse_line, Statement, Value};

/// Assemble text into a program image.
///
/// Labels may be used before they are defined. Returns the first error
/// encountered.
pub fn assemble(text: &str) -> Result<Vec<u8>, AsmError> {
    // Pass 1: parse every line and assign addresses to labels.
    let mut statements = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut address = 0;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        let parsed = parse_line(&tokens, line_num)?;

        if let Some(label) = parsed.label {
            if labels.insert(label.clone(), address).is_some() {
                return Err(AsmError::DuplicateLabel {
                    line: line_num,
                    label,
                });
            }
        }
        if let Some(statement) = parsed.statement {
            address += statement.size();
            statements.push((line_num, statement));
        }
    }

    if address > MEMORY_SIZE {
        return Err(AsmError::ImageTooLarge { size: address });
    }

    // Pass 2: emit bytes with labels resolved.
    let resolve = |value: &Value, line: usize| -> Result<u8, AsmError> {
        match value {
            Value::Byte(b) => Ok(*b),
            Value::Label(name) => {
                let &address = labels.get(name).ok_or_else(|| AsmError::UndefinedLabel {
                    line,
                    label: name.clone(),
                })?;
                u8::try_from(address).map_err(|_| AsmError::LabelOutOfRange {
                    line,
                    label: name.clone(),
                    address,
                })
            }
        }
    };

    let mut bytes = Vec::with_capacity(address);
    for (line, statement) in &statements {
        match statement {
            Statement::Instruction { opcode, a, b } => {
                let operands = [resolve(a, *line)?, resolve(b, *line)?];
                bytes.push(*opcode as u8);
                bytes.extend_from_slice(&operands[..opcode.operand_count()]);
            }
            Statement::Data(values) => {
                for value in values {
                    bytes.push(resolve(value, *line)?);
                }
            }
        }
    }

    Ok(bytes)
}

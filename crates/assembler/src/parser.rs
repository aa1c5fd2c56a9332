//! Parser for LS-8 assembly tokens → statements.
//!
//! Dispatches on the opcode to the operand pattern it expects. Label
//! references stay symbolic here; `assemble` resolves them once every
//! label address is known.

use crate::error::AsmError;
use crate::lexer::Token;
use ls8_common::Opcode;

/// Directive that emits raw bytes.
pub(crate) const DATA_DIRECTIVE: &str = "DB";

/// A byte value that may still name a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    Byte(u8),
    Label(String),
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    /// An instruction. Operands the opcode does not use are `Byte(0)`.
    Instruction { opcode: Opcode, a: Value, b: Value },
    /// `DB` data bytes.
    Data(Vec<Value>),
}

impl Statement {
    /// Number of bytes the statement occupies.
    pub(crate) fn size(&self) -> usize {
        match self {
            Statement::Instruction { opcode, .. } => opcode.encoded_len(),
            Statement::Data(values) => values.len(),
        }
    }
}

/// A parsed source line: an optional label and an optional statement.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedLine {
    pub label: Option<String>,
    pub statement: Option<Statement>,
}

/// Parse the tokens of one line.
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<ParsedLine, AsmError> {
    let mut parsed = ParsedLine::default();
    let mut rest = tokens;

    if let Some(Token::Label(name)) = rest.first() {
        parsed.label = Some(name.clone());
        rest = &rest[1..];
    }

    let Some(first) = rest.first() else {
        return Ok(parsed);
    };

    let mnemonic = match first {
        Token::Ident(s) => s.as_str(),
        other => {
            return Err(AsmError::UnknownOpcode {
                line: line_num,
                token: token_text(other),
            })
        }
    };
    let args = &rest[1..];

    if mnemonic == DATA_DIRECTIVE {
        if args.is_empty() {
            return Err(AsmError::WrongOperandCount {
                line: line_num,
                opcode: DATA_DIRECTIVE,
                expected: 1,
                found: 0,
            });
        }
        let values = args
            .iter()
            .map(|tok| expect_value(tok, line_num))
            .collect::<Result<Vec<_>, _>>()?;
        parsed.statement = Some(Statement::Data(values));
        return Ok(parsed);
    }

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let expected = opcode.operand_count();
    if args.len() != expected {
        return Err(AsmError::WrongOperandCount {
            line: line_num,
            opcode: opcode.mnemonic(),
            expected,
            found: args.len(),
        });
    }

    let zero = || Value::Byte(0);
    let (a, b) = match opcode {
        // No operands
        Opcode::Hlt | Opcode::Ret => (zero(), zero()),

        // Register, then immediate or label
        Opcode::Ldi => (
            expect_register(&args[0], line_num)?,
            expect_value(&args[1], line_num)?,
        ),

        // One register
        Opcode::Prn
        | Opcode::Push
        | Opcode::Pop
        | Opcode::Call
        | Opcode::Jmp
        | Opcode::Jeq
        | Opcode::Jne
        | Opcode::Jgt
        | Opcode::Jlt => (expect_register(&args[0], line_num)?, zero()),

        // Two registers
        Opcode::Ld
        | Opcode::St
        | Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Cmp => (
            expect_register(&args[0], line_num)?,
            expect_register(&args[1], line_num)?,
        ),
    };

    parsed.statement = Some(Statement::Instruction { opcode, a, b });
    Ok(parsed)
}

/// Parse `R0`..`R7`.
fn expect_register(tok: &Token, line: usize) -> Result<Value, AsmError> {
    let index = match tok {
        Token::Ident(name) => name
            .strip_prefix('R')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|&n| n < 8),
        _ => None,
    };
    index.map(Value::Byte).ok_or_else(|| AsmError::InvalidRegister {
        line,
        token: token_text(tok),
    })
}

/// A byte-sized number, or a label reference.
fn expect_value(tok: &Token, line: usize) -> Result<Value, AsmError> {
    match tok {
        Token::Number(n) => u8::try_from(*n)
            .map(Value::Byte)
            .map_err(|_| AsmError::InvalidNumber {
                line,
                token: n.to_string(),
            }),
        Token::Ident(name) => Ok(Value::Label(name.clone())),
        Token::Label(_) => Err(AsmError::InvalidNumber {
            line,
            token: token_text(tok),
        }),
    }
}

fn token_text(tok: &Token) -> String {
    match tok {
        Token::Label(s) => format!("{s}:"),
        Token::Ident(s) => s.clone(),
        Token::Number(n) => n.to_string(),
    }
}

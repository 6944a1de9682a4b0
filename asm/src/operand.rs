use crate::error::Error;
use crate::token::{Token, TokenKind};
use arch::{op::OperandKind, reg::Reg};
use std::fmt;

/// A parsed operand. Labels and string literals borrow their text from the
/// source buffer; the literal's surrounding quotes are already stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    Register(Reg),
    Immediate(i16),
    Number(i16),
    Label(&'a str),
    StringLiteral(&'a str),
}

impl<'a> Operand<'a> {
    /// Builds an operand from a token, or reports why the token cannot be
    /// one. Register and Label tokens always succeed; numeric tokens are
    /// shape-checked and range-checked; String tokens must carry their
    /// closing quote.
    pub fn from_token(token: &Token<'a>) -> Result<Self, Error> {
        match token.kind {
            TokenKind::Register => match Reg::parse(token.text) {
                Some(reg) => Ok(Operand::Register(reg)),
                None => Err(Error::InvalidTokenKind {
                    kind: token.kind,
                    text: token.display_content(),
                }),
            },

            TokenKind::Label => Ok(Operand::Label(token.text)),

            TokenKind::Immediate | TokenKind::Number => {
                if !is_valid_number(token.text) {
                    return Err(Error::InvalidNumber(token.display_content()));
                }
                let value = to_integer(token.text)
                    .ok_or_else(|| Error::IntegerOverflow(token.display_content()))?;
                Ok(if token.kind == TokenKind::Immediate {
                    Operand::Immediate(value)
                } else {
                    Operand::Number(value)
                })
            }

            TokenKind::String => {
                if token.len() > 1 && token.text.ends_with('"') {
                    Ok(Operand::StringLiteral(&token.text[1..token.len() - 1]))
                } else {
                    Err(Error::MissingQuote(token.display_content()))
                }
            }

            kind => Err(Error::InvalidTokenKind {
                kind,
                text: token.display_content(),
            }),
        }
    }

    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Register(_) => OperandKind::Register,
            Operand::Immediate(_) => OperandKind::Immediate,
            Operand::Number(_) => OperandKind::Number,
            Operand::Label(_) => OperandKind::Label,
            Operand::StringLiteral(_) => OperandKind::StringLiteral,
        }
    }
}

/// Shape check for a numeric token. The lexer guarantees the character
/// alphabet is right; this rejects the degenerate forms it lets through: a
/// bare prefix (`#`, `x`, `b`), a prefix followed only by a sign, and a bare
/// sign.
fn is_valid_number(text: &str) -> bool {
    match text.as_bytes().first() {
        Some(b'#') | Some(b'x') | Some(b'b') => match text.len() {
            1 => false,
            2 => !matches!(text.as_bytes()[1], b'+' | b'-'),
            _ => true,
        },
        Some(b'+') | Some(b'-') => text.len() > 1,
        Some(_) => true,
        None => false,
    }
}

/// Converts a shape-valid numeric token to its 16-bit value. Values outside
/// [-32768, 65535] are overflow; in-range values above `i16::MAX` wrap to
/// their two's-complement representation.
fn to_integer(text: &str) -> Option<i16> {
    let (radix, rest) = match text.as_bytes()[0] {
        b'#' => (10, &text[1..]),
        b'x' => (16, &text[1..]),
        b'b' => (2, &text[1..]),
        _ => (10, text),
    };
    let value = i64::from_str_radix(rest, radix).ok()?;
    if value > u16::MAX as i64 || value < i16::MIN as i64 {
        return None;
    }
    Some(value as i16)
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "{reg}"),
            // Immediates always print in decimal form.
            Operand::Immediate(value) => write!(f, "#{value}"),
            Operand::Number(value) => write!(f, "{value}"),
            Operand::Label(label) => write!(f, "{label}"),
            Operand::StringLiteral(text) => write!(f, "\"{text}\""),
        }
    }
}

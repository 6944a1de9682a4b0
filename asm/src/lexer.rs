use crate::token::{Token, TokenKind};
use arch::{op::Opcode, reg::Reg};

/// Breaks LC-3 source into tokens on demand. Whitespace and `;` comments are
/// skipped; `\n` is significant and becomes an `EndOfLine` token. Once the end
/// of the buffer is reached, every further call yields `EndOfInput` at the
/// final position.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn next_token(&mut self) -> Token<'a> {
        loop {
            let begin = self.pos;
            let Some(ch) = self.peek() else {
                return self.token(TokenKind::EndOfInput, begin);
            };

            match ch {
                '\n' => {
                    self.pos += 1;
                    return self.token(TokenKind::EndOfLine, begin);
                }
                ' ' | '\t' | '\r' | '\x0b' | '\x0c' => {
                    self.pos += 1;
                    continue;
                }
                ';' => {
                    // Comment runs to (but not including) the next newline.
                    self.skip_while(|b| b != b'\n');
                    continue;
                }
                ',' => {
                    self.pos += 1;
                    return self.token(TokenKind::Comma, begin);
                }
                '#' => {
                    self.pos += 1;
                    self.scan_decimal();
                    return self.token(TokenKind::Immediate, begin);
                }
                '"' => {
                    self.pos += 1;
                    self.scan_string();
                    return self.token(TokenKind::String, begin);
                }
                '0'..='9' | '+' | '-' => {
                    self.scan_decimal();
                    return self.token(TokenKind::Number, begin);
                }
                'A'..='Z' | 'a'..='z' => {
                    self.skip_while(|b| b.is_ascii_alphanumeric());
                    let kind = classify_identifier(&self.src[begin..self.pos]);
                    return self.token(kind, begin);
                }
                '.' => {
                    // A directive spelling, or an unknown token if the name
                    // does not match one exactly.
                    self.pos += 1;
                    self.skip_while(|b| b.is_ascii_alphanumeric());
                    let kind = match Opcode::parse(&self.src[begin..self.pos]) {
                        Some(op) if op.is_pseudo() => TokenKind::Pseudo,
                        _ => TokenKind::Unknown,
                    };
                    return self.token(kind, begin);
                }
                ch => {
                    self.pos += ch.len_utf8();
                    return self.token(TokenKind::Unknown, begin);
                }
            }
        }
    }

    fn token(&self, kind: TokenKind, begin: usize) -> Token<'a> {
        Token::new(kind, self.src, begin, self.pos)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek_byte().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    /// An optional leading sign followed by any number of digits. A bare sign
    /// is a lexically valid token; operand construction rejects it later.
    fn scan_decimal(&mut self) {
        if matches!(self.peek_byte(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        self.skip_while(|b| b.is_ascii_digit());
    }

    /// Consumes up to and including the closing quote. An unterminated
    /// literal ends before the newline or at end of input.
    fn scan_string(&mut self) {
        while let Some(b) = self.peek_byte() {
            match b {
                b'"' => {
                    self.pos += 1;
                    return;
                }
                b'\n' => return,
                _ => self.pos += 1,
            }
        }
    }
}

/// An identifier is an opcode, a register, a hex/binary immediate, or a
/// label, checked in that order. The immediate check only looks at the digit
/// alphabet; a bare `x` or `b` prefix still classifies as an immediate and is
/// rejected during operand construction.
fn classify_identifier(text: &str) -> TokenKind {
    if Opcode::parse(text).is_some_and(|op| !op.is_pseudo()) {
        return TokenKind::Opcode;
    }
    if Reg::parse(text).is_some() {
        return TokenKind::Register;
    }
    match text.as_bytes()[0] {
        b'x' if text[1..].bytes().all(|b| b.is_ascii_hexdigit()) => TokenKind::Immediate,
        b'b' if text[1..].bytes().all(|b| b == b'0' || b == b'1') => TokenKind::Immediate,
        _ => TokenKind::Label,
    }
}

use std::fmt;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    Unknown,
    EndOfLine,
    EndOfInput,
    Opcode,
    Label,
    Register,
    Pseudo,
    Immediate,
    Number,
    String,
    Comma,
}

/// One token of LC-3 assembly. `text` is a view into the source buffer, never
/// an owned copy; `begin`/`end` are the byte offsets of that view. Two tokens
/// are equal when they have the same kind and cover the same source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub begin: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, source: &'a str, begin: usize, end: usize) -> Self {
        Token {
            kind,
            text: &source[begin..end],
            begin,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Token text with control characters escaped, for diagnostics.
    pub fn display_content(&self) -> String {
        let mut result = String::with_capacity(self.text.len());
        for ch in self.text.chars() {
            match ch {
                '\0' => result.push_str("\\0"),
                '\n' => result.push_str("\\n"),
                '\t' => result.push_str("\\t"),
                ch => result.push(ch),
            }
        }
        result
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.display_content())
    }
}

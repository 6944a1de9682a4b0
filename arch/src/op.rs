use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Every operation the assembler understands: the 16 machine opcodes, the
/// named trap aliases, and the five directives. One enum drives lexing
/// classification, operand validation and encoding.
///
/// `Unknown` is the `Default` sentinel for "not a real instruction"; it has
/// no mnemonic and is never encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter)]
pub enum Opcode {
    ADD,
    AND,
    BR,
    BRn,
    BRz,
    BRp,
    BRzp,
    BRnp,
    BRnz,
    BRnzp,
    JMP,
    JSR,
    JSRR,
    LD,
    LDI,
    LDR,
    LEA,
    NOT,
    RET,
    RTI,
    ST,
    STI,
    STR,
    TRAP,
    GETC,
    OUT,
    PUTS,
    IN,
    PUTSP,
    HALT,
    ORIG,
    FILL,
    BLKW,
    STRINGZ,
    END,
    #[default]
    Unknown,
}

/// The shape of an operand, as declared in an opcode's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum OperandKind {
    Register,
    Immediate,
    Number,
    Label,
    StringLiteral,
}

static MNEMONICS: Lazy<HashMap<&'static str, Opcode>> = Lazy::new(|| {
    Opcode::iter()
        .filter(|op| !matches!(op, Opcode::Unknown))
        .map(|op| (op.mnemonic(), op))
        .collect()
});

impl Opcode {
    /// Exact, case-sensitive mnemonic lookup. Directive spellings include the
    /// leading dot, so `.ORIG` parses but `ORIG` does not.
    pub fn parse(s: &str) -> Option<Self> {
        MNEMONICS.get(s).copied()
    }

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            ADD => "ADD",
            AND => "AND",
            BR => "BR",
            BRn => "BRn",
            BRz => "BRz",
            BRp => "BRp",
            BRzp => "BRzp",
            BRnp => "BRnp",
            BRnz => "BRnz",
            BRnzp => "BRnzp",
            JMP => "JMP",
            JSR => "JSR",
            JSRR => "JSRR",
            LD => "LD",
            LDI => "LDI",
            LDR => "LDR",
            LEA => "LEA",
            NOT => "NOT",
            RET => "RET",
            RTI => "RTI",
            ST => "ST",
            STI => "STI",
            STR => "STR",
            TRAP => "TRAP",
            GETC => "GETC",
            OUT => "OUT",
            PUTS => "PUTS",
            IN => "IN",
            PUTSP => "PUTSP",
            HALT => "HALT",
            ORIG => ".ORIG",
            FILL => ".FILL",
            BLKW => ".BLKW",
            STRINGZ => ".STRINGZ",
            END => ".END",
            Unknown => "UnknownOp",
        }
    }

    /// Directives control layout or emit raw data instead of encoding to a
    /// single instruction word.
    pub fn is_pseudo(self) -> bool {
        use Opcode::*;
        matches!(self, ORIG | FILL | BLKW | STRINGZ | END)
    }

    pub fn allows_label(self) -> bool {
        !matches!(self, Opcode::ORIG | Opcode::END)
    }

    /// The 4-bit opcode field placed at bits 15-12 of the instruction word.
    pub fn code4(self) -> u16 {
        use Opcode::*;
        match self {
            ADD => 0x1,
            AND => 0x5,
            BR | BRn | BRz | BRp | BRzp | BRnp | BRnz | BRnzp => 0x0,
            JMP | RET => 0xC,
            JSR | JSRR => 0x4,
            LD => 0x2,
            LDI => 0xA,
            LDR => 0x6,
            LEA => 0xE,
            NOT => 0x9,
            RTI => 0x8,
            ST => 0x3,
            STI => 0xB,
            STR => 0x7,
            TRAP | GETC | OUT | PUTS | IN | PUTSP | HALT => 0xF,
            _ => 0xD,
        }
    }

    /// Condition bits (n, z, p) at 11-9 for the branch family.
    pub fn branch_cond(self) -> Option<u16> {
        use Opcode::*;
        match self {
            BR | BRnzp => Some(0b111),
            BRn => Some(0b100),
            BRz => Some(0b010),
            BRp => Some(0b001),
            BRzp => Some(0b011),
            BRnp => Some(0b101),
            BRnz => Some(0b110),
            _ => None,
        }
    }

    /// Fixed trap vectors for the named trap aliases. Bare `TRAP` carries its
    /// vector as an immediate operand instead.
    pub fn trap_vector(self) -> Option<u16> {
        use Opcode::*;
        match self {
            GETC => Some(0x20),
            OUT => Some(0x21),
            PUTS => Some(0x22),
            IN => Some(0x23),
            PUTSP => Some(0x24),
            HALT => Some(0x25),
            _ => None,
        }
    }

    /// The accepted operand signatures. An instruction validates if its
    /// operand list matches any one signature exactly in count and
    /// per-position kind. All alternatives of one opcode share an arity.
    pub fn signatures(self) -> &'static [&'static [OperandKind]] {
        use Opcode::*;
        use OperandKind::*;
        match self {
            ADD | AND => &[
                &[Register, Register, Register],
                &[Register, Register, Immediate],
            ],
            BR | BRn | BRz | BRp | BRzp | BRnp | BRnz | BRnzp | JSR => {
                &[&[Label], &[Immediate]]
            }
            JMP | JSRR => &[&[Register]],
            LD | LDI | LEA | ST | STI => &[&[Register, Label]],
            LDR | STR => &[&[Register, Register, Immediate]],
            NOT => &[&[Register, Register]],
            TRAP | ORIG | FILL => &[&[Immediate]],
            BLKW => &[&[Number]],
            STRINGZ => &[&[StringLiteral]],
            RET | RTI | GETC | OUT | PUTS | IN | PUTSP | HALT | END | Unknown => &[&[]],
        }
    }

    /// Inclusive range an immediate or number operand must lie in.
    pub fn immediate_range(self) -> (i16, i16) {
        use Opcode::*;
        match self {
            TRAP => (0, 255),
            ORIG | FILL => (i16::MIN, i16::MAX),
            // A block length cannot be negative.
            BLKW => (0, i16::MAX),
            ADD | AND => (-16, 15),
            LD | LDI | LEA | ST | STI | BR | BRn | BRz | BRp | BRzp | BRnp | BRnz | BRnzp => {
                (-256, 255)
            }
            LDR | STR => (-32, 31),
            JSR => (-1024, 1023),
            _ => (0, 0),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

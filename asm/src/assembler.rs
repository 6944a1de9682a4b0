use crate::error::Error;
use crate::inst::Instruction;
use crate::labels::Labels;
use crate::operand::Operand;
use arch::op::Opcode;

/// Turns a validated instruction sequence into machine words: assigns
/// addresses from the `.ORIG` origin, collects label bindings, then encodes
/// each instruction. Any failure aborts the run with no output.
pub struct Assembler<'a> {
    instructions: Vec<Instruction<'a>>,
    labels: Labels,
    origin: u16,
}

impl<'a> Assembler<'a> {
    pub fn new(instructions: Vec<Instruction<'a>>) -> Self {
        Self {
            instructions,
            labels: Labels::new(),
            origin: 0,
        }
    }

    pub fn run(mut self) -> Result<(u16, Vec<u16>), Error> {
        for instr in &self.instructions {
            instr.validate()?;
        }
        self.check_structure()?;
        self.assign_addresses();
        self.scan_labels()?;
        let words = self.encode()?;
        Ok((self.origin, words))
    }

    /// The sequence must be non-empty, start with `.ORIG`, and contain no
    /// second `.ORIG`.
    fn check_structure(&mut self) -> Result<(), Error> {
        let first = self.instructions.first().ok_or(Error::EmptyProgram)?;
        if first.opcode != Opcode::ORIG {
            return Err(Error::MissingOrig(first.to_string()));
        }
        if self.instructions[1..]
            .iter()
            .any(|instr| instr.opcode == Opcode::ORIG)
        {
            return Err(Error::MultipleOrig);
        }
        self.origin = immediate(first) as u16;
        Ok(())
    }

    /// Pass 1: walk the program in order, giving each instruction the
    /// current location and advancing by the number of words it will occupy.
    /// `.ORIG` occupies none, `.BLKW` its count, `.STRINGZ` its length plus
    /// the terminator, everything else one.
    fn assign_addresses(&mut self) {
        let mut address = self.origin;
        for instr in &mut self.instructions {
            instr.address = address;
            let size = match instr.opcode {
                Opcode::ORIG => 0,
                Opcode::BLKW => immediate(instr) as u16,
                Opcode::STRINGZ => string_literal(instr).len() as u16 + 1,
                _ => 1,
            };
            address = address.wrapping_add(size);
        }
    }

    /// Pass 2: bind each defined label to its instruction's address. A
    /// refused insert means the label was already defined.
    fn scan_labels(&mut self) -> Result<(), Error> {
        let Assembler {
            instructions,
            labels,
            ..
        } = self;
        for instr in instructions.iter() {
            if let Some(label) = &instr.label {
                if !labels.insert(label, instr.address) {
                    return Err(Error::RedefinedLabel {
                        label: label.clone(),
                        instr: instr.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn encode(&self) -> Result<Vec<u16>, Error> {
        let mut words = Vec::with_capacity(self.instructions.len());
        for instr in &self.instructions {
            if instr.opcode.is_pseudo() {
                encode_pseudo(instr, &mut words);
            } else {
                words.push(self.encode_regular(instr)?);
            }
        }
        Ok(words)
    }

    fn encode_regular(&self, instr: &Instruction<'a>) -> Result<u16, Error> {
        use Opcode::*;

        let mut word = instr.opcode.code4() << 12;
        match instr.opcode {
            ADD | AND => {
                word |= reg_field(instr, 0, 9) | reg_field(instr, 1, 6);
                if let Operand::Immediate(_) = instr.operands[2] {
                    word |= 1 << 5;
                    word |= imm_field(instr, 2, 5);
                } else {
                    word |= reg_field(instr, 2, 0);
                }
            }

            BR | BRn | BRz | BRp | BRzp | BRnp | BRnz | BRnzp => {
                word |= instr.opcode.branch_cond().unwrap_or(0) << 9;
                word |= self.pc_offset(instr, 0, 9)?;
            }

            JMP | JSRR => word |= reg_field(instr, 0, 6),

            JSR => {
                word |= 1 << 11;
                word |= self.pc_offset(instr, 0, 11)?;
            }

            LD | LDI | LEA | ST | STI => {
                word |= reg_field(instr, 0, 9);
                word |= self.pc_offset(instr, 1, 9)?;
            }

            LDR | STR => {
                word |= reg_field(instr, 0, 9) | reg_field(instr, 1, 6);
                word |= imm_field(instr, 2, 6);
            }

            NOT => {
                word |= reg_field(instr, 0, 9) | reg_field(instr, 1, 6);
                word |= 0x3F;
            }

            RET => word |= 0x7 << 6,

            RTI => {}

            TRAP => word |= imm_field(instr, 0, 8),

            GETC | OUT | PUTS | IN | PUTSP | HALT => {
                word |= instr.opcode.trap_vector().unwrap_or(0);
            }

            // Pseudo opcodes are handled by `encode_pseudo`; `Unknown` never
            // survives parsing.
            _ => {}
        }
        Ok(word)
    }

    /// PC-relative offset of operand `idx`, truncated to `bits` bits. A
    /// branch or `JSR` written with an immediate operand encodes the value
    /// directly. The offset counts from the instruction after this one.
    fn pc_offset(&self, instr: &Instruction<'a>, idx: usize, bits: u32) -> Result<u16, Error> {
        match instr.operands[idx] {
            Operand::Label(label) => {
                let target = self.labels.get(label).ok_or_else(|| Error::UndefinedLabel {
                    label: label.to_string(),
                    instr: instr.to_string(),
                })?;
                let offset = target.wrapping_sub(instr.address).wrapping_sub(1) as i16;

                let max = (1 << (bits - 1)) - 1;
                let min = -(1 << (bits - 1));
                if (offset as i32) < min || (offset as i32) > max {
                    return Err(Error::OffsetOutOfRange {
                        label: label.to_string(),
                        instr: instr.to_string(),
                        offset,
                        bits,
                    });
                }
                Ok((offset as u16) & mask(bits))
            }
            Operand::Immediate(value) | Operand::Number(value) => Ok((value as u16) & mask(bits)),
            _ => Ok(0),
        }
    }
}

/// `.FILL` emits its value, `.BLKW` a zero block, `.STRINGZ` one word per
/// character plus a null terminator. `.ORIG` and `.END` emit nothing.
fn encode_pseudo(instr: &Instruction<'_>, words: &mut Vec<u16>) {
    match instr.opcode {
        Opcode::FILL => words.push(immediate(instr) as u16),
        Opcode::BLKW => {
            let count = immediate(instr) as u16;
            words.resize(words.len() + count as usize, 0);
        }
        Opcode::STRINGZ => {
            words.extend(string_literal(instr).bytes().map(u16::from));
            words.push(0);
        }
        _ => {}
    }
}

/// Value of the instruction's sole numeric operand. Validation guarantees it
/// exists for the opcodes this is called on.
fn immediate(instr: &Instruction<'_>) -> i16 {
    match instr.operands.first() {
        Some(Operand::Immediate(value)) | Some(Operand::Number(value)) => *value,
        _ => 0,
    }
}

fn string_literal<'a>(instr: &Instruction<'a>) -> &'a str {
    match instr.operands.first() {
        Some(&Operand::StringLiteral(text)) => text,
        _ => "",
    }
}

fn reg_field(instr: &Instruction<'_>, idx: usize, position: u32) -> u16 {
    match instr.operands[idx] {
        Operand::Register(reg) => reg.id() << position,
        _ => 0,
    }
}

/// Two's-complement truncation to the low `bits` bits. The value's range was
/// already checked during validation.
fn imm_field(instr: &Instruction<'_>, idx: usize, bits: u32) -> u16 {
    match instr.operands[idx] {
        Operand::Immediate(value) | Operand::Number(value) => (value as u16) & mask(bits),
        _ => 0,
    }
}

fn mask(bits: u32) -> u16 {
    ((1u32 << bits) - 1) as u16
}

use crate::error::Error;
use crate::operand::Operand;
use crate::token::Token;
use arch::op::Opcode;
use std::fmt;

/// One parsed instruction. The label is copied out of the source buffer so
/// the symbol table can own its keys; operands keep borrowing. The address is
/// zero until the assembler assigns it.
#[derive(Debug, Clone, Default)]
pub struct Instruction<'a> {
    pub label: Option<String>,
    pub opcode: Opcode,
    pub operands: Vec<Operand<'a>>,
    pub address: u16,
}

impl<'a> Instruction<'a> {
    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    /// Converts the token into an operand and appends it. On failure the
    /// operand list is left untouched.
    pub fn add_operand(&mut self, token: &Token<'a>) -> Result<(), Error> {
        let operand = Operand::from_token(token)?;
        self.operands.push(operand);
        Ok(())
    }

    /// Checks the operand list against the opcode's declared signatures and
    /// the immediate operand (if any) against the opcode's range. Also
    /// rejects labels on `.ORIG`/`.END`.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.opcode.allows_label() && self.has_label() {
            return Err(Error::LabelNotAllowed(self.to_string()));
        }

        let signatures = self.opcode.signatures();

        // All alternatives of one opcode share an arity, so the count check
        // can use the first one.
        let expected = signatures[0].len();
        if self.operands.len() != expected {
            return Err(Error::OperandCount {
                instr: self.to_string(),
                expected,
                got: self.operands.len(),
            });
        }

        // Find a signature the operand kinds match exactly. If none does,
        // report the first mismatched position of the last alternative tried.
        let mut mismatch = None;
        let matched = signatures.iter().any(|signature| {
            let pos = self
                .operands
                .iter()
                .zip(signature.iter())
                .position(|(operand, want)| operand.kind() != *want);
            match pos {
                None => true,
                Some(index) => {
                    mismatch = Some((index, signature[index]));
                    false
                }
            }
        });

        if !matched {
            if let Some((index, expected)) = mismatch {
                return Err(Error::OperandType {
                    instr: self.to_string(),
                    index: index + 1,
                    expected,
                    got: self.operands[index].kind(),
                });
            }
        }

        if let Some(value) = self.operands.iter().find_map(|operand| match operand {
            Operand::Immediate(value) | Operand::Number(value) => Some(*value),
            _ => None,
        }) {
            let (lo, hi) = self.opcode.immediate_range();
            if value < lo || value > hi {
                return Err(Error::ImmediateOutOfRange {
                    instr: self.to_string(),
                    value,
                    lo,
                    hi,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label} ")?;
        }
        write!(f, "{}", self.opcode)?;
        for (idx, operand) in self.operands.iter().enumerate() {
            if idx == 0 {
                write!(f, " {operand}")?;
            } else {
                write!(f, ", {operand}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::op::OperandKind;
    use arch::reg::Reg;

    fn instr(opcode: Opcode, operands: Vec<Operand<'static>>) -> Instruction<'static> {
        Instruction {
            opcode,
            operands,
            ..Instruction::default()
        }
    }

    #[test]
    fn add_accepts_both_forms() {
        let rrr = instr(
            Opcode::ADD,
            vec![
                Operand::Register(Reg::R1),
                Operand::Register(Reg::R2),
                Operand::Register(Reg::R3),
            ],
        );
        assert!(rrr.validate().is_ok());

        let rri = instr(
            Opcode::ADD,
            vec![
                Operand::Register(Reg::R1),
                Operand::Register(Reg::R2),
                Operand::Immediate(-5),
            ],
        );
        assert!(rri.validate().is_ok());
    }

    #[test]
    fn arity_mismatch() {
        let too_few = instr(
            Opcode::ADD,
            vec![Operand::Register(Reg::R1), Operand::Register(Reg::R2)],
        );
        assert!(matches!(
            too_few.validate(),
            Err(Error::OperandCount {
                expected: 3,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn type_mismatch_reports_first_bad_position() {
        let bad = instr(
            Opcode::LD,
            vec![Operand::Register(Reg::R1), Operand::Register(Reg::R2)],
        );
        assert!(matches!(
            bad.validate(),
            Err(Error::OperandType {
                index: 2,
                expected: OperandKind::Label,
                got: OperandKind::Register,
                ..
            })
        ));
    }

    #[test]
    fn immediate_ranges() {
        let ok = instr(Opcode::TRAP, vec![Operand::Immediate(255)]);
        assert!(ok.validate().is_ok());

        let out = instr(Opcode::TRAP, vec![Operand::Immediate(256)]);
        assert!(matches!(
            out.validate(),
            Err(Error::ImmediateOutOfRange { lo: 0, hi: 255, .. })
        ));

        let out = instr(
            Opcode::ADD,
            vec![
                Operand::Register(Reg::R0),
                Operand::Register(Reg::R0),
                Operand::Immediate(-17),
            ],
        );
        assert!(matches!(
            out.validate(),
            Err(Error::ImmediateOutOfRange { lo: -16, hi: 15, .. })
        ));
    }

    #[test]
    fn labels_rejected_on_orig_and_end() {
        let mut orig = instr(Opcode::ORIG, vec![Operand::Immediate(0x3000u16 as i16)]);
        orig.label = Some("START".to_string());
        assert!(matches!(orig.validate(), Err(Error::LabelNotAllowed(_))));

        let mut end = instr(Opcode::END, vec![]);
        end.label = Some("DONE".to_string());
        assert!(matches!(end.validate(), Err(Error::LabelNotAllowed(_))));
    }

    #[test]
    fn display() {
        let mut add = instr(
            Opcode::ADD,
            vec![
                Operand::Register(Reg::R1),
                Operand::Register(Reg::R2),
                Operand::Immediate(-5),
            ],
        );
        add.label = Some("LOOP".to_string());
        assert_eq!(add.to_string(), "LOOP ADD R1, R2, #-5");

        let halt = instr(Opcode::HALT, vec![]);
        assert_eq!(halt.to_string(), "HALT");
    }
}

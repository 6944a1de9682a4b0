use crate::error::Error;
use crate::inst::Instruction;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use arch::op::Opcode;

/// Builds instructions from the token stream, one per non-empty logical
/// line. Any error aborts the whole program; no partial result is returned.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let cur = lexer.next_token();
        Self { lexer, cur }
    }

    fn advance(&mut self) {
        self.cur = self.lexer.next_token();
    }

    /// Parses until the `.END` directive or end of input, skipping blank
    /// lines between instructions.
    pub fn parse_program(mut self) -> Result<Vec<Instruction<'a>>, Error> {
        let mut instructions = Vec::new();
        loop {
            match self.cur.kind {
                TokenKind::EndOfLine => self.advance(),
                TokenKind::EndOfInput => return Ok(instructions),
                _ => {
                    let instr = self.parse_instruction()?;
                    let done = instr.opcode == Opcode::END;
                    instructions.push(instr);
                    if done {
                        return Ok(instructions);
                    }
                }
            }
        }
    }

    /// `[Label] (Opcode|Pseudo) operand-list`. A label may stand alone on a
    /// line, in which case it binds to the next instruction.
    fn parse_instruction(&mut self) -> Result<Instruction<'a>, Error> {
        let mut instr = Instruction::default();

        if self.cur.kind == TokenKind::Label {
            instr.label = Some(self.cur.text.to_string());
            self.advance();
            while self.cur.kind == TokenKind::EndOfLine {
                self.advance();
            }
        }

        let opcode = match self.cur.kind {
            TokenKind::Opcode | TokenKind::Pseudo => Opcode::parse(self.cur.text),
            _ => None,
        };
        match opcode {
            Some(opcode) => instr.opcode = opcode,
            None => {
                return Err(Error::ExpectedOpcode {
                    kind: self.cur.kind,
                    text: self.cur.display_content(),
                })
            }
        }
        self.advance();

        self.parse_operand_list(instr)
    }

    /// `(operand (Comma operand)*)?`. If the very first token cannot be an
    /// operand at all, the instruction simply has no operands; any later
    /// conversion failure is fatal.
    fn parse_operand_list(&mut self, mut instr: Instruction<'a>) -> Result<Instruction<'a>, Error> {
        match instr.add_operand(&self.cur) {
            Ok(()) => {}
            Err(Error::InvalidTokenKind { .. }) => return Ok(instr),
            Err(err) => return Err(err),
        }
        self.advance();

        while self.cur.kind == TokenKind::Comma {
            self.advance();
            instr.add_operand(&self.cur)?;
            self.advance();
        }

        // The trailing EndOfLine is left for the program loop.
        Ok(instr)
    }
}

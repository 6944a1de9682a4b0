//! An assembler for the LC-3 educational architecture.
//!
//! The pipeline runs in stages: [`tokenize`] breaks source into tokens,
//! [`parse`] builds instructions from them, and [`assemble`] resolves labels
//! and encodes the 16-bit machine words. Each stage is fail-fast over the
//! whole program.

pub mod assembler;
pub mod error;
pub mod inst;
pub mod labels;
pub mod lexer;
pub mod operand;
pub mod parser;
pub mod token;

pub use assembler::Assembler;
pub use error::Error;
pub use inst::Instruction;
pub use operand::Operand;
pub use parser::Parser;
pub use token::{Token, TokenKind};

/// All tokens of `source`, ending with the `EndOfInput` token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = lexer::Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EndOfInput;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

/// Parses `source` into instructions, stopping after `.END`.
pub fn parse(source: &str) -> Result<Vec<Instruction<'_>>, Error> {
    Parser::new(source).parse_program()
}

/// Validates, resolves, and encodes the instructions. Returns the origin
/// address and the machine words starting there.
pub fn assemble(instructions: Vec<Instruction<'_>>) -> Result<(u16, Vec<u16>), Error> {
    Assembler::new(instructions).run()
}

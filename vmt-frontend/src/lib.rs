//! Hack VM Translator - Frontend
//! 
//! Turns the text of one VM module into typed instructions:
//! - Lexer: strips comments and blank lines, splits lines into words
//! - Parser: maps each line of words to an [`Instruction`]
//! - Instruction: the closed set of VM instructions, segments and operators

pub mod instruction;
pub mod lexer;
pub mod parser;

pub use instruction::{
    ArithmeticOp, Instruction, OpKind, ParsedInstruction, Segment, VmModule,
};
pub use lexer::{Lexer, LineTokens};
pub use parser::{ParseError, Parser};

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse the source text of one module
    pub fn parse_module(module_name: &str, source: &str) -> Result<VmModule, ParseError> {
        let lines = Lexer::new(source).tokenize();
        Parser::new(module_name).parse(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_module() {
        let module = Frontend::parse_module("Main", "push constant 1\n// done\nreturn\n").unwrap();

        assert_eq!(module.name, "Main");
        assert_eq!(module.instructions.len(), 2);
        assert_eq!(module.instructions[1].instruction, Instruction::Return);
        assert_eq!(module.instructions[1].location.line, 3);
    }
}

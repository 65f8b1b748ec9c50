pub mod types;
pub mod parser;
pub mod symbols;
pub mod assembler;

pub use types::{
    Address, AsmError, Comp, Dest, Instruction, Jump, Line, SourceLine,
    MAX_ADDRESS_VALUE,
};

pub use parser::Parser;
pub use symbols::{SymbolTable, VARIABLE_BASE};
pub use assembler::{HackAssembler, Program};

// Re-export for convenience
pub fn assemble(source: &str) -> Result<Program, Vec<AsmError>> {
    HackAssembler::new().assemble(source)
}

/// Assemble lines that were built in memory rather than parsed from text
pub fn assemble_lines(lines: &[Line]) -> Result<Program, Vec<AsmError>> {
    HackAssembler::new().assemble_lines(lines)
}

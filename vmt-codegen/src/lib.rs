//! Hack VM Translator - Code Generation
//! 
//! Lowers VM instructions to Hack assembly, one instruction at a time,
//! against a shared [`TranslationContext`]. It covers:
//! 
//! - Segment addressing for push and pop
//! - Stack arithmetic and comparisons
//! - Function-scoped labels and branches
//! - The call/return protocol and the bootstrap prologue

pub mod context;
pub mod memory;
pub mod emit;
mod arithmetic;
mod flow;
mod function;
mod generator;

pub use context::TranslationContext;
pub use emit::{emit_lines, emit_program};
pub use function::{generate_bootstrap, BOOTSTRAP_FUNCTION};
pub use generator::{generate, generate_all};

use hack_asm::types::is_valid_symbol;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("cannot pop into the constant segment")]
    PopConstant,

    #[error("pointer index {0} is out of range (expected 0 or 1)")]
    PointerIndex(u16),

    #[error("temp index {0} is out of range (expected 0..=7)")]
    TempIndex(u16),

    #[error("value {0} does not fit in an A-instruction")]
    ValueOutOfRange(u32),

    #[error("unrecognized instruction `{0}`")]
    Unrecognized(String),

    #[error("`{0}` is not a valid assembler symbol")]
    InvalidSymbol(String),
}

/// Pass through a symbol the assembler will accept
pub(crate) fn checked_symbol(symbol: String) -> Result<String, CodegenError> {
    if is_valid_symbol(&symbol) {
        Ok(symbol)
    } else {
        Err(CodegenError::InvalidSymbol(symbol))
    }
}

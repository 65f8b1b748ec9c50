//! Memory map and segment addressing
//!
//! RAM layout used by translated programs:
//! - 0..=4: SP, LCL, ARG, THIS, THAT
//! - 5..=12: the temp segment
//! - 13..=15: scratch registers for generated code
//! - 16..=255: static variables (allocated by the assembler)
//! - 256..: the stack

use crate::context::TranslationContext;
use crate::{checked_symbol, CodegenError};
use hack_asm::{Comp, Dest, MAX_ADDRESS_VALUE};
use vmt_frontend::Segment;

pub const SP: &str = "SP";
pub const LCL: &str = "LCL";
pub const ARG: &str = "ARG";
pub const THIS: &str = "THIS";
pub const THAT: &str = "THAT";

/// Scratch registers; R13 holds addresses and frame pointers, R14 the
/// return address during `return`
pub const SCRATCH_ADDR: &str = "R13";
pub const SCRATCH_RET: &str = "R14";

pub const TEMP_BASE: u16 = 5;
pub const TEMP_SIZE: u16 = 8;
pub const STACK_BASE: u16 = 256;

/// Base pointer register of an indirectly addressed segment
fn base_pointer(segment: Segment) -> Option<&'static str> {
    match segment {
        Segment::Local => Some(LCL),
        Segment::Argument => Some(ARG),
        Segment::This => Some(THIS),
        Segment::That => Some(THAT),
        Segment::Constant | Segment::Temp | Segment::Pointer | Segment::Static => None,
    }
}

/// Where a directly addressed segment cell lives
enum Direct {
    Symbol(String),
    Address(u16),
}

fn direct_cell(
    segment: Segment,
    index: u16,
    ctx: &TranslationContext,
) -> Result<Direct, CodegenError> {
    match segment {
        Segment::Temp if index < TEMP_SIZE => Ok(Direct::Address(TEMP_BASE + index)),
        Segment::Temp => Err(CodegenError::TempIndex(index)),
        Segment::Pointer => match index {
            0 => Ok(Direct::Symbol(THIS.to_string())),
            1 => Ok(Direct::Symbol(THAT.to_string())),
            _ => Err(CodegenError::PointerIndex(index)),
        },
        Segment::Static => checked_symbol(ctx.static_symbol(index)).map(Direct::Symbol),
        Segment::Constant | Segment::Local | Segment::Argument | Segment::This | Segment::That => {
            Err(CodegenError::Unrecognized(format!("{} {}", segment, index)))
        }
    }
}

fn select(ctx: &mut TranslationContext, cell: Direct) {
    match cell {
        Direct::Symbol(symbol) => ctx.at(symbol),
        Direct::Address(address) => ctx.at_value(address),
    }
}

/// Load an immediate into D
pub(crate) fn load_constant(ctx: &mut TranslationContext, value: u16) -> Result<(), CodegenError> {
    if value > MAX_ADDRESS_VALUE {
        return Err(CodegenError::ValueOutOfRange(u32::from(value)));
    }
    ctx.at_value(value);
    ctx.assign(Dest::D, Comp::A);
    Ok(())
}

/// Push the value held in D
pub(crate) fn push_d(ctx: &mut TranslationContext) {
    ctx.at(SP);
    ctx.assign(Dest::A, Comp::M);
    ctx.assign(Dest::M, Comp::D);
    ctx.at(SP);
    ctx.assign(Dest::M, Comp::MPlusOne);
}

/// Pop the top of the stack into D
pub(crate) fn pop_d(ctx: &mut TranslationContext) {
    ctx.at(SP);
    ctx.assign(Dest::AM, Comp::MMinusOne);
    ctx.assign(Dest::D, Comp::M);
}

/// Push the contents of a named register (LCL, ARG, ...)
pub(crate) fn push_register(ctx: &mut TranslationContext, register: &str) {
    ctx.at(register);
    ctx.assign(Dest::D, Comp::M);
    push_d(ctx);
}

pub(crate) fn push(ctx: &mut TranslationContext, segment: Segment, index: u16) -> Result<(), CodegenError> {
    if segment == Segment::Constant {
        load_constant(ctx, index)?;
    } else if let Some(base) = base_pointer(segment) {
        ctx.at(base);
        ctx.assign(Dest::D, Comp::M);
        load_offset(ctx, index)?;
        ctx.assign(Dest::A, Comp::DPlusA);
        ctx.assign(Dest::D, Comp::M);
    } else {
        let cell = direct_cell(segment, index, ctx)?;
        select(ctx, cell);
        ctx.assign(Dest::D, Comp::M);
    }
    push_d(ctx);
    Ok(())
}

pub(crate) fn pop(ctx: &mut TranslationContext, segment: Segment, index: u16) -> Result<(), CodegenError> {
    if segment == Segment::Constant {
        return Err(CodegenError::PopConstant);
    }

    if let Some(base) = base_pointer(segment) {
        // Effective address goes to R13 before the pop clobbers D
        ctx.at(base);
        ctx.assign(Dest::D, Comp::M);
        load_offset(ctx, index)?;
        ctx.assign(Dest::D, Comp::DPlusA);
        ctx.at(SCRATCH_ADDR);
        ctx.assign(Dest::M, Comp::D);
        pop_d(ctx);
        ctx.at(SCRATCH_ADDR);
        ctx.assign(Dest::A, Comp::M);
        ctx.assign(Dest::M, Comp::D);
    } else {
        let cell = direct_cell(segment, index, ctx)?;
        pop_d(ctx);
        select(ctx, cell);
        ctx.assign(Dest::M, Comp::D);
    }
    Ok(())
}

fn load_offset(ctx: &mut TranslationContext, index: u16) -> Result<(), CodegenError> {
    if index > MAX_ADDRESS_VALUE {
        return Err(CodegenError::ValueOutOfRange(u32::from(index)));
    }
    ctx.at_value(index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(ctx: &mut TranslationContext) -> Vec<String> {
        ctx.take_output().iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_push_constant() {
        let mut ctx = TranslationContext::new();
        push(&mut ctx, Segment::Constant, 7).unwrap();
        assert_eq!(
            lines(&mut ctx),
            vec!["@7", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1"]
        );
    }

    #[test]
    fn test_push_local_is_indirect() {
        let mut ctx = TranslationContext::new();
        push(&mut ctx, Segment::Local, 2).unwrap();
        assert_eq!(
            &lines(&mut ctx)[..5],
            &["@LCL", "D=M", "@2", "A=D+A", "D=M"]
        );
    }

    #[test]
    fn test_temp_is_direct() {
        let mut ctx = TranslationContext::new();
        pop(&mut ctx, Segment::Temp, 6).unwrap();
        assert_eq!(lines(&mut ctx), vec!["@SP", "AM=M-1", "D=M", "@11", "M=D"]);
    }

    #[test]
    fn test_pointer_aliases_this_and_that() {
        let mut ctx = TranslationContext::new();
        push(&mut ctx, Segment::Pointer, 0).unwrap();
        pop(&mut ctx, Segment::Pointer, 1).unwrap();
        let out = lines(&mut ctx);
        assert_eq!(out[0], "@THIS");
        assert_eq!(out[out.len() - 2], "@THAT");
    }

    #[test]
    fn test_static_uses_module_name() {
        let mut ctx = TranslationContext::new();
        ctx.set_module("Counter");
        pop(&mut ctx, Segment::Static, 3).unwrap();
        assert_eq!(lines(&mut ctx)[3], "@Counter.3");
    }

    #[test]
    fn test_static_needs_a_symbol_safe_module_name() {
        let mut ctx = TranslationContext::new();
        ctx.set_module("my-mod");
        assert_eq!(
            pop(&mut ctx, Segment::Static, 3),
            Err(CodegenError::InvalidSymbol("my-mod.3".to_string()))
        );

        ctx.set_module("My Prog");
        assert_eq!(
            push(&mut ctx, Segment::Static, 3),
            Err(CodegenError::InvalidSymbol("My Prog.3".to_string()))
        );
    }

    #[test]
    fn test_pop_local_saves_address_first() {
        let mut ctx = TranslationContext::new();
        pop(&mut ctx, Segment::Argument, 1).unwrap();
        assert_eq!(
            lines(&mut ctx),
            vec![
                "@ARG", "D=M", "@1", "D=D+A", "@R13", "M=D",
                "@SP", "AM=M-1", "D=M", "@R13", "A=M", "M=D",
            ]
        );
    }

    #[test]
    fn test_invalid_segment_uses() {
        let mut ctx = TranslationContext::new();
        assert_eq!(pop(&mut ctx, Segment::Constant, 0), Err(CodegenError::PopConstant));
        assert_eq!(push(&mut ctx, Segment::Pointer, 2), Err(CodegenError::PointerIndex(2)));
        assert_eq!(push(&mut ctx, Segment::Temp, 8), Err(CodegenError::TempIndex(8)));
        assert_eq!(
            push(&mut ctx, Segment::Constant, 32768),
            Err(CodegenError::ValueOutOfRange(32768))
        );
    }
}

//! Function entry, the call/return protocol and the bootstrap prologue
//!
//! Frame layout built by `call` (stack grows upward):
//!
//! ```text
//! ARG ->  argument 0 .. argument n-1   (pushed by the caller)
//!         return address
//!         saved LCL
//!         saved ARG
//!         saved THIS
//!         saved THAT
//! LCL ->  local 0 .. local k-1          (zeroed by `function`)
//! ```

use crate::context::TranslationContext;
use crate::memory::{
    load_constant, pop_d, push_d, push_register, ARG, LCL, SCRATCH_ADDR, SCRATCH_RET, SP,
    STACK_BASE, THAT, THIS,
};
use crate::{checked_symbol, CodegenError};
use hack_asm::{Comp, Dest, Jump, MAX_ADDRESS_VALUE};
use log::debug;

/// Entry point called by the bootstrap prologue
pub const BOOTSTRAP_FUNCTION: &str = "Sys.init";

/// Return address plus the four saved segment pointers
const SAVED_FRAME_SIZE: u16 = 5;

/// Saved pointers in the order `call` pushes them
const SAVED_POINTERS: [&str; 4] = [LCL, ARG, THIS, THAT];

pub(crate) fn function(ctx: &mut TranslationContext, name: &str, n_locals: u16) -> Result<(), CodegenError> {
    let entry = checked_symbol(name.to_string())?;
    ctx.enter_function(name);
    ctx.label(entry);
    for _ in 0..n_locals {
        load_constant(ctx, 0)?;
        push_d(ctx);
    }
    Ok(())
}

pub(crate) fn call(ctx: &mut TranslationContext, name: &str, n_args: u16) -> Result<(), CodegenError> {
    let frame_offset = u32::from(n_args) + u32::from(SAVED_FRAME_SIZE);
    let frame_offset = u16::try_from(frame_offset)
        .ok()
        .filter(|offset| *offset <= MAX_ADDRESS_VALUE)
        .ok_or(CodegenError::ValueOutOfRange(frame_offset))?;
    let callee = checked_symbol(name.to_string())?;

    let return_label = ctx.return_label();

    ctx.at(return_label.as_str());
    ctx.assign(Dest::D, Comp::A);
    push_d(ctx);
    for pointer in SAVED_POINTERS {
        push_register(ctx, pointer);
    }

    // ARG = SP - (n_args + 5)
    ctx.at(SP);
    ctx.assign(Dest::D, Comp::M);
    ctx.at_value(frame_offset);
    ctx.assign(Dest::D, Comp::DMinusA);
    ctx.at(ARG);
    ctx.assign(Dest::M, Comp::D);

    // LCL = SP
    ctx.at(SP);
    ctx.assign(Dest::D, Comp::M);
    ctx.at(LCL);
    ctx.assign(Dest::M, Comp::D);

    ctx.at(callee);
    ctx.jump(Comp::Zero, Jump::JMP);
    ctx.label(return_label);
    Ok(())
}

pub(crate) fn return_from(ctx: &mut TranslationContext) {
    // FRAME = LCL
    ctx.at(LCL);
    ctx.assign(Dest::D, Comp::M);
    ctx.at(SCRATCH_ADDR);
    ctx.assign(Dest::M, Comp::D);

    // RET = *(FRAME - 5), read before *ARG can overwrite it when n_args is 0
    ctx.at_value(SAVED_FRAME_SIZE);
    ctx.assign(Dest::A, Comp::DMinusA);
    ctx.assign(Dest::D, Comp::M);
    ctx.at(SCRATCH_RET);
    ctx.assign(Dest::M, Comp::D);

    // *ARG = pop()
    pop_d(ctx);
    ctx.at(ARG);
    ctx.assign(Dest::A, Comp::M);
    ctx.assign(Dest::M, Comp::D);

    // SP = ARG + 1
    ctx.at(ARG);
    ctx.assign(Dest::D, Comp::MPlusOne);
    ctx.at(SP);
    ctx.assign(Dest::M, Comp::D);

    // THAT, THIS, ARG, LCL = *(FRAME - 1), ..., *(FRAME - 4)
    for (offset, pointer) in (1u16..).zip(SAVED_POINTERS.iter().rev()) {
        ctx.at(SCRATCH_ADDR);
        ctx.assign(Dest::D, Comp::M);
        ctx.at_value(offset);
        ctx.assign(Dest::A, Comp::DMinusA);
        ctx.assign(Dest::D, Comp::M);
        ctx.at(*pointer);
        ctx.assign(Dest::M, Comp::D);
    }

    ctx.at(SCRATCH_RET);
    ctx.assign(Dest::A, Comp::M);
    ctx.jump(Comp::Zero, Jump::JMP);
}

/// SP = 256, then `call Sys.init 0`
pub fn generate_bootstrap(ctx: &mut TranslationContext) -> Result<(), CodegenError> {
    debug!("Emitting bootstrap prologue for {}", BOOTSTRAP_FUNCTION);
    ctx.comment("bootstrap");
    ctx.at_value(STACK_BASE);
    ctx.assign(Dest::D, Comp::A);
    ctx.at(SP);
    ctx.assign(Dest::M, Comp::D);

    ctx.comment(format!("call {} 0", BOOTSTRAP_FUNCTION));
    call(ctx, BOOTSTRAP_FUNCTION, 0)
}

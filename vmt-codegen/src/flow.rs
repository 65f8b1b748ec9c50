//! Labels and branches, scoped by the enclosing function

use crate::context::TranslationContext;
use crate::memory::pop_d;
use crate::{checked_symbol, CodegenError};
use hack_asm::{Comp, Jump};

fn branch_target(ctx: &TranslationContext, name: &str) -> Result<String, CodegenError> {
    checked_symbol(ctx.scoped_label(name))
}

pub(crate) fn label(ctx: &mut TranslationContext, name: &str) -> Result<(), CodegenError> {
    let target = branch_target(ctx, name)?;
    ctx.label(target);
    Ok(())
}

pub(crate) fn goto(ctx: &mut TranslationContext, name: &str) -> Result<(), CodegenError> {
    let target = branch_target(ctx, name)?;
    ctx.at(target);
    ctx.jump(Comp::Zero, Jump::JMP);
    Ok(())
}

/// Pops the condition; any non-zero value branches
pub(crate) fn if_goto(ctx: &mut TranslationContext, name: &str) -> Result<(), CodegenError> {
    let target = branch_target(ctx, name)?;
    pop_d(ctx);
    ctx.at(target);
    ctx.jump(Comp::D, Jump::JNE);
    Ok(())
}

//! Instruction dispatch

use crate::context::TranslationContext;
use crate::{arithmetic, flow, function, memory, CodegenError};
use log::trace;
use vmt_frontend::Instruction;

/// Append the Hack code for one VM instruction to the context's output
pub fn generate(instruction: &Instruction, ctx: &mut TranslationContext) -> Result<(), CodegenError> {
    trace!("Generating `{}`", instruction);

    if !instruction.is_malformed() {
        ctx.comment(instruction.to_string());
    }

    match instruction {
        Instruction::Arithmetic { op } => arithmetic::generate(ctx, *op),
        Instruction::Push { segment, index } => memory::push(ctx, *segment, *index)?,
        Instruction::Pop { segment, index } => memory::pop(ctx, *segment, *index)?,
        Instruction::Label { name } => flow::label(ctx, name)?,
        Instruction::Goto { name } => flow::goto(ctx, name)?,
        Instruction::IfGoto { name } => flow::if_goto(ctx, name)?,
        Instruction::Function { name, n_locals } => function::function(ctx, name, *n_locals)?,
        Instruction::Call { name, n_args } => function::call(ctx, name, *n_args)?,
        Instruction::Return => function::return_from(ctx),
        Instruction::Malformed { text } => return Err(CodegenError::Unrecognized(text.clone())),
    }

    Ok(())
}

/// Generate a sequence of instructions, stopping at the first error
pub fn generate_all<'a>(
    instructions: impl IntoIterator<Item = &'a Instruction>,
    ctx: &mut TranslationContext,
) -> Result<(), CodegenError> {
    for instruction in instructions {
        generate(instruction, ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hack_asm::Line;
    use vmt_frontend::{ArithmeticOp, Segment};

    #[test]
    fn test_comment_precedes_code() {
        let mut ctx = TranslationContext::new();
        generate(&Instruction::Push { segment: Segment::Constant, index: 7 }, &mut ctx).unwrap();

        let out = ctx.take_output();
        assert_eq!(out[0], Line::Comment("push constant 7".to_string()));
        assert!(out[1].is_instruction());
    }

    #[test]
    fn test_malformed_is_rejected_without_output() {
        let mut ctx = TranslationContext::new();
        let err = generate(&Instruction::Malformed { text: "mul".to_string() }, &mut ctx).unwrap_err();

        assert_eq!(err, CodegenError::Unrecognized("mul".to_string()));
        assert!(ctx.output().is_empty());
    }

    #[test]
    fn test_generate_all_shares_counter() {
        let mut ctx = TranslationContext::new().with_comments(false);
        let program = vec![
            Instruction::Arithmetic { op: ArithmeticOp::Eq },
            Instruction::Function { name: "f".to_string(), n_locals: 0 },
            Instruction::Call { name: "g".to_string(), n_args: 0 },
            Instruction::Arithmetic { op: ArithmeticOp::Gt },
        ];

        generate_all(&program, &mut ctx).unwrap();

        let text: Vec<String> = ctx.output().iter().map(|l| l.to_string()).collect();
        assert!(text.contains(&"(COMP_0_TRUE)".to_string()));
        assert!(text.contains(&"(f$ret.1)".to_string()));
        assert!(text.contains(&"(COMP_2_TRUE)".to_string()));
    }
}

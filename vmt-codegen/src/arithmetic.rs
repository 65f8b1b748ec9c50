//! Stack arithmetic, logic and comparisons

use crate::context::TranslationContext;
use crate::memory::SP;
use hack_asm::{Comp, Dest, Jump};
use vmt_frontend::ArithmeticOp;

pub(crate) fn generate(ctx: &mut TranslationContext, op: ArithmeticOp) {
    match op {
        ArithmeticOp::Add => binary(ctx, Comp::DPlusM),
        ArithmeticOp::Sub => binary(ctx, Comp::MMinusD),
        ArithmeticOp::And => binary(ctx, Comp::DAndM),
        ArithmeticOp::Or => binary(ctx, Comp::DOrM),
        ArithmeticOp::Neg => unary(ctx, Comp::NegM),
        ArithmeticOp::Not => unary(ctx, Comp::NotM),
        ArithmeticOp::Eq => compare(ctx, Jump::JEQ),
        ArithmeticOp::Gt => compare(ctx, Jump::JGT),
        ArithmeticOp::Lt => compare(ctx, Jump::JLT),
    }
}

/// Pop y into D and leave A pointing at x, which becomes the result slot
fn pop_operands(ctx: &mut TranslationContext) {
    ctx.at(SP);
    ctx.assign(Dest::AM, Comp::MMinusOne);
    ctx.assign(Dest::D, Comp::M);
    ctx.assign(Dest::A, Comp::AMinusOne);
}

fn binary(ctx: &mut TranslationContext, comp: Comp) {
    pop_operands(ctx);
    ctx.assign(Dest::M, comp);
}

fn unary(ctx: &mut TranslationContext, comp: Comp) {
    ctx.at(SP);
    ctx.assign(Dest::A, Comp::MMinusOne);
    ctx.assign(Dest::M, comp);
}

/// x - y is tested against zero; each comparison gets its own label pair
fn compare(ctx: &mut TranslationContext, jump: Jump) {
    let id = ctx.next_unique();
    let on_true = format!("COMP_{}_TRUE", id);
    let end = format!("COMP_{}_END", id);

    pop_operands(ctx);
    ctx.assign(Dest::D, Comp::MMinusD);
    ctx.at(on_true.as_str());
    ctx.jump(Comp::D, jump);

    ctx.at(SP);
    ctx.assign(Dest::A, Comp::MMinusOne);
    ctx.assign(Dest::M, Comp::Zero);
    ctx.at(end.as_str());
    ctx.jump(Comp::Zero, Jump::JMP);

    ctx.label(on_true);
    ctx.at(SP);
    ctx.assign(Dest::A, Comp::MMinusOne);
    ctx.assign(Dest::M, Comp::MinusOne);
    ctx.label(end);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(ctx: &mut TranslationContext) -> Vec<String> {
        ctx.take_output().iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_add() {
        let mut ctx = TranslationContext::new();
        generate(&mut ctx, ArithmeticOp::Add);
        assert_eq!(lines(&mut ctx), vec!["@SP", "AM=M-1", "D=M", "A=A-1", "M=D+M"]);
    }

    #[test]
    fn test_sub_order() {
        let mut ctx = TranslationContext::new();
        generate(&mut ctx, ArithmeticOp::Sub);
        assert_eq!(lines(&mut ctx).last().map(String::as_str), Some("M=M-D"));
    }

    #[test]
    fn test_not_in_place() {
        let mut ctx = TranslationContext::new();
        generate(&mut ctx, ArithmeticOp::Not);
        assert_eq!(lines(&mut ctx), vec!["@SP", "A=M-1", "M=!M"]);
    }

    #[test]
    fn test_comparisons_get_fresh_labels() {
        let mut ctx = TranslationContext::new();
        generate(&mut ctx, ArithmeticOp::Eq);
        generate(&mut ctx, ArithmeticOp::Lt);
        let out = lines(&mut ctx);

        assert!(out.contains(&"(COMP_0_TRUE)".to_string()));
        assert!(out.contains(&"(COMP_0_END)".to_string()));
        assert!(out.contains(&"(COMP_1_TRUE)".to_string()));
        assert!(out.contains(&"D;JLT".to_string()));
        assert_eq!(ctx.unique_count(), 2);
    }
}

use super::FunInstrsGenerator;
use crate::{stage1_ast::bx_ast as bx, stage2_tac::tac_ast::*};
use anyhow::{Result, anyhow};

impl FunInstrsGenerator<'_> {
    pub(super) fn gen_stmt_break(&mut self, sloc: bx::Sloc) -> Result<()> {
        let lbls = self.break_continue_stack.innermost("break", sloc)?;
        let lbl_break = lbls.lbl_break.clone();
        self.instrs.push(Instruction::Jump(lbl_break));
        Ok(())
    }
    pub(super) fn gen_stmt_continue(&mut self, sloc: bx::Sloc) -> Result<()> {
        let lbls = self.break_continue_stack.innermost("continue", sloc)?;
        let lbl_cont = lbls.lbl_cont.clone();
        self.instrs.push(Instruction::Jump(lbl_cont));
        Ok(())
    }
    pub(super) fn gen_stmt_while(
        &mut self,
        bx::While { condition, body }: bx::While,
    ) -> Result<()> {
        let [lbl_head, lbl_body, lbl_end] = self.new_labels();

        self.break_continue_stack.0.push(Labels {
            lbl_break: lbl_end.clone(),
            lbl_cont: lbl_head.clone(),
        });

        /* Begin instructions */

        let res = (|| {
            self.instrs.push(Instruction::Label(lbl_head.clone()));

            self.gen_branch(condition, lbl_body.clone(), lbl_end.clone())?;

            self.instrs.push(Instruction::Label(lbl_body));

            self.gen_block(body)?;

            self.instrs.push(Instruction::Jump(lbl_head));

            self.instrs.push(Instruction::Label(lbl_end));

            Ok(())
        })();

        /* End of instructions */

        self.break_continue_stack.0.pop();

        res
    }
}

/// Innermost loop last.
#[derive(Default)]
pub struct BreakContinueStack(Vec<Labels>);
impl BreakContinueStack {
    fn innermost(&self, stmt: &str, sloc: bx::Sloc) -> Result<&Labels> {
        self.0.last().ok_or_else(|| {
            anyhow!("Internal compiler error: `{stmt}` outside of any loop, at {sloc}")
        })
    }
}

struct Labels {
    lbl_break: Label,
    lbl_cont: Label,
}

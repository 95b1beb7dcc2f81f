use super::FunInstrsGenerator;
use crate::{stage1_ast::bx_ast as bx, stage2_tac::tac_ast::*};
use anyhow::Result;

impl FunInstrsGenerator<'_> {
    pub(super) fn gen_stmt_conditional(
        &mut self,
        bx::IfElse { condition, then, elze }: bx::IfElse,
    ) -> Result<()> {
        let [lbl_then, lbl_else, lbl_end] = self.new_labels();

        /* Begin instructions */

        self.gen_branch(condition, lbl_then.clone(), lbl_else.clone())?;

        self.instrs.push(Instruction::Label(lbl_then));

        self.gen_block(then)?;

        self.instrs.push(Instruction::Jump(lbl_end.clone()));

        self.instrs.push(Instruction::Label(lbl_else));

        self.gen_block(elze.unwrap_or_default())?;

        self.instrs.push(Instruction::Label(lbl_end));

        Ok(())
    }
}

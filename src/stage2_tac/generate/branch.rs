use super::{
    FunInstrsGenerator,
    helpers::{BinaryOperatorType, ShortCircuitBOT, UnaryOperatorType, convert_op_binary, convert_op_unary},
};
use crate::{stage1_ast::bx_ast as bx, stage2_tac::tac_ast::*};
use anyhow::{Result, anyhow};

impl FunInstrsGenerator<'_> {
    /// Transfers control to `lbl_true` if `exp` holds, else to `lbl_false`.
    pub(super) fn gen_branch(
        &mut self,
        bx::TypedExpression { exp, typ }: bx::TypedExpression,
        lbl_true: Label,
        lbl_false: Label,
    ) -> Result<()> {
        match exp {
            bx::Expression::Bool(true) => self.instrs.push(Instruction::Jump(lbl_true)),
            bx::Expression::Bool(false) => self.instrs.push(Instruction::Jump(lbl_false)),
            bx::Expression::Unary(bx::Unary { op, arg }) => match convert_op_unary(op) {
                UnaryOperatorType::LogicalNot => self.gen_branch(*arg, lbl_false, lbl_true)?,
                UnaryOperatorType::Numeric(op) => return Err(not_a_condition(op)),
            },
            bx::Expression::Binary(bx::Binary { op, lhs, rhs }) => match convert_op_binary(op) {
                BinaryOperatorType::Comparison(cond) => {
                    let lhs = self.gen_exp_and_get_value(*lhs)?;
                    let rhs = self.gen_exp_and_get_value(*rhs)?;
                    let diff = Operand::Temp(self.new_temp());

                    /* Begin instructions */

                    self.instrs.push(Instruction::Binary(Binary {
                        op: BinaryOperator::Sub,
                        lhs,
                        rhs,
                        dst: diff.clone(),
                    }));
                    self.instrs.push(Instruction::JumpIf(JumpIf {
                        cond,
                        operand: diff,
                        lbl: lbl_true,
                    }));
                    self.instrs.push(Instruction::Jump(lbl_false));
                }
                BinaryOperatorType::ShortCircuit(ShortCircuitBOT::And) => {
                    let [lbl_then] = self.new_labels();
                    self.gen_branch(*lhs, lbl_then.clone(), lbl_false.clone())?;
                    self.instrs.push(Instruction::Label(lbl_then));
                    self.gen_branch(*rhs, lbl_true, lbl_false)?;
                }
                BinaryOperatorType::ShortCircuit(ShortCircuitBOT::Or) => {
                    let [lbl_else] = self.new_labels();
                    self.gen_branch(*lhs, lbl_true.clone(), lbl_else.clone())?;
                    self.instrs.push(Instruction::Label(lbl_else));
                    self.gen_branch(*rhs, lbl_true, lbl_false)?;
                }
                BinaryOperatorType::Numeric(op) => return Err(not_a_condition(op)),
            },
            exp @ (bx::Expression::Var(_) | bx::Expression::Call(_)) if typ == bx::Type::Bool => {
                let operand = self.gen_exp_and_get_value(bx::TypedExpression { exp, typ })?;
                self.instrs.push(Instruction::JumpIf(JumpIf {
                    cond: JumpCondition::NotZero,
                    operand,
                    lbl: lbl_true,
                }));
                self.instrs.push(Instruction::Jump(lbl_false));
            }
            exp => return Err(not_a_condition(exp)),
        }
        Ok(())
    }
}

fn not_a_condition(node: impl std::fmt::Debug) -> anyhow::Error {
    anyhow!("Internal compiler error: {node:?} cannot be used as a condition")
}

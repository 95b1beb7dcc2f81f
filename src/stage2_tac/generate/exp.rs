use super::{
    FunInstrsGenerator,
    helpers::{BinaryOperatorType, UnaryOperatorType, convert_op_binary, convert_op_unary},
};
use crate::{stage1_ast::bx_ast as bx, stage2_tac::tac_ast::*};
use anyhow::{Context, Result, anyhow};

impl FunInstrsGenerator<'_> {
    /// Local variables are read in place. Everything else, globals included, is materialized into a fresh temporary.
    pub(super) fn gen_exp_and_get_value(&mut self, exp: bx::TypedExpression) -> Result<Operand> {
        if let bx::Expression::Var(name) = &exp.exp {
            if let Some(Operand::Temp(temp)) = self.scope_chain.lookup(name) {
                return Ok(Operand::Temp(temp));
            }
        }

        let dst = Operand::Temp(self.new_temp());
        self.gen_exp_into(exp, dst.clone())?;
        Ok(dst)
    }

    pub(super) fn gen_exp_into(
        &mut self,
        bx::TypedExpression { exp, typ }: bx::TypedExpression,
        dst: Operand,
    ) -> Result<()> {
        match exp {
            bx::Expression::Var(name) => {
                let src = self.lookup_var(&name)?;
                self.instrs.push(Instruction::Copy(SrcDst { src, dst }));
            }
            bx::Expression::Int(value) => {
                self.instrs.push(Instruction::Const(Const { value, dst }));
            }
            bx::Expression::Bool(b) => {
                let value = b as i64;
                self.instrs.push(Instruction::Const(Const { value, dst }));
            }
            bx::Expression::Unary(bx::Unary { op, arg }) => match convert_op_unary(op) {
                UnaryOperatorType::Numeric(op) => {
                    let src = self.gen_exp_and_get_value(*arg)?;
                    self.instrs.push(Instruction::Unary(Unary { op, src, dst }));
                }
                UnaryOperatorType::LogicalNot => {
                    let exp = bx::Expression::Unary(bx::Unary { op, arg });
                    self.gen_bool_value(bx::TypedExpression { exp, typ }, dst)?;
                }
            },
            bx::Expression::Binary(bx::Binary { op, lhs, rhs }) => match convert_op_binary(op) {
                BinaryOperatorType::Numeric(op) => {
                    let lhs = self.gen_exp_and_get_value(*lhs)?;
                    let rhs = self.gen_exp_and_get_value(*rhs)?;
                    self.instrs.push(Instruction::Binary(Binary { op, lhs, rhs, dst }));
                }
                BinaryOperatorType::Comparison(_) | BinaryOperatorType::ShortCircuit(_) => {
                    let exp = bx::Expression::Binary(bx::Binary { op, lhs, rhs });
                    self.gen_bool_value(bx::TypedExpression { exp, typ }, dst)?;
                }
            },
            bx::Expression::Call(call) => self.gen_call(call, Some(dst))?,
        }
        Ok(())
    }

    /// A boolean needed as a value is computed through the same jumps as a condition.
    /// `dst` is written only once the condition has been decided.
    fn gen_bool_value(&mut self, exp: bx::TypedExpression, dst: Operand) -> Result<()> {
        let [lbl_true, lbl_false, lbl_end] = self.new_labels();

        /* Begin instructions */

        self.gen_branch(exp, lbl_true.clone(), lbl_false.clone())?;

        self.instrs.push(Instruction::Label(lbl_true));
        self.instrs.push(Instruction::Const(Const {
            value: 1,
            dst: dst.clone(),
        }));
        self.instrs.push(Instruction::Jump(lbl_end.clone()));

        self.instrs.push(Instruction::Label(lbl_false));
        self.instrs.push(Instruction::Const(Const { value: 0, dst }));

        self.instrs.push(Instruction::Label(lbl_end));

        Ok(())
    }

    /// All arguments are evaluated before the first `param`,
    /// so that a call nested inside an argument never interleaves with this call's params.
    pub(super) fn gen_call(
        &mut self,
        bx::Call { callee, args }: bx::Call,
        dst: Option<Operand>,
    ) -> Result<()> {
        let arg_count = u32::try_from(args.len())
            .with_context(|| format!("Too many arguments in a call to `{callee}`"))?;

        let arg_vals = args
            .into_iter()
            .map(|arg| self.gen_exp_and_get_value(arg))
            .collect::<Result<Vec<_>>>()?;

        /* Begin instructions */

        for (i, arg) in (1..).zip(arg_vals) {
            self.instrs.push(Instruction::Param(Param { index: i, arg }));
        }

        self.instrs.push(Instruction::Call(Call {
            callee: GlobalSymbol::new(callee),
            arg_count,
            dst,
        }));

        Ok(())
    }

    pub(super) fn lookup_var(&self, name: &str) -> Result<Operand> {
        self.scope_chain
            .lookup(name)
            .ok_or_else(|| anyhow!("Internal compiler error: `{name}` is not bound in any scope"))
    }
}

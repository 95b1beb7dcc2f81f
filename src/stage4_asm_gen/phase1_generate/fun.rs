use super::{GeneratedAsmAst, InstrsGenerator};
use crate::{stage2_tac::tac_ast as t, stage4_asm_gen::asm_ast::*};
use anyhow::{Result, anyhow};
use std::cmp;

impl InstrsGenerator {
    const ARG_REGS: [Register; 6] = [
        Register::DI,
        Register::SI,
        Register::DX,
        Register::CX,
        Register::R8,
        Register::R9,
    ];

    /// Copies each incoming arg into the formal's own slot.
    /// Args beyond the sixth were pushed by the caller, and sit above the saved RBP and the return address.
    pub(super) fn gen_formals_instrs(&self, formals: Vec<t::Temp>) -> Vec<Instruction<GeneratedAsmAst>> {
        let mut extra_arg_stack_pos = StackPosition(8);
        formals
            .into_iter()
            .enumerate()
            .map(|(i, formal)| {
                let src = match Self::ARG_REGS.get(i) {
                    Some(reg) => PreFinalOperand::Register(*reg),
                    None => {
                        *extra_arg_stack_pos += 8;
                        PreFinalOperand::StackPosition(extra_arg_stack_pos)
                    }
                };
                let dst = PreFinalOperand::Pseudo(formal);
                Instruction::Mov { src, dst }
            })
            .collect()
    }

    /// Consumes the `param`s buffered since the previous `call`.
    pub(super) fn gen_call_instrs(
        &mut self,
        t::Call { callee, arg_count, dst }: t::Call,
    ) -> Result<Vec<Instruction<GeneratedAsmAst>>> {
        let mut params = std::mem::take(&mut self.pending_params);
        params.sort_by_key(|param| param.index);

        let indices_ok = params.len() == arg_count as usize
            && (1..).zip(params.iter()).all(|(i, param)| param.index == i);
        if indices_ok == false {
            let indices = params.iter().map(|param| param.index).collect::<Vec<_>>();
            return Err(anyhow!(
                "Internal compiler error: call {callee} expects {arg_count} params, found params {indices:?}"
            ));
        }

        let args = params
            .into_iter()
            .map(|t::Param { arg, .. }| Self::convert_operand(arg))
            .collect::<Vec<_>>();

        let mut asm_instrs = vec![];

        let reg_args_count = cmp::min(Self::ARG_REGS.len(), args.len());
        let stack_args_count = args.len() - reg_args_count;

        let stack_padding_bytelen = if (stack_args_count & 1) == 1 { 8 } else { 0 };

        if stack_padding_bytelen != 0 {
            asm_instrs.push(Instruction::Binary {
                op: BinaryOperator::Sub,
                arg: PreFinalOperand::ImmediateValue(stack_padding_bytelen),
                tgt: Register::SP.into(),
            });
        }

        /* Stack args are pushed first, from the last one down, while no arg register has been written yet. */
        let (reg_args, stack_args) = {
            let mut args = args;
            let stack_args = args.split_off(reg_args_count);
            (args, stack_args)
        };
        for arg_operand in stack_args.into_iter().rev() {
            asm_instrs.push(Instruction::Push(arg_operand));
        }
        for (arg_operand, reg) in reg_args.into_iter().zip(Self::ARG_REGS) {
            asm_instrs.push(Instruction::Mov {
                src: arg_operand,
                dst: reg.into(),
            });
        }

        asm_instrs.push(Instruction::Call(callee));

        /* Each arg is pushed into the stack as an 8-byte item. */
        let stack_pop_bytelen = 8 * (stack_args_count as i64) + stack_padding_bytelen;
        if stack_pop_bytelen != 0 {
            asm_instrs.push(Instruction::Binary {
                op: BinaryOperator::Add,
                arg: PreFinalOperand::ImmediateValue(stack_pop_bytelen),
                tgt: Register::SP.into(),
            });
        }

        if let Some(dst) = dst {
            asm_instrs.push(Instruction::Mov {
                src: Register::AX.into(),
                dst: Self::convert_operand(dst),
            });
        }

        Ok(asm_instrs)
    }
}

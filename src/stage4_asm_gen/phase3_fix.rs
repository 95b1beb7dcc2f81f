//! Ensure that each x86-64 instruction accesses operands in an allowed way.

use crate::stage4_asm_gen::{asm_ast::*, phase2_finalize::FinalizedAsmAst};

pub struct OperandFixer {}
impl OperandFixer {
    pub fn fix_invalid_operands<'a>(
        in_instrs: impl 'a + Iterator<Item = Instruction<FinalizedAsmAst>>,
    ) -> impl 'a + Iterator<Item = Instruction<FinalizedAsmAst>> {
        in_instrs.flat_map(|in_instr| match in_instr {
            Instruction::Mov { src, dst } => {
                let src_to_reg1 = (src.is_on_mem() && dst.is_on_mem())
                    || (Self::is_imm_outside_i32(&src) && dst.is_on_mem());

                let new_instr = |src: Operand, dst: Operand| Instruction::Mov { src, dst };

                Self::maybe_use_2_regs(src, dst, src_to_reg1, false, new_instr)
            }
            Instruction::Binary { op, arg, tgt } => {
                let src_to_reg1 = (arg.is_on_mem() && tgt.is_on_mem()) || Self::is_imm_outside_i32(&arg);

                let new_instr = |arg: Operand, tgt: Operand| Instruction::Binary { op, arg, tgt };

                Self::maybe_use_2_regs(arg, tgt, src_to_reg1, false, new_instr)
            }
            Instruction::Cmp { arg, tgt } => {
                let src_to_reg1 = (arg.is_on_mem() && tgt.is_on_mem()) || Self::is_imm_outside_i32(&arg);
                let dst_to_reg2 = matches!(&tgt, Operand::ImmediateValue(_));

                let new_instr = |arg: Operand, tgt: Operand| Instruction::Cmp { arg, tgt };

                Self::maybe_use_2_regs(arg, tgt, src_to_reg1, dst_to_reg2, new_instr)
            }
            Instruction::Imul(imm @ Operand::ImmediateValue(_)) => {
                let reg = Register::R10;
                let instr_at_reg = Instruction::Imul(Operand::Register(reg));
                Self::to_reg(imm, reg, instr_at_reg)
            }
            Instruction::Idiv(imm @ Operand::ImmediateValue(_)) => {
                let reg = Register::R10;
                let instr_at_reg = Instruction::Idiv(Operand::Register(reg));
                Self::to_reg(imm, reg, instr_at_reg)
            }
            Instruction::Push(operand) if Self::is_imm_outside_i32(&operand) => {
                let reg = Register::R10;
                let instr_at_reg = Instruction::Push(Operand::Register(reg));
                Self::to_reg(operand, reg, instr_at_reg)
            }
            _ => vec![in_instr],
        })
    }

    /// Quadword instructions take 32-bit immediate-value operands and sign-extend them to 64 bits.
    /// Only `mov` into a register can carry a full 64-bit immediate value.
    fn is_imm_outside_i32(operand: &Operand) -> bool {
        match operand {
            Operand::ImmediateValue(i) => i32::try_from(*i).is_err(),
            _ => false,
        }
    }

    fn to_reg(
        operand_to_reg: Operand,
        reg: Register,
        instr_at_reg: Instruction<FinalizedAsmAst>,
    ) -> Vec<Instruction<FinalizedAsmAst>> {
        let instr_to_reg = Instruction::Mov {
            src: operand_to_reg,
            dst: Operand::Register(reg),
        };
        vec![instr_to_reg, instr_at_reg]
    }
    fn maybe_use_2_regs(
        mut src: Operand,
        mut dst: Operand,
        src_to_reg1: bool,
        dst_to_reg2: bool,
        new_instr: impl FnOnce(Operand, Operand) -> Instruction<FinalizedAsmAst>,
    ) -> Vec<Instruction<FinalizedAsmAst>> {
        let reg1 = Operand::Register(Register::R10);
        let reg2 = Operand::Register(Register::R11);

        let mov = |src: Operand, dst: Operand| Instruction::Mov { src, dst };

        let mut instr_to_reg1 = None;
        if src_to_reg1 {
            instr_to_reg1 = Some(mov(src, reg1.clone()));
            src = reg1;
        }

        let mut instr_to_reg2 = None;
        if dst_to_reg2 {
            instr_to_reg2 = Some(mov(dst, reg2.clone()));
            dst = reg2;
        }

        let instr = new_instr(src, dst);

        [instr_to_reg1, instr_to_reg2, Some(instr)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mem_to_mem_mov_goes_through_r10() {
        let instrs = vec![Instruction::Mov {
            src: Operand::StackPosition(StackPosition(-8)),
            dst: Operand::Data(GlobalSymbol::new("g")),
        }];
        let fixed = OperandFixer::fix_invalid_operands(instrs.into_iter()).collect::<Vec<_>>();
        assert!(matches!(
            &fixed[..],
            [
                Instruction::Mov {
                    src: Operand::StackPosition(StackPosition(-8)),
                    dst: Operand::Register(Register::R10)
                },
                Instruction::Mov {
                    src: Operand::Register(Register::R10),
                    dst: Operand::Data(_)
                },
            ]
        ));
    }

    #[test]
    fn wide_imm_into_mem_goes_through_r10() {
        let wide = i64::from(i32::MAX) + 1;
        let instrs = vec![
            Instruction::Mov {
                src: Operand::ImmediateValue(wide),
                dst: Operand::StackPosition(StackPosition(-16)),
            },
            Instruction::Mov {
                src: Operand::ImmediateValue(-1),
                dst: Operand::StackPosition(StackPosition(-16)),
            },
        ];
        let fixed = OperandFixer::fix_invalid_operands(instrs.into_iter()).collect::<Vec<_>>();
        assert_eq!(fixed.len(), 3);
        assert!(matches!(
            &fixed[0],
            Instruction::Mov { src: Operand::ImmediateValue(i), dst: Operand::Register(Register::R10) } if *i == wide
        ));
    }
}

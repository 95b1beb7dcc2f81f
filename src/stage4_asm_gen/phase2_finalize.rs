//! + Translate each remaining pseudo operand into a concrete stack slot.
//! + Derive the stack frame length; and allocate the frame.

pub(crate) mod var_to_stack_pos; // `pub` for rustdoc.

use self::var_to_stack_pos::VarToStackPos;
use crate::stage4_asm_gen::{asm_ast::*, phase1_generate::GeneratedAsmAst, phase3_fix::OperandFixer};
use std::collections::VecDeque;

#[derive(Debug)]
pub struct FinalizedAsmAst(());
impl AsmAstVariant for FinalizedAsmAst {
    type Instructions = VecDeque<Instruction<FinalizedAsmAst>>;
    type Operand = Operand;
}

/// One per procedure.
#[derive(Default)]
pub struct InstrsFinalizer {
    var_to_stack_pos: VarToStackPos,
}
impl InstrsFinalizer {
    pub fn finalize_proc(
        mut self,
        Procedure { ident, instrs }: Procedure<GeneratedAsmAst>,
    ) -> Procedure<FinalizedAsmAst> {
        let instrs = self.finalize_instrs(instrs.into_iter());
        Procedure { ident, instrs }
    }

    fn finalize_instrs(
        &mut self,
        in_instrs: impl Iterator<Item = Instruction<GeneratedAsmAst>>,
    ) -> VecDeque<Instruction<FinalizedAsmAst>> {
        let instrs = self.convert_operands(in_instrs);
        let instrs = OperandFixer::fix_invalid_operands(instrs);
        let mut out_instrs = instrs.collect::<VecDeque<_>>();

        /* We must read the slot count strictly after the iterator of `Instruction`s has been completely traversed.
        An odd count is padded, so that RSP stays 16-byte aligned at every call site. */
        let mut slot_count = self.var_to_stack_pos.slot_count();
        slot_count += slot_count & 1;
        let stack_frame_bytelen = 8 * slot_count as i64;

        if stack_frame_bytelen > 0 {
            out_instrs.push_front(Instruction::Binary {
                op: BinaryOperator::Sub,
                arg: Operand::ImmediateValue(stack_frame_bytelen),
                tgt: Register::SP.into(),
            });
        }

        out_instrs
    }

    fn convert_operands<'a>(
        &'a mut self,
        in_instrs: impl 'a + Iterator<Item = Instruction<GeneratedAsmAst>>,
    ) -> impl 'a + Iterator<Item = Instruction<FinalizedAsmAst>> {
        in_instrs.map(move |in_instr| match in_instr {
            Instruction::Mov { src, dst } => {
                let src = self.convert_operand(src);
                let dst = self.convert_operand(dst);
                Instruction::Mov { src, dst }
            }
            Instruction::Unary(op, operand) => {
                let operand = self.convert_operand(operand);
                Instruction::Unary(op, operand)
            }
            Instruction::Binary { op, arg, tgt } => {
                let arg = self.convert_operand(arg);
                let tgt = self.convert_operand(tgt);
                Instruction::Binary { op, arg, tgt }
            }
            Instruction::Cmp { arg, tgt } => {
                let arg = self.convert_operand(arg);
                let tgt = self.convert_operand(tgt);
                Instruction::Cmp { arg, tgt }
            }
            Instruction::Imul(operand) => {
                let operand = self.convert_operand(operand);
                Instruction::Imul(operand)
            }
            Instruction::Idiv(operand) => {
                let operand = self.convert_operand(operand);
                Instruction::Idiv(operand)
            }
            Instruction::Cqo => Instruction::Cqo,
            Instruction::Jmp(l) => Instruction::Jmp(l),
            Instruction::JmpCC(c, l) => Instruction::JmpCC(c, l),
            Instruction::Label(l) => Instruction::Label(l),
            Instruction::Push(operand) => {
                let operand = self.convert_operand(operand);
                Instruction::Push(operand)
            }
            Instruction::Pop(reg) => Instruction::Pop(reg),
            Instruction::Call(ident) => Instruction::Call(ident),
            Instruction::Ret => Instruction::Ret,
        })
    }
    fn convert_operand(&mut self, pfo: PreFinalOperand) -> Operand {
        use PreFinalOperand as PFO;
        match pfo {
            PFO::ImmediateValue(i) => Operand::ImmediateValue(i),
            PFO::Register(r) => Operand::Register(r),
            PFO::StackPosition(s) => Operand::StackPosition(s),
            PFO::Data(ident) => Operand::Data(ident),
            PFO::Pseudo(temp) => self.var_to_stack_pos.resolve_stack_pos(temp).into(),
        }
    }
}

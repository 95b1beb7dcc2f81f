//! + Translate each TAC instruction into a short fixed sequence of x86-64 instructions,
//!     where each temporary is still an abstract pseudo operand.
//! + Route every computation through scratch registers, so that no instruction reads two memory operands.

mod fun;
mod operand;

use crate::{stage2_tac::tac_ast as t, stage4_asm_gen::asm_ast::*};
use anyhow::{Context, Result, anyhow};

#[derive(Debug)]
pub struct GeneratedAsmAst(());
impl AsmAstVariant for GeneratedAsmAst {
    type Instructions = Vec<Instruction<GeneratedAsmAst>>;
    type Operand = PreFinalOperand;
}

/// One per procedure.
#[derive(Default)]
pub struct InstrsGenerator {
    /// `param`s seen since the last `call`.
    pending_params: Vec<t::Param>,
}
impl InstrsGenerator {
    pub fn convert_proc(
        mut self,
        t::Procedure { ident, formals, instrs: t_instrs }: t::Procedure,
    ) -> Result<Procedure<GeneratedAsmAst>> {
        let mut asm_instrs = self.gen_formals_instrs(formals);

        for t_instr in t_instrs {
            let instr_descr = t_instr.to_string();
            let instrs = self
                .gen_instr(t_instr)
                .with_context(|| format!("At `{instr_descr}`"))?;
            asm_instrs.extend(instrs);
        }

        if let Some(t::Param { index, arg }) = self.pending_params.first() {
            return Err(anyhow!(
                "Internal compiler error: `param {index}, {arg}` is not followed by any `call`"
            ));
        }

        /* Falling off the end of `main` exits with status 0. */
        if ident.is_main() {
            asm_instrs.push(Self::zero_ax());
        }
        asm_instrs.push(Instruction::Label(AsmLabel::Epilogue));
        asm_instrs.push(Instruction::Ret);

        Ok(Procedure { ident, instrs: asm_instrs })
    }

    fn gen_instr(&mut self, t_instr: t::Instruction) -> Result<Vec<Instruction<GeneratedAsmAst>>> {
        let instrs = match t_instr {
            t::Instruction::Const(t::Const { value, dst }) => vec![Instruction::Mov {
                src: PreFinalOperand::ImmediateValue(value),
                dst: Self::convert_operand(dst),
            }],
            t::Instruction::Copy(t::SrcDst { src, dst }) => vec![Instruction::Mov {
                src: Self::convert_operand(src),
                dst: Self::convert_operand(dst),
            }],
            t::Instruction::Unary(unary) => Self::gen_unary_instrs(unary),
            t::Instruction::Binary(binary) => Self::gen_binary_instrs(binary),
            t::Instruction::Jump(lbl) => vec![Instruction::Jmp(AsmLabel::Local(lbl))],
            t::Instruction::JumpIf(jump_if) => Self::gen_jumpif_instrs(jump_if),
            t::Instruction::Label(lbl) => vec![Instruction::Label(AsmLabel::Local(lbl))],
            t::Instruction::Param(param) => {
                self.pending_params.push(param);
                vec![]
            }
            t::Instruction::Call(call) => self.gen_call_instrs(call)?,
            t::Instruction::Return(val) => Self::gen_return_instrs(val),
            t::Instruction::Print(val) => Self::gen_print_instrs(val),
            t::Instruction::Nop => vec![],
        };
        Ok(instrs)
    }

    /* TAC Unary */

    fn gen_unary_instrs(t::Unary { op, src, dst }: t::Unary) -> Vec<Instruction<GeneratedAsmAst>> {
        let asm_op = match op {
            t::UnaryOperator::Negate => UnaryOperator::Neg,
            t::UnaryOperator::Complement => UnaryOperator::Not,
        };
        let reg = || PreFinalOperand::Register(Register::R11);
        vec![
            Instruction::Mov {
                src: Self::convert_operand(src),
                dst: reg(),
            },
            Instruction::Unary(asm_op, reg()),
            Instruction::Mov {
                src: reg(),
                dst: Self::convert_operand(dst),
            },
        ]
    }

    /* TAC Binary */

    fn gen_binary_instrs(t_binary: t::Binary) -> Vec<Instruction<GeneratedAsmAst>> {
        use t::BinaryOperator as TBO;

        match t_binary.op {
            TBO::Add => Self::gen_inplace_binary_instrs(BinaryOperator::Add, t_binary),
            TBO::Sub => Self::gen_inplace_binary_instrs(BinaryOperator::Sub, t_binary),
            TBO::And => Self::gen_inplace_binary_instrs(BinaryOperator::And, t_binary),
            TBO::Or => Self::gen_inplace_binary_instrs(BinaryOperator::Or, t_binary),
            TBO::Xor => Self::gen_inplace_binary_instrs(BinaryOperator::Xor, t_binary),

            TBO::Mul => Self::gen_mul_instrs(t_binary),

            TBO::Div => Self::gen_divrem_instrs(Register::AX, t_binary),
            TBO::Mod => Self::gen_divrem_instrs(Register::DX, t_binary),

            TBO::Shl => Self::gen_shift_instrs(BinaryOperator::Sal, t_binary),
            TBO::Shr => Self::gen_shift_instrs(BinaryOperator::Sar, t_binary),
        }
    }
    fn gen_inplace_binary_instrs(
        asm_op: BinaryOperator,
        t::Binary { op: _, lhs, rhs, dst }: t::Binary,
    ) -> Vec<Instruction<GeneratedAsmAst>> {
        let reg = || PreFinalOperand::Register(Register::R11);
        vec![
            Instruction::Mov {
                src: Self::convert_operand(lhs),
                dst: reg(),
            },
            Instruction::Binary {
                op: asm_op,
                arg: Self::convert_operand(rhs),
                tgt: reg(),
            },
            Instruction::Mov {
                src: reg(),
                dst: Self::convert_operand(dst),
            },
        ]
    }
    fn gen_mul_instrs(
        t::Binary { op: _, lhs, rhs, dst }: t::Binary,
    ) -> Vec<Instruction<GeneratedAsmAst>> {
        vec![
            Instruction::Mov {
                src: Self::convert_operand(lhs),
                dst: Register::AX.into(),
            },
            Instruction::Imul(Self::convert_operand(rhs)),
            Instruction::Mov {
                src: Register::AX.into(),
                dst: Self::convert_operand(dst),
            },
        ]
    }
    fn gen_divrem_instrs(
        ans_reg: Register,
        t::Binary { op: _, lhs, rhs, dst }: t::Binary,
    ) -> Vec<Instruction<GeneratedAsmAst>> {
        vec![
            Instruction::Mov {
                src: Self::convert_operand(lhs),
                dst: Register::AX.into(),
            },
            Instruction::Cqo,
            Instruction::Idiv(Self::convert_operand(rhs)),
            Instruction::Mov {
                src: ans_reg.into(),
                dst: Self::convert_operand(dst),
            },
        ]
    }
    fn gen_shift_instrs(
        asm_op: BinaryOperator,
        t::Binary { op: _, lhs, rhs, dst }: t::Binary,
    ) -> Vec<Instruction<GeneratedAsmAst>> {
        let reg = || PreFinalOperand::Register(Register::R11);
        vec![
            Instruction::Mov {
                src: Self::convert_operand(rhs),
                dst: Register::CX.into(),
            },
            Instruction::Mov {
                src: Self::convert_operand(lhs),
                dst: reg(),
            },
            Instruction::Binary {
                op: asm_op,
                arg: Register::CX.into(),
                tgt: reg(),
            },
            Instruction::Mov {
                src: reg(),
                dst: Self::convert_operand(dst),
            },
        ]
    }

    /* TAC Jump */

    fn gen_jumpif_instrs(
        t::JumpIf { cond, operand, lbl }: t::JumpIf,
    ) -> Vec<Instruction<GeneratedAsmAst>> {
        use t::JumpCondition as JC;

        let cc = match cond {
            JC::Zero => ConditionCode::E,
            JC::NotZero => ConditionCode::Ne,
            JC::Less => ConditionCode::L,
            JC::LessEq => ConditionCode::Le,
            JC::NotLess => ConditionCode::Ge,
            JC::NotLessEq => ConditionCode::G,
        };
        let reg = || PreFinalOperand::Register(Register::R11);
        vec![
            Instruction::Mov {
                src: Self::convert_operand(operand),
                dst: reg(),
            },
            Instruction::Cmp {
                arg: PreFinalOperand::ImmediateValue(0),
                tgt: reg(),
            },
            Instruction::JmpCC(cc, AsmLabel::Local(lbl)),
        ]
    }

    /* TAC Return */

    fn gen_return_instrs(val: Option<t::Operand>) -> Vec<Instruction<GeneratedAsmAst>> {
        let set_ax = match val {
            Some(val) => Instruction::Mov {
                src: Self::convert_operand(val),
                dst: Register::AX.into(),
            },
            None => Self::zero_ax(),
        };
        vec![set_ax, Instruction::Jmp(AsmLabel::Epilogue)]
    }
    fn zero_ax() -> Instruction<GeneratedAsmAst> {
        Instruction::Binary {
            op: BinaryOperator::Xor,
            arg: Register::AX.into(),
            tgt: Register::AX.into(),
        }
    }

    /* TAC Print */

    /// Two pushes keep the stack 16-byte aligned across the call.
    fn gen_print_instrs(val: t::Operand) -> Vec<Instruction<GeneratedAsmAst>> {
        vec![
            Instruction::Push(Register::DI.into()),
            Instruction::Push(Register::AX.into()),
            Instruction::Mov {
                src: Self::convert_operand(val),
                dst: Register::DI.into(),
            },
            Instruction::Call(GlobalSymbol::new(PRINT_INT_FUN)),
            Instruction::Pop(Register::AX),
            Instruction::Pop(Register::DI),
        ]
    }
}

/// Provided by the C runtime.
pub const PRINT_INT_FUN: &str = "bx_print_int";

use super::{AsmCodeEmitter, TAB, label::LabelLocality};
use crate::stage4_asm_gen::{FinalizedAsmAst, asm_ast::*};
use std::io::{self, Write};

enum OperandByteLen {
    B8,
    B1,
}

impl<W: Write> AsmCodeEmitter<W> {
    pub(super) fn write_proc(
        &mut self,
        Procedure { ident, instrs }: Procedure<FinalizedAsmAst>,
    ) -> Result<(), io::Error> {
        self.write_symbol_visibility(&ident, LabelLocality::OF_PROC)?;
        writeln!(&mut self.w, "{TAB}.text")?;
        self.write_symbol_decl(&ident, LabelLocality::OF_PROC)?;
        writeln!(&mut self.w, "{TAB}pushq{TAB}%rbp")?;
        writeln!(&mut self.w, "{TAB}movq{TAB}%rsp, %rbp")?;
        for instr in instrs {
            self.write_instr(&ident, instr)?;
        }
        Ok(())
    }
    fn write_instr(
        &mut self,
        proc_ident: &GlobalSymbol,
        instr: Instruction<FinalizedAsmAst>,
    ) -> Result<(), io::Error> {
        match instr {
            Instruction::Mov { src, dst } => {
                write!(&mut self.w, "{TAB}movq{TAB}")?;
                self.write_operand(src, OperandByteLen::B8)?;
                write!(&mut self.w, ", ")?;
                self.write_operand(dst, OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Unary(op, operand) => {
                let instr = match op {
                    UnaryOperator::Neg => "negq",
                    UnaryOperator::Not => "notq",
                };
                write!(&mut self.w, "{TAB}{instr}{TAB}")?;
                self.write_operand(operand, OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Binary { op, arg, tgt } => {
                let (instr, arg_bytelen) = match op {
                    BinaryOperator::Add => ("addq", OperandByteLen::B8),
                    BinaryOperator::Sub => ("subq", OperandByteLen::B8),
                    BinaryOperator::And => ("andq", OperandByteLen::B8),
                    BinaryOperator::Or => ("orq", OperandByteLen::B8),
                    BinaryOperator::Xor => ("xorq", OperandByteLen::B8),
                    BinaryOperator::Sal => ("salq", OperandByteLen::B1),
                    BinaryOperator::Sar => ("sarq", OperandByteLen::B1),
                };

                /* Begin emission */

                write!(&mut self.w, "{TAB}{instr}{TAB}")?;
                self.write_operand(arg, arg_bytelen)?;
                write!(&mut self.w, ", ")?;
                self.write_operand(tgt, OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Cmp { arg, tgt } => {
                write!(&mut self.w, "{TAB}cmpq{TAB}")?;
                self.write_operand(arg, OperandByteLen::B8)?;
                write!(&mut self.w, ", ")?;
                self.write_operand(tgt, OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Imul(operand) => {
                write!(&mut self.w, "{TAB}imulq{TAB}")?;
                self.write_operand(operand, OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Idiv(operand) => {
                write!(&mut self.w, "{TAB}idivq{TAB}")?;
                self.write_operand(operand, OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Cqo => {
                writeln!(&mut self.w, "{TAB}cqto")?;
            }
            Instruction::Jmp(lbl) => {
                write!(&mut self.w, "{TAB}jmp{TAB}")?;
                self.write_jump_name(proc_ident, &lbl)?;
                writeln!(&mut self.w)?;
            }
            Instruction::JmpCC(cc, lbl) => {
                let instr_sfx = Self::get_instr_sfx_condition(cc);
                write!(&mut self.w, "{TAB}j{instr_sfx}{TAB}")?;
                self.write_jump_name(proc_ident, &lbl)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Label(lbl) => self.write_jump_decl(proc_ident, &lbl)?,
            Instruction::Push(operand) => {
                write!(&mut self.w, "{TAB}pushq{TAB}")?;
                self.write_operand(operand, OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Pop(reg) => {
                write!(&mut self.w, "{TAB}popq{TAB}")?;
                self.write_operand(Operand::Register(reg), OperandByteLen::B8)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Call(ident) => {
                write!(&mut self.w, "{TAB}callq{TAB}")?;
                self.write_symbol_name(&ident, LabelLocality::OF_PROC)?;
                self.write_fun_call_sfx(&ident)?;
                writeln!(&mut self.w)?;
            }
            Instruction::Ret => {
                writeln!(&mut self.w, "{TAB}movq{TAB}%rbp, %rsp")?;
                writeln!(&mut self.w, "{TAB}popq{TAB}%rbp")?;
                writeln!(&mut self.w, "{TAB}retq")?;
            }
        }
        Ok(())
    }
    fn get_instr_sfx_condition(cc: ConditionCode) -> &'static str {
        match cc {
            ConditionCode::E => "e",
            ConditionCode::Ne => "ne",
            ConditionCode::L => "l",
            ConditionCode::Le => "le",
            ConditionCode::G => "g",
            ConditionCode::Ge => "ge",
        }
    }
    fn write_operand(&mut self, operand: Operand, obl: OperandByteLen) -> Result<(), io::Error> {
        use OperandByteLen as OBL;
        match operand {
            Operand::ImmediateValue(val) => {
                write!(&mut self.w, "${val}")?;
            }
            Operand::Register(reg) => {
                let reg_str = match (reg, obl) {
                    (Register::AX, OBL::B8) => "%rax",
                    (Register::AX, OBL::B1) => "%al",
                    (Register::CX, OBL::B8) => "%rcx",
                    (Register::CX, OBL::B1) => "%cl",
                    (Register::DX, OBL::B8) => "%rdx",
                    (Register::DX, OBL::B1) => "%dl",
                    (Register::DI, OBL::B8) => "%rdi",
                    (Register::DI, OBL::B1) => "%dil",
                    (Register::SI, OBL::B8) => "%rsi",
                    (Register::SI, OBL::B1) => "%sil",
                    (Register::R8, OBL::B8) => "%r8",
                    (Register::R8, OBL::B1) => "%r8b",
                    (Register::R9, OBL::B8) => "%r9",
                    (Register::R9, OBL::B1) => "%r9b",
                    (Register::R10, OBL::B8) => "%r10",
                    (Register::R10, OBL::B1) => "%r10b",
                    (Register::R11, OBL::B8) => "%r11",
                    (Register::R11, OBL::B1) => "%r11b",
                    (Register::SP, _) => "%rsp",
                };
                write!(&mut self.w, "{reg_str}")?;
            }
            Operand::StackPosition(stkpos) => {
                write!(&mut self.w, "{}(%rbp)", *stkpos)?;
            }
            Operand::Data(ident) => {
                self.write_symbol_name(&ident, LabelLocality::OF_GLOBAL_VAR)?;
                write!(&mut self.w, "(%rip)")?;
            }
        }
        Ok(())
    }
    fn write_fun_call_sfx(&mut self, ident: &GlobalSymbol) -> Result<(), io::Error> {
        if cfg!(target_os = "linux") && self.defined_procs.contains(ident) == false {
            /* This is required iff the identifier will be lazily bound by a dynamic linker.
            It doesn't hurt to specify even if the identifier's address offset will become statically known at link-time. */
            write!(&mut self.w, "@PLT")?;
        }
        Ok(())
    }
}

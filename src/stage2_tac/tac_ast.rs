pub use self::{instruction::*, operator::*};
pub use crate::common::identifier::{GlobalSymbol, Label, Temp};
use derive_more::{Display, From};
use std::fmt;

#[derive(PartialEq, Eq, Debug)]
pub struct CompilationUnit {
    pub global_vars: Vec<GlobalVariable>,
    pub procs: Vec<Procedure>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GlobalVariable {
    pub ident: GlobalSymbol,
    pub init: i64,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Procedure {
    pub ident: GlobalSymbol,
    pub formals: Vec<Temp>,
    pub instrs: Vec<Instruction>,
}

/// Anything an instruction can read from or write to.
#[derive(From, Display, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operand {
    Temp(Temp),
    Global(GlobalSymbol),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    Const(Const),
    Copy(SrcDst),
    Unary(Unary),
    Binary(Binary),
    Jump(Label),
    JumpIf(JumpIf),
    Label(Label),
    Param(Param),
    Call(Call),
    Return(Option<Operand>),
    Print(Operand),
    Nop,
}
mod instruction {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Debug)]
    pub struct Const {
        pub value: i64,
        pub dst: Operand,
    }

    #[derive(Clone, PartialEq, Eq, Debug)]
    pub struct SrcDst {
        pub src: Operand,
        pub dst: Operand,
    }

    #[derive(Clone, PartialEq, Eq, Debug)]
    pub struct Unary {
        pub op: UnaryOperator,
        pub src: Operand,
        pub dst: Operand,
    }

    #[derive(Clone, PartialEq, Eq, Debug)]
    pub struct Binary {
        pub op: BinaryOperator,
        pub lhs: Operand,
        pub rhs: Operand,
        pub dst: Operand,
    }

    /// Jumps iff `operand` compared against zero satisfies `cond`.
    #[derive(Clone, PartialEq, Eq, Debug)]
    pub struct JumpIf {
        pub cond: JumpCondition,
        pub operand: Operand,
        pub lbl: Label,
    }

    /// `index` is 1-based.
    #[derive(Clone, PartialEq, Eq, Debug)]
    pub struct Param {
        pub index: u32,
        pub arg: Operand,
    }

    #[derive(Clone, PartialEq, Eq, Debug)]
    pub struct Call {
        pub callee: GlobalSymbol,
        pub arg_count: u32,
        pub dst: Option<Operand>,
    }
}

mod operator {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum UnaryOperator {
        Negate,
        Complement,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum BinaryOperator {
        Add,
        Sub,
        Mul,
        Div,
        Mod,
        And,
        Or,
        Xor,
        Shl,
        Shr,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum JumpCondition {
        Zero,
        NotZero,
        Less,
        LessEq,
        NotLess,
        NotLessEq,
    }
}

impl UnaryOperator {
    pub const ALL: [Self; 2] = [Self::Negate, Self::Complement];

    pub fn opcode(&self) -> &'static str {
        match self {
            Self::Negate => "neg",
            Self::Complement => "not",
        }
    }
}
impl BinaryOperator {
    pub const ALL: [Self; 10] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Shl,
        Self::Shr,
    ];

    pub fn opcode(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Shl => "shl",
            Self::Shr => "shr",
        }
    }
}
impl JumpCondition {
    pub const ALL: [Self; 6] = [
        Self::Zero,
        Self::NotZero,
        Self::Less,
        Self::LessEq,
        Self::NotLess,
        Self::NotLessEq,
    ];

    pub fn opcode(&self) -> &'static str {
        match self {
            Self::Zero => "jz",
            Self::NotZero => "jnz",
            Self::Less => "jl",
            Self::LessEq => "jle",
            Self::NotLess => "jnl",
            Self::NotLessEq => "jnle",
        }
    }
}

impl Instruction {
    pub fn opcode(&self) -> &'static str {
        match self {
            Self::Const(_) => "const",
            Self::Copy(_) => "copy",
            Self::Unary(Unary { op, .. }) => op.opcode(),
            Self::Binary(Binary { op, .. }) => op.opcode(),
            Self::Jump(_) => "jmp",
            Self::JumpIf(JumpIf { cond, .. }) => cond.opcode(),
            Self::Label(_) => "label",
            Self::Param(_) => "param",
            Self::Call(_) => "call",
            Self::Return(_) => "ret",
            Self::Print(_) => "print",
            Self::Nop => "nop",
        }
    }

    /// The location this instruction writes, if any.
    pub fn dst(&self) -> Option<&Operand> {
        match self {
            Self::Const(Const { dst, .. })
            | Self::Copy(SrcDst { dst, .. })
            | Self::Unary(Unary { dst, .. })
            | Self::Binary(Binary { dst, .. }) => Some(dst),
            Self::Call(Call { dst, .. }) => dst.as_ref(),
            Self::Jump(_)
            | Self::JumpIf(_)
            | Self::Label(_)
            | Self::Param(_)
            | Self::Return(_)
            | Self::Print(_)
            | Self::Nop => None,
        }
    }

    pub fn jump_target(&self) -> Option<&Label> {
        match self {
            Self::Jump(lbl) | Self::JumpIf(JumpIf { lbl, .. }) => Some(lbl),
            _ => None,
        }
    }

    /// Whether control never falls through to the next instruction.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Jump(_) | Self::Return(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opcode = self.opcode();
        match self {
            Self::Const(Const { value, dst }) => write!(f, "{dst} = {opcode} {value}"),
            Self::Copy(SrcDst { src, dst }) => write!(f, "{dst} = {opcode} {src}"),
            Self::Unary(Unary { src, dst, .. }) => write!(f, "{dst} = {opcode} {src}"),
            Self::Binary(Binary { lhs, rhs, dst, .. }) => {
                write!(f, "{dst} = {opcode} {lhs}, {rhs}")
            }
            Self::Jump(lbl) => write!(f, "{opcode} {lbl}"),
            Self::JumpIf(JumpIf { operand, lbl, .. }) => write!(f, "{opcode} {operand}, {lbl}"),
            Self::Label(lbl) => write!(f, "{lbl}:"),
            Self::Param(Param { index, arg }) => write!(f, "{opcode} {index}, {arg}"),
            Self::Call(Call { callee, arg_count, dst }) => match dst {
                Some(dst) => write!(f, "{dst} = {opcode} {callee}, {arg_count}"),
                None => write!(f, "{opcode} {callee}, {arg_count}"),
            },
            Self::Return(Some(val)) | Self::Print(val) => write!(f, "{opcode} {val}"),
            Self::Return(None) | Self::Nop => write!(f, "{opcode}"),
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proc {}(", self.ident)?;
        for (i, formal) in self.formals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{formal}")?;
        }
        writeln!(f, "):")?;
        for instr in self.instrs.iter() {
            match instr {
                Instruction::Label(_) => writeln!(f, "  {instr}")?,
                _ => writeln!(f, "    {instr};")?,
            }
        }
        Ok(())
    }
}

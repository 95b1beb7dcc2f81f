pub use crate::common::identifier::{GlobalSymbol, Label, Temp};
use derive_more::{Deref, DerefMut, From};
use std::fmt::Debug;

pub trait AsmAstVariant {
    type Instructions: Debug;
    type Operand: Debug;
}

#[derive(Debug)]
pub struct Program<T: AsmAstVariant> {
    pub global_vars: Vec<GlobalVariable>,
    pub procs: Vec<Procedure<T>>,
}

#[derive(Debug)]
pub struct GlobalVariable {
    pub ident: GlobalSymbol,
    pub init: i64,
}

#[derive(Debug)]
pub struct Procedure<T: AsmAstVariant> {
    pub ident: GlobalSymbol,
    pub instrs: T::Instructions,
}

#[derive(Debug)]
pub enum Instruction<T: AsmAstVariant> {
    Mov {
        src: T::Operand,
        dst: T::Operand,
    },
    Unary(UnaryOperator, T::Operand),
    Binary {
        op: BinaryOperator,
        arg: T::Operand, // Semantic RHS. Asm operand #1.
        tgt: T::Operand, // Semantic LHS, as well as output. Asm operand #2.
    },
    Cmp {
        arg: T::Operand, // Semantic RHS. Asm operand #1.
        tgt: T::Operand, // Semantic LHS, non-modified. Asm operand #2.
    },
    /// `%rdx:%rax <- %rax * operand`
    Imul(T::Operand),
    Idiv(T::Operand),
    Cqo,
    Jmp(AsmLabel),
    JmpCC(ConditionCode, AsmLabel),
    Label(AsmLabel),
    Push(T::Operand),
    Pop(Register),
    Call(GlobalSymbol),
    /// Tears down the frame and returns. Emitted once per procedure, after the epilogue label.
    Ret,
}

#[derive(Debug)]
pub enum UnaryOperator {
    Neg,
    Not,
}

#[derive(Debug)]
pub enum BinaryOperator {
    Add,
    Sub,
    And,
    Or,
    Xor,
    /// The shift count must be `%cl`.
    Sal,
    Sar,
}

/// Each label is local to its procedure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AsmLabel {
    Local(Label),
    Epilogue,
}

#[derive(From, Clone, Debug)]
pub enum PreFinalOperand {
    ImmediateValue(i64),
    Register(Register),
    StackPosition(StackPosition),
    Data(GlobalSymbol),
    Pseudo(Temp),
}

#[derive(From, Clone, Debug)]
pub enum Operand {
    ImmediateValue(i64),
    Register(Register),
    StackPosition(StackPosition),
    /// RIP-relative.
    Data(GlobalSymbol),
}
impl Operand {
    pub fn is_on_mem(&self) -> bool {
        match self {
            Self::ImmediateValue(_) | Self::Register(_) => false,
            Self::StackPosition(_) | Self::Data(_) => true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Register {
    AX,
    CX,
    DX,
    DI,
    SI,
    R8,
    R9,
    R10,
    R11,
    SP,
}

/// Offset from RBP.
#[derive(Clone, Copy, PartialEq, Eq, Deref, DerefMut, Debug)]
pub struct StackPosition(pub(super) i64);

#[derive(Clone, Copy, Debug)]
pub enum ConditionCode {
    E,
    Ne,
    L,
    Le,
    G,
    Ge,
}

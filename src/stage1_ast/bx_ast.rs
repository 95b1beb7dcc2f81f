pub use self::{expression::*, operator::*, statement::*};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Program {
    pub global_vars: Vec<GlobalVariableDefinition>,
    pub procs: Vec<ProcedureDefinition>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GlobalVariableDefinition {
    pub ident: String,
    pub typ: Type,
    pub init: Const,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProcedureDefinition {
    pub ident: String,
    pub params: Vec<Parameter>,
    pub ret_typ: Type,
    pub body: Block,
    #[serde(default)]
    pub sloc: Sloc,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Parameter {
    pub ident: String,
    pub typ: Type,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Type {
    Int,
    Bool,
    Void,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Const {
    Int(i64),
    Bool(bool),
}
impl Const {
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Int(i) => *i,
            Self::Bool(b) => *b as i64,
        }
    }
}

/// Source location, as far as the front end could tell.
#[derive(Serialize, Deserialize, Display, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[display("line {line}")]
#[serde(default)]
pub struct Sloc {
    pub line: u32,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Block {
    pub stmts: Vec<Statement>,
}

mod statement {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    pub enum Statement {
        VarDecl(VariableDefinition),
        Assign(Assignment),
        Eval(TypedExpression),
        Print(TypedExpression),
        IfElse(IfElse),
        While(While),
        Break(Sloc),
        Continue(Sloc),
        Block(Block),
        Return(Option<TypedExpression>),
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct VariableDefinition {
        pub ident: String,
        pub typ: Type,
        pub init: TypedExpression,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Assignment {
        pub lhs: String,
        pub rhs: TypedExpression,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct IfElse {
        pub condition: TypedExpression,
        pub then: Block,
        /// An `else if` arrives as an else-block holding a single [`Statement::IfElse`].
        pub elze: Option<Block>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct While {
        pub condition: TypedExpression,
        pub body: Block,
    }
}

mod expression {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    pub struct TypedExpression {
        pub exp: Expression,
        pub typ: Type,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub enum Expression {
        Var(String),
        Int(i64),
        Bool(bool),
        Unary(Unary),
        Binary(Binary),
        Call(Call),
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Unary {
        pub op: UnaryOperator,
        pub arg: Box<TypedExpression>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Binary {
        pub op: BinaryOperator,
        pub lhs: Box<TypedExpression>,
        pub rhs: Box<TypedExpression>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Call {
        pub callee: String,
        pub args: Vec<TypedExpression>,
    }
}

mod operator {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
    pub enum UnaryOperator {
        /* int -> int */
        Negate,
        Complement,
        /* bool -> bool */
        Not,
    }

    #[derive(Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Debug)]
    pub enum BinaryOperator {
        /* int, int -> int */
        Add,
        Sub,
        Mul,
        Div,
        Mod,
        BitAnd,
        BitOr,
        BitXor,
        Shl,
        Shr,
        /* int, int -> bool */
        Eq,
        Neq,
        Lt,
        Lte,
        Gt,
        Gte,
        /* bool, bool -> bool */
        And,
        Or,
    }
}

//! Builders for typed ASTs, standing in for the external front end.

use crate::stage1_ast::bx_ast::*;

pub fn int(i: i64) -> TypedExpression {
    TypedExpression {
        exp: Expression::Int(i),
        typ: Type::Int,
    }
}
pub fn boolean(b: bool) -> TypedExpression {
    TypedExpression {
        exp: Expression::Bool(b),
        typ: Type::Bool,
    }
}
pub fn var(name: &str) -> TypedExpression {
    TypedExpression {
        exp: Expression::Var(name.to_string()),
        typ: Type::Int,
    }
}
pub fn bool_var(name: &str) -> TypedExpression {
    TypedExpression {
        exp: Expression::Var(name.to_string()),
        typ: Type::Bool,
    }
}
pub fn unary(op: UnaryOperator, arg: TypedExpression) -> TypedExpression {
    let typ = match op {
        UnaryOperator::Negate | UnaryOperator::Complement => Type::Int,
        UnaryOperator::Not => Type::Bool,
    };
    TypedExpression {
        exp: Expression::Unary(Unary {
            op,
            arg: Box::new(arg),
        }),
        typ,
    }
}
pub fn binary(op: BinaryOperator, lhs: TypedExpression, rhs: TypedExpression) -> TypedExpression {
    use BinaryOperator as BO;
    let typ = match op {
        BO::Add | BO::Sub | BO::Mul | BO::Div | BO::Mod => Type::Int,
        BO::BitAnd | BO::BitOr | BO::BitXor | BO::Shl | BO::Shr => Type::Int,
        BO::Eq | BO::Neq | BO::Lt | BO::Lte | BO::Gt | BO::Gte => Type::Bool,
        BO::And | BO::Or => Type::Bool,
    };
    TypedExpression {
        exp: Expression::Binary(Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }),
        typ,
    }
}
pub fn call(callee: &str, args: Vec<TypedExpression>, typ: Type) -> TypedExpression {
    TypedExpression {
        exp: Expression::Call(Call {
            callee: callee.to_string(),
            args,
        }),
        typ,
    }
}

pub fn decl(name: &str, typ: Type, init: TypedExpression) -> Statement {
    Statement::VarDecl(VariableDefinition {
        ident: name.to_string(),
        typ,
        init,
    })
}
pub fn assign(lhs: &str, rhs: TypedExpression) -> Statement {
    Statement::Assign(Assignment {
        lhs: lhs.to_string(),
        rhs,
    })
}
pub fn print(exp: TypedExpression) -> Statement {
    Statement::Print(exp)
}
pub fn eval(exp: TypedExpression) -> Statement {
    Statement::Eval(exp)
}
pub fn if_else(condition: TypedExpression, then: Vec<Statement>, elze: Option<Vec<Statement>>) -> Statement {
    Statement::IfElse(IfElse {
        condition,
        then: Block { stmts: then },
        elze: elze.map(|stmts| Block { stmts }),
    })
}
pub fn wile(condition: TypedExpression, body: Vec<Statement>) -> Statement {
    Statement::While(While {
        condition,
        body: Block { stmts: body },
    })
}
pub fn brk() -> Statement {
    Statement::Break(Sloc { line: 1 })
}
pub fn cont() -> Statement {
    Statement::Continue(Sloc { line: 1 })
}
pub fn ret(exp: Option<TypedExpression>) -> Statement {
    Statement::Return(exp)
}

pub fn proc(ident: &str, params: &[(&str, Type)], ret_typ: Type, stmts: Vec<Statement>) -> ProcedureDefinition {
    ProcedureDefinition {
        ident: ident.to_string(),
        params: params
            .iter()
            .map(|(ident, typ)| Parameter {
                ident: ident.to_string(),
                typ: *typ,
            })
            .collect(),
        ret_typ,
        body: Block { stmts },
        sloc: Sloc::default(),
    }
}
pub fn global(ident: &str, typ: Type, init: Const) -> GlobalVariableDefinition {
    GlobalVariableDefinition {
        ident: ident.to_string(),
        typ,
        init,
    }
}
pub fn program(global_vars: Vec<GlobalVariableDefinition>, procs: Vec<ProcedureDefinition>) -> Program {
    Program { global_vars, procs }
}

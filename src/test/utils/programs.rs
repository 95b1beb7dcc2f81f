//! Whole programs shared by several test modules.

use super::ast::*;
use crate::stage1_ast::bx_ast::{BinaryOperator as BO, Const, Program, Type, UnaryOperator as UO};

/// `check(a)` prints 1 iff `a > 0`, and is called with 5 then with -3.
pub fn sign_check_prog() -> Program {
    let check = proc(
        "check",
        &[("a", Type::Int)],
        Type::Void,
        vec![
            decl("x", Type::Int, int(0)),
            if_else(
                binary(BO::Gt, var("a"), int(0)),
                vec![assign("x", int(1))],
                Some(vec![assign("x", int(0))]),
            ),
            print(var("x")),
        ],
    );
    let main = proc(
        "main",
        &[],
        Type::Void,
        vec![
            eval(call("check", vec![int(5)], Type::Void)),
            eval(call("check", vec![int(-3)], Type::Void)),
        ],
    );
    program(vec![], vec![check, main])
}

/// Sums the odd numbers in 1..=5, skipping even ones with `continue`.
pub fn odd_sum_prog() -> Program {
    let main = proc(
        "main",
        &[],
        Type::Void,
        vec![
            decl("i", Type::Int, int(0)),
            decl("s", Type::Int, int(0)),
            wile(
                binary(BO::Lt, var("i"), int(5)),
                vec![
                    assign("i", binary(BO::Add, var("i"), int(1))),
                    if_else(
                        binary(BO::Eq, binary(BO::Mod, var("i"), int(2)), int(0)),
                        vec![cont()],
                        None,
                    ),
                    assign("s", binary(BO::Add, var("s"), var("i"))),
                ],
            ),
            print(var("s")),
        ],
    );
    program(vec![], vec![main])
}

/// `seven` takes seven args and returns its last one.
pub fn seven_args_prog() -> Program {
    let formals = ["a", "b", "c", "d", "e", "f", "g"].map(|name| (name, Type::Int));
    let seven = proc("seven", &formals, Type::Int, vec![ret(Some(var("g")))]);
    let main = proc(
        "main",
        &[],
        Type::Void,
        vec![print(call(
            "seven",
            (1..=7).map(|i| int(i * 10)).collect(),
            Type::Int,
        ))],
    );
    program(vec![], vec![seven, main])
}

/// `set_and_call` writes the global `g`, then calls `show`, which prints it.
pub fn shared_global_prog() -> Program {
    let set_and_call = proc(
        "set_and_call",
        &[],
        Type::Void,
        vec![
            assign("g", int(42)),
            eval(call("show", vec![], Type::Void)),
        ],
    );
    let show = proc("show", &[], Type::Void, vec![print(var("g"))]);
    let main = proc(
        "main",
        &[],
        Type::Void,
        vec![eval(call("set_and_call", vec![], Type::Void))],
    );
    program(
        vec![global("g", Type::Int, Const::Int(0))],
        vec![set_and_call, show, main],
    )
}

/// Exercises every operator, nested calls, short circuits, `break`, and an early `return`.
pub fn kitchen_sink_prog() -> Program {
    let fib = proc(
        "fib",
        &[("n", Type::Int)],
        Type::Int,
        vec![
            if_else(
                binary(BO::Lte, var("n"), int(1)),
                vec![ret(Some(var("n")))],
                None,
            ),
            ret(Some(binary(
                BO::Add,
                call("fib", vec![binary(BO::Sub, var("n"), int(1))], Type::Int),
                call("fib", vec![binary(BO::Sub, var("n"), int(2))], Type::Int),
            ))),
        ],
    );
    let is_even = proc(
        "is_even",
        &[("n", Type::Int)],
        Type::Bool,
        vec![ret(Some(binary(
            BO::Eq,
            binary(BO::BitAnd, var("n"), int(1)),
            int(0),
        )))],
    );
    let main = proc(
        "main",
        &[],
        Type::Void,
        vec![
            decl("i", Type::Int, int(0)),
            decl("b", Type::Bool, boolean(true)),
            wile(
                boolean(true),
                vec![
                    if_else(binary(BO::Gte, var("i"), int(8)), vec![brk()], None),
                    if_else(
                        binary(
                            BO::And,
                            bool_var("b"),
                            call("is_even", vec![var("i")], Type::Bool),
                        ),
                        vec![print(call("fib", vec![var("i")], Type::Int))],
                        Some(vec![print(unary(
                            UO::Negate,
                            var("i"),
                        ))]),
                    ),
                    assign(
                        "b",
                        binary(
                            BO::Or,
                            unary(UO::Not, bool_var("b")),
                            binary(BO::Gt, var("i"), int(4)),
                        ),
                    ),
                    assign("i", binary(BO::Add, var("i"), int(1))),
                ],
            ),
            print(binary(BO::Shl, int(3), int(4))),
            print(binary(BO::Shr, int(-64), int(3))),
            print(binary(BO::Div, int(-7), int(2))),
            print(binary(BO::Mod, int(-7), int(2))),
            print(binary(BO::BitXor, int(6), int(3))),
            print(binary(BO::BitOr, int(6), int(3))),
            print(binary(BO::Mul, int(-6), int(7))),
            print(unary(
                UO::Complement,
                int(0),
            )),
            print(bool_var("b")),
            ret(None),
            print(int(999)),
        ],
    );
    program(vec![], vec![fib, is_even, main])
}

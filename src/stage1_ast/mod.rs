//! The typed, scope-resolved AST handed over by the front end.
//!
//! Lexing, parsing and type checking happen upstream. By the time a [`bx_ast::Program`] reaches this crate,
//! every expression carries its static type, every name is bound, every `break`/`continue` sits inside a loop,
//! and a `main` procedure exists.

pub mod bx_ast;

//! + Translate each procedure from a tree into a flat sequence of three-address instructions, by maximal munch.
//! + Give each intermediary value its own fresh temporary, and each declared variable its own temporary,
//!     resolved through a chain of lexical scopes that bottoms out at the global variables.
//! + Lower boolean conditions directly into jumps, never into 0/1 values, wherever control flow consumes them.

mod branch;
mod conditional;
mod exp;
mod helpers;
mod looping;
mod scope;

use self::{looping::BreakContinueStack, scope::ScopeChain};
use crate::{
    common::identifier::IdCounter,
    stage1_ast::bx_ast as bx,
    stage2_tac::tac_ast::*,
    utils::noop,
};
use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;

#[derive(Default)]
pub struct Tackifier {
    global_scope: HashMap<String, GlobalSymbol>,
}
impl Tackifier {
    pub fn tackify_program(
        mut self,
        bx::Program { global_vars, procs }: bx::Program,
    ) -> Result<CompilationUnit> {
        let global_vars = global_vars
            .into_iter()
            .map(|var| self.tackify_global_var(var))
            .collect::<Vec<_>>();

        let procs = procs
            .into_iter()
            .map(|proc| {
                let gener = FunInstrsGenerator::new(&self.global_scope);
                gener.tackify_proc_defn(proc)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompilationUnit { global_vars, procs })
    }

    fn tackify_global_var(
        &mut self,
        bx::GlobalVariableDefinition { ident, typ: _, init }: bx::GlobalVariableDefinition,
    ) -> GlobalVariable {
        let symbol = GlobalSymbol::new(&ident[..]);
        self.global_scope.insert(ident, symbol.clone());
        GlobalVariable {
            ident: symbol,
            init: init.as_i64(),
        }
    }
}

// `pub` for rustdoc.
pub(crate) struct FunInstrsGenerator<'a> {
    scope_chain: ScopeChain<'a>,

    break_continue_stack: BreakContinueStack,

    temp_ids: IdCounter,
    label_ids: IdCounter,

    instrs: Vec<Instruction>,
}
impl<'a> FunInstrsGenerator<'a> {
    fn new(global_scope: &'a HashMap<String, GlobalSymbol>) -> Self {
        Self {
            scope_chain: ScopeChain::new(global_scope),
            break_continue_stack: Default::default(),
            temp_ids: Default::default(),
            label_ids: Default::default(),
            instrs: Default::default(),
        }
    }

    fn new_temp(&mut self) -> Temp {
        Temp::new_generated(&mut self.temp_ids)
    }
    fn new_labels<const LEN: usize>(&mut self) -> [Label; LEN] {
        std::array::from_fn(|_| Label::new_generated(&mut self.label_ids))
    }
}

/// Definition
impl FunInstrsGenerator<'_> {
    fn tackify_proc_defn(
        mut self,
        bx::ProcedureDefinition {
            ident,
            params,
            ret_typ: _,
            body,
            sloc,
        }: bx::ProcedureDefinition,
    ) -> Result<Procedure> {
        let formals = params
            .into_iter()
            .map(|bx::Parameter { ident, typ: _ }| (ident.clone(), Temp::new(ident)))
            .collect::<Vec<_>>();

        self.with_scope(|gener| {
            for (name, formal) in formals.iter() {
                gener.scope_chain.bind(name.clone(), formal.clone());
            }
            gener.gen_block(body)
        })
        .with_context(|| format!("In procedure `{ident}` at {sloc}"))?;

        log::debug!("@{ident}: generated {} instructions", self.instrs.len());

        Ok(Procedure {
            ident: GlobalSymbol::new(ident),
            formals: formals.into_iter().map(|(_, formal)| formal).collect(),
            instrs: self.instrs,
        })
    }
}

/// Block
impl FunInstrsGenerator<'_> {
    fn gen_block(&mut self, bx::Block { stmts }: bx::Block) -> Result<()> {
        self.with_scope(|gener| {
            for stmt in stmts {
                gener.gen_stmt(stmt)?;
            }
            Ok(())
        })
    }
}

/// Statement
impl FunInstrsGenerator<'_> {
    fn gen_stmt(&mut self, stmt: bx::Statement) -> Result<()> {
        match stmt {
            bx::Statement::VarDecl(var_defn) => self.gen_var_defn(var_defn)?,
            bx::Statement::Assign(bx::Assignment { lhs, rhs }) => {
                let dst = self
                    .scope_chain
                    .lookup(&lhs)
                    .ok_or_else(|| anyhow!("Internal compiler error: assignment to unbound `{lhs}`"))?;
                self.gen_exp_into(rhs, dst)?;
            }
            bx::Statement::Eval(exp) => self.gen_stmt_eval(exp)?,
            bx::Statement::Print(exp) => {
                let val = self.gen_exp_and_get_value(exp)?;
                self.instrs.push(Instruction::Print(val));
            }
            bx::Statement::IfElse(if_else) => self.gen_stmt_conditional(if_else)?,
            bx::Statement::While(wile) => self.gen_stmt_while(wile)?,
            bx::Statement::Break(sloc) => self.gen_stmt_break(sloc)?,
            bx::Statement::Continue(sloc) => self.gen_stmt_continue(sloc)?,
            bx::Statement::Block(block) => self.gen_block(block)?,
            bx::Statement::Return(exp) => {
                let val = exp.map(|exp| self.gen_exp_and_get_value(exp)).transpose()?;
                self.instrs.push(Instruction::Return(val));
            }
        }
        Ok(())
    }

    fn gen_var_defn(
        &mut self,
        bx::VariableDefinition { ident, typ: _, init }: bx::VariableDefinition,
    ) -> Result<()> {
        /* The initializer is evaluated before the new binding shadows any outer one. */
        let dst = self.new_temp();
        self.gen_exp_into(init, Operand::Temp(dst.clone()))?;
        self.scope_chain.bind(ident, dst);
        Ok(())
    }

    fn gen_stmt_eval(&mut self, bx::TypedExpression { exp, typ }: bx::TypedExpression) -> Result<()> {
        match exp {
            bx::Expression::Call(call) => {
                let dst = match typ {
                    bx::Type::Void => None,
                    bx::Type::Int | bx::Type::Bool => Some(Operand::Temp(self.new_temp())),
                };
                self.gen_call(call, dst)?;
            }
            exp => {
                let exp = bx::TypedExpression { exp, typ };
                match typ {
                    bx::Type::Void => noop!(),
                    bx::Type::Int | bx::Type::Bool => {
                        self.gen_exp_and_get_value(exp)?;
                    }
                }
            }
        }
        Ok(())
    }
}

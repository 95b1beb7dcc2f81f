use super::FunInstrsGenerator;
use crate::stage2_tac::tac_ast::{GlobalSymbol, Operand, Temp};
use anyhow::Result;
use std::collections::HashMap;

/// Innermost frame last. The global scope is consulted only when no local frame binds the name.
pub struct ScopeChain<'a> {
    global_scope: &'a HashMap<String, GlobalSymbol>,
    frames: Vec<HashMap<String, Temp>>,
}
impl<'a> ScopeChain<'a> {
    pub fn new(global_scope: &'a HashMap<String, GlobalSymbol>) -> Self {
        Self {
            global_scope,
            frames: vec![],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Operand> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .map(|temp| Operand::Temp(temp.clone()))
            .or_else(|| {
                self.global_scope
                    .get(name)
                    .map(|symbol| Operand::Global(symbol.clone()))
            })
    }

    /// Binds in the innermost frame, shadowing any outer binding of the same name.
    pub fn bind(&mut self, name: String, temp: Temp) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, temp);
        }
    }

    fn push(&mut self) {
        self.frames.push(HashMap::new());
    }
    fn pop(&mut self) {
        self.frames.pop();
    }
}

impl FunInstrsGenerator<'_> {
    /// The frame is popped whether or not `f` succeeds.
    pub(super) fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.scope_chain.push();
        let res = f(self);
        self.scope_chain.pop();
        res
    }
}

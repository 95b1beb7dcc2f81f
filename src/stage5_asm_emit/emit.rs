mod data;
mod fun;
mod label;

use crate::stage4_asm_gen::{FinalizedAsmAst, asm_ast::*};
use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use std::io::{self, Write};

const TAB: &str = "\t";

pub struct AsmCodeEmitter<W: Write> {
    w: W,

    label_bad_char: Regex,

    /// Calls to anything else are resolved by the linker, eg into the C runtime.
    defined_procs: HashSet<GlobalSymbol>,
}
impl<W: Write> AsmCodeEmitter<W> {
    pub fn new(w: W) -> Result<Self> {
        let label_bad_char = Regex::new(r"[^a-zA-Z0-9._]")?;
        Ok(Self {
            w,
            label_bad_char,
            defined_procs: HashSet::new(),
        })
    }

    pub fn emit_program(
        mut self,
        Program { global_vars, procs }: Program<FinalizedAsmAst>,
    ) -> Result<(), io::Error> {
        self.defined_procs = procs.iter().map(|proc| proc.ident.clone()).collect();

        for var in global_vars {
            self.write_global_var(var)?;
        }

        for proc in procs {
            self.write_proc(proc)?;
        }

        if cfg!(target_os = "linux") {
            writeln!(&mut self.w, "{TAB}.section{TAB}.note.GNU-stack,\"\",@progbits")?;
        }

        self.w.flush()?;
        Ok(())
    }
}

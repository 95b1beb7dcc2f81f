use crate::{
    stage2_tac::tac_ast as t,
    stage4_asm_gen::{
        asm_ast::*,
        phase1_generate::InstrsGenerator,
        phase2_finalize::{FinalizedAsmAst, InstrsFinalizer},
    },
};
use anyhow::{Context, Result};

#[derive(Default)]
pub struct AsmCodeGenerator {}
impl AsmCodeGenerator {
    pub fn gen_program(
        self,
        t::CompilationUnit { global_vars, procs }: t::CompilationUnit,
    ) -> Result<Program<FinalizedAsmAst>> {
        let global_vars = global_vars
            .into_iter()
            .map(Self::convert_global_var)
            .collect::<Vec<_>>();

        let procs = procs
            .into_iter()
            .map(|t_proc| {
                let ident = t_proc.ident.clone();

                /* Instrs phase 1 */
                let generator = InstrsGenerator::default();
                let proc = generator
                    .convert_proc(t_proc)
                    .with_context(|| format!("While lowering {ident}"))?;

                /* Instrs phase 2 and 3 */
                let fin = InstrsFinalizer::default();
                let proc = fin.finalize_proc(proc);

                log::debug!("{ident}: lowered to {} asm instructions", proc.instrs.len());

                Ok(proc)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Program { global_vars, procs })
    }

    fn convert_global_var(t::GlobalVariable { ident, init }: t::GlobalVariable) -> GlobalVariable {
        GlobalVariable { ident, init }
    }
}

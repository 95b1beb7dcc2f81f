//! Per-procedure control-flow graphs.
//!
//! + Phase 1: normalize a flat stream so that every transfer of control is an explicit instruction,
//!     then partition it into extended blocks.
//! + Phase 2: rewrite the graph (jump threading, unreachable-code elimination, coalescing) until it stops changing.
//! + Phase 3: serialize the graph back into a flat stream.

mod block_graph;
mod phase1_build;
mod phase2_optimize;
mod phase3_serialize;

#[cfg(test)]
pub use phase1_build::CfgBuilder;
pub use phase2_optimize::CfgOptimizer;

use crate::stage2_tac::tac_ast::{CompilationUnit, Procedure};
use anyhow::{Context, Result};

pub fn optimize_unit(
    CompilationUnit { global_vars, procs }: CompilationUnit,
) -> Result<CompilationUnit> {
    let procs = procs
        .into_iter()
        .map(|Procedure { ident, formals, instrs }| {
            let instrs = CfgOptimizer::optimize(instrs)
                .with_context(|| format!("While optimizing {ident}"))?;
            Ok(Procedure { ident, formals, instrs })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CompilationUnit { global_vars, procs })
}

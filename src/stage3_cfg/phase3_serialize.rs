use super::block_graph::BlockGraph;
use crate::stage2_tac::tac_ast::Instruction;
use anyhow::Result;

/// Lays the reachable blocks out in DFS preorder, then drops each `jmp` to the label immediately following it.
pub fn serialize(graph: &BlockGraph) -> Result<Vec<Instruction>> {
    let instrs = graph.dfs_instrs()?;

    let mut out: Vec<Instruction> = Vec::with_capacity(instrs.len());
    for instr in instrs {
        let follows_own_jump = matches!(
            (&instr, out.last()),
            (Instruction::Label(lbl), Some(Instruction::Jump(tgt))) if lbl == tgt
        );
        if follows_own_jump {
            out.pop();
        }
        out.push(instr);
    }

    log::trace!(
        "Serialized:\n{}",
        out.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    );

    Ok(out)
}

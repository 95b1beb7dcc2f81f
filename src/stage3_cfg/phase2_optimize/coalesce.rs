use super::CfgOptimizer;
use crate::{
    stage2_tac::tac_ast::*,
    stage3_cfg::block_graph::BlockGraph,
};
use anyhow::Result;

impl CfgOptimizer {
    /// Each merge removes one block, so this terminates.
    pub(super) fn coalesce(&mut self, mut graph: BlockGraph) -> Result<BlockGraph> {
        let mut merged_count = 0;
        while let Some((parent, child)) = find_coalescible_pair(&graph) {
            merge(&mut graph, &parent, &child)?;
            merged_count += 1;

            graph = self.eliminate_unreachable(graph)?;
        }

        if merged_count > 0 {
            log::debug!("Coalesced {merged_count} pairs of blocks");
        }

        Ok(graph)
    }
}

/// A parent whose only edge leads, by its terminating `jmp`, to a non-entry child whose only parent it is.
fn find_coalescible_pair(graph: &BlockGraph) -> Option<(Label, Label)> {
    graph.iter().find_map(|parent| {
        let child = match &parent.children()[..] {
            [child] => child,
            _ => return None,
        };
        let is_candidate = child != parent.entry_label()
            && child != graph.entry()
            && matches!(parent.instrs().last(), Some(Instruction::Jump(lbl)) if lbl == child)
            && graph
                .get(child)
                .is_ok_and(|child| child.parents().len() == 1);
        is_candidate.then(|| (parent.entry_label().clone(), child.clone()))
    })
}

fn merge(graph: &mut BlockGraph, parent: &Label, child: &Label) -> Result<()> {
    let child_instrs = graph.get(child)?.instrs().clone();

    graph.inherit_children(parent, child)?;

    let instrs = graph.get_mut(parent)?.instrs_mut();
    instrs.pop();
    /* The child's own label is dropped, as nothing else jumps to it. */
    instrs.extend(child_instrs.into_iter().skip(1));

    graph.remove(child)?;

    Ok(())
}

use super::CfgOptimizer;
use crate::stage3_cfg::block_graph::BlockGraph;
use anyhow::Result;

impl CfgOptimizer {
    /// Re-derives the graph from its own DFS serialization.
    /// Whatever the traversal does not reach is thereby gone, and the layout order follows the traversal.
    pub(super) fn eliminate_unreachable(&mut self, graph: BlockGraph) -> Result<BlockGraph> {
        let blocks_before = graph.len();

        let instrs = graph.dfs_instrs()?;
        let graph = self.builder.build(instrs)?;

        let removed_count = blocks_before - graph.len();
        if removed_count > 0 {
            log::debug!("Eliminated {removed_count} unreachable blocks");
        }

        Ok(graph)
    }
}

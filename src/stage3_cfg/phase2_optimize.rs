//! + Thread jumps through chains of empty blocks, and through conditional branches whose outcome is already known.
//! + Drop every block that is unreachable from the entry.
//! + Merge each block into its sole predecessor, wherever the edge between them is one-to-one.
//!
//! The three passes are repeated until the serialized stream no longer changes.

mod coalesce;
mod jump_thread;
mod uce;

use super::{block_graph::BlockGraph, phase1_build::CfgBuilder, phase3_serialize};
use crate::stage2_tac::tac_ast::Instruction;
use anyhow::Result;

pub struct CfgOptimizer {
    builder: CfgBuilder,
}
impl CfgOptimizer {
    pub fn optimize(instrs: Vec<Instruction>) -> Result<Vec<Instruction>> {
        let mut optimizer = Self {
            builder: CfgBuilder::default(),
        };

        let mut graph = optimizer.builder.build(instrs)?;
        let blocks_before = graph.len();

        let mut prev_instrs = graph.dfs_instrs()?;
        let mut round = 0;
        loop {
            round += 1;
            graph = optimizer.run_passes(graph)?;

            let instrs = graph.dfs_instrs()?;
            if instrs == prev_instrs {
                break;
            }
            prev_instrs = instrs;
        }

        log::debug!(
            "Optimized {blocks_before} blocks into {} blocks, in {round} rounds",
            graph.len()
        );

        phase3_serialize::serialize(&graph)
    }

    fn run_passes(&mut self, mut graph: BlockGraph) -> Result<BlockGraph> {
        self.thread_jumps(&mut graph)?;
        let graph = self.eliminate_unreachable(graph)?;
        let graph = self.coalesce(graph)?;
        Ok(graph)
    }
}

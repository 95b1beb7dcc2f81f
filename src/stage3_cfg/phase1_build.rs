use super::block_graph::{Block, BlockGraph};
use crate::{common::identifier::IdCounter, stage2_tac::tac_ast::*};
use anyhow::{Result, anyhow};

/// Owns the counter for synthesized labels, so that a procedure re-built many times over
/// never receives the same synthesized label twice.
#[derive(Default)]
pub struct CfgBuilder {
    synth_ids: IdCounter,
}
impl CfgBuilder {
    pub fn build(&mut self, instrs: Vec<Instruction>) -> Result<BlockGraph> {
        let instrs = self.normalize(instrs);
        let blocks = partition(instrs)?;
        let graph = BlockGraph::new(blocks)?;

        log::trace!("Built {} blocks, entry {}", graph.len(), graph.entry());

        Ok(graph)
    }

    /// After normalizing,
    /// + the stream starts with a label and ends with a `jmp` or a `ret`;
    /// + every `jmp` and `ret` is followed by a label, unless it is last;
    /// + every label is preceded by a `jmp` or a `ret`, unless it is first.
    ///
    /// Normalizing a normalized stream changes nothing.
    pub fn normalize(&mut self, instrs: Vec<Instruction>) -> Vec<Instruction> {
        let mut out = Vec::with_capacity(instrs.len() + 2);

        if !matches!(instrs.first(), Some(Instruction::Label(_))) {
            out.push(Instruction::Label(Label::new(".Lentry")));
        }

        for instr in instrs {
            let prev_is_terminator = out.last().map(Instruction::is_terminator);
            match (&instr, prev_is_terminator) {
                (Instruction::Label(lbl), Some(false)) => {
                    out.push(Instruction::Jump(lbl.clone()));
                }
                (Instruction::Label(_), _) => {}
                (_, Some(true)) => {
                    let lbl = Label::new(format!(".Ljmp{}", self.synth_ids.fresh()));
                    out.push(Instruction::Label(lbl));
                }
                _ => {}
            }
            out.push(instr);
        }

        if !out.last().is_some_and(Instruction::is_terminator) {
            out.push(Instruction::Return(None));
        }

        out
    }
}

/// Each block spans from a label through the next `jmp` or `ret`.
fn partition(instrs: Vec<Instruction>) -> Result<Vec<Block>> {
    let mut blocks = vec![];
    let mut curr: Option<Block> = None;

    for instr in instrs {
        let mut block = match (curr.take(), &instr) {
            (Some(block), Instruction::Label(lbl)) => {
                return Err(anyhow!(
                    "Internal compiler error: {lbl} falls within {} without a preceding jump",
                    block.entry_label()
                ));
            }
            (Some(block), _) => block,
            (None, Instruction::Label(lbl)) => Block::new(lbl.clone()),
            (None, _) => {
                return Err(anyhow!(
                    "Internal compiler error: `{instr}` does not belong to any block"
                ));
            }
        };

        let closes = instr.is_terminator();
        block.instrs_mut().push(instr);
        if closes {
            blocks.push(block);
        } else {
            curr = Some(block);
        }
    }

    if let Some(block) = curr {
        return Err(anyhow!(
            "Internal compiler error: {} is never terminated",
            block.entry_label()
        ));
    }

    Ok(blocks)
}

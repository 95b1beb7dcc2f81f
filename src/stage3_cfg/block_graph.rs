use crate::stage2_tac::tac_ast::*;
use anyhow::{Result, anyhow};
use getset::Getters;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A single-entry run of instructions that begins with its own label and ends with a `jmp` or a `ret`.
/// Conditional jumps may appear anywhere in between, as side exits.
#[derive(Getters, Clone, Debug)]
#[getset(get = "pub")]
pub struct Block {
    entry_label: Label,
    instrs: Vec<Instruction>,
    parents: BTreeSet<Label>,
    /// One item per outgoing edge, in instruction order. A label may appear more than once.
    children: Vec<Label>,
}
impl Block {
    pub(super) fn new(entry_label: Label) -> Self {
        Self {
            entry_label,
            instrs: vec![],
            parents: BTreeSet::new(),
            children: vec![],
        }
    }

    /// Whether the block does nothing besides transferring control to its sole successor.
    pub fn is_empty_passthrough(&self) -> bool {
        let mut body = self.instrs.iter().skip(1).filter(|instr| **instr != Instruction::Nop);
        matches!((body.next(), body.next()), (Some(Instruction::Jump(_)), None))
    }

    pub(super) fn instrs_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instrs
    }

    fn targets(&self) -> Vec<Label> {
        self.instrs
            .iter()
            .filter_map(Instruction::jump_target)
            .cloned()
            .collect()
    }
}

/// An arena of blocks keyed by their entry labels.
/// Blocks refer to one another only by label; removing a block purges its label from every adjacency.
#[derive(Getters, Debug)]
pub struct BlockGraph {
    #[getset(get = "pub")]
    entry: Label,
    /// Layout order, entry first.
    #[getset(get = "pub")]
    order: Vec<Label>,
    blocks: HashMap<Label, Block>,
}
impl BlockGraph {
    /// Populates parents and children from the jumps inside each block.
    pub(super) fn new(blocks: Vec<Block>) -> Result<Self> {
        let entry = blocks
            .first()
            .map(|block| block.entry_label.clone())
            .ok_or_else(|| anyhow!("Internal compiler error: a procedure must have at least one block"))?;
        let order = blocks
            .iter()
            .map(|block| block.entry_label.clone())
            .collect::<Vec<_>>();
        let mut by_label = HashMap::with_capacity(blocks.len());
        for block in blocks {
            let lbl = block.entry_label.clone();
            if by_label.insert(lbl.clone(), block).is_some() {
                return Err(anyhow!("Internal compiler error: the label {lbl} is defined more than once"));
            }
        }
        let blocks = by_label;

        let mut graph = Self { entry, order, blocks };
        for lbl in graph.order.clone() {
            graph.refresh_edges(&lbl)?;
        }
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn get(&self, lbl: &Label) -> Result<&Block> {
        self.blocks
            .get(lbl)
            .ok_or_else(|| anyhow!("Internal compiler error: no block is labeled {lbl}"))
    }
    pub(super) fn get_mut(&mut self, lbl: &Label) -> Result<&mut Block> {
        self.blocks
            .get_mut(lbl)
            .ok_or_else(|| anyhow!("Internal compiler error: no block is labeled {lbl}"))
    }
    pub fn contains(&self, lbl: &Label) -> bool {
        self.blocks.contains_key(lbl)
    }

    /// Blocks in layout order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().filter_map(|lbl| self.blocks.get(lbl))
    }

    /// Re-derives `lbl`'s children from its instructions, and updates the parents on both sides.
    pub(super) fn refresh_edges(&mut self, lbl: &Label) -> Result<()> {
        let block = self.get(lbl)?;
        let old_children = block.children.iter().cloned().collect::<HashSet<_>>();
        let new_children = block.targets();

        for child in new_children.iter() {
            self.get_mut(child)
                .map_err(|_| anyhow!("Internal compiler error: {lbl} jumps to the non-existent label {child}"))?
                .parents
                .insert(lbl.clone());
        }
        for child in old_children.iter() {
            if new_children.contains(child) == false {
                self.get_mut(child)?.parents.remove(lbl);
            }
        }

        self.get_mut(lbl)?.children = new_children;
        Ok(())
    }

    /// Hands `child`'s outgoing edges over to `parent`, which must already jump wherever `child` did.
    pub(super) fn inherit_children(&mut self, parent: &Label, child: &Label) -> Result<()> {
        let grandchildren = self.get(child)?.children.clone();
        for grandchild in grandchildren.iter() {
            let parents = &mut self.get_mut(grandchild)?.parents;
            parents.remove(child);
            parents.insert(parent.clone());
        }
        self.get_mut(child)?.children.clear();
        self.get_mut(parent)?.children = grandchildren;
        Ok(())
    }

    /// Deletes the block and purges its label from all adjacencies.
    pub(super) fn remove(&mut self, lbl: &Label) -> Result<Block> {
        if *lbl == self.entry {
            return Err(anyhow!("Internal compiler error: attempted to remove the entry block {lbl}"));
        }
        let block = self
            .blocks
            .remove(lbl)
            .ok_or_else(|| anyhow!("Internal compiler error: attempted to remove the non-existent block {lbl}"))?;
        for other in self.blocks.values_mut() {
            other.parents.remove(lbl);
            other.children.retain(|child| child != lbl);
        }
        self.order.retain(|l| l != lbl);
        Ok(block)
    }

    /// Depth-first preorder over children, from the entry. Blocks that are never visited are not yielded.
    pub fn dfs_preorder(&self) -> Result<Vec<&Block>> {
        let mut visited = HashSet::new();
        let mut stack = vec![&self.entry];
        let mut out = vec![];
        while let Some(lbl) = stack.pop() {
            if visited.insert(lbl) == false {
                continue;
            }
            let block = self.get(lbl)?;
            out.push(block);
            stack.extend(block.children.iter().rev());
        }
        Ok(out)
    }

    /// The concatenation of reachable blocks' instructions, in DFS preorder.
    pub fn dfs_instrs(&self) -> Result<Vec<Instruction>> {
        let instrs = self
            .dfs_preorder()?
            .into_iter()
            .flat_map(|block| block.instrs.iter().cloned())
            .collect();
        Ok(instrs)
    }
}

use super::CfgOptimizer;
use crate::{stage2_tac::tac_ast::*, stage3_cfg::block_graph::BlockGraph};
use anyhow::Result;

impl CfgOptimizer {
    pub(super) fn thread_jumps(&mut self, graph: &mut BlockGraph) -> Result<()> {
        let mut threaded_count = 0;
        for lbl in graph.order().clone() {
            if graph.contains(&lbl) && thread_chain(graph, &lbl)? {
                threaded_count += 1;
            }
        }

        let mut resolved_count = 0;
        for lbl in graph.order().clone() {
            resolved_count += resolve_known_branches(graph, &lbl)?;
        }

        if threaded_count + resolved_count > 0 {
            log::debug!(
                "Threaded {threaded_count} chains of empty blocks, resolved {resolved_count} known branches"
            );
        }

        Ok(())
    }
}

/* Unconditional chains */

/// Follows single-child-to-single-parent edges from `start`, stopping before the entry block or any repeat.
fn find_chain(graph: &BlockGraph, start: &Label) -> Result<Vec<Label>> {
    let mut chain: Vec<Label> = vec![];
    let mut curr = start.clone();
    loop {
        let next = match &graph.get(&curr)?.children()[..] {
            [next] => next.clone(),
            _ => break,
        };
        if &next == graph.entry() || &next == start || chain.contains(&next) {
            break;
        }
        if graph.get(&next)?.parents().len() != 1 {
            break;
        }
        chain.push(next.clone());
        curr = next;
    }
    Ok(chain)
}

/// Retargets `start`'s terminating jump past the leading empty blocks of its chain, and removes them.
fn thread_chain(graph: &mut BlockGraph, start: &Label) -> Result<bool> {
    let chain = find_chain(graph, start)?;

    let mut skipped_count = 0;
    for lbl in chain.iter() {
        if skipped_count + 1 == chain.len() || graph.get(lbl)?.is_empty_passthrough() == false {
            break;
        }
        skipped_count += 1;
    }
    if skipped_count == 0 {
        return Ok(false);
    }
    let (skipped, target) = (&chain[..skipped_count], &chain[skipped_count]);

    match graph.get_mut(start)?.instrs_mut().last_mut() {
        Some(Instruction::Jump(lbl)) if *lbl == chain[0] => *lbl = target.clone(),
        _ => return Ok(false),
    }

    for lbl in skipped.iter().rev() {
        graph.remove(lbl)?;
    }
    graph.refresh_edges(start)?;

    Ok(true)
}

/* Conditional branches */

/// For each conditional branch in `lbl` that tests a temporary and leads to a child reached by no other edge,
/// a repeat of the same test in that child must go the same way, provided the child does not redefine the temporary.
fn resolve_known_branches(graph: &mut BlockGraph, lbl: &Label) -> Result<usize> {
    if graph.contains(lbl) == false {
        return Ok(0);
    }

    let branches = graph
        .get(lbl)?
        .instrs()
        .iter()
        .filter_map(|instr| match instr {
            Instruction::JumpIf(JumpIf {
                cond,
                operand: Operand::Temp(temp),
                lbl: child,
            }) => Some((*cond, temp.clone(), child.clone())),
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut resolved_count = 0;
    for (cond, temp, child) in branches {
        if is_sole_edge(graph, lbl, &child)? && resolve_in_child(graph, &child, cond, &temp)? {
            resolved_count += 1;
        }
    }
    Ok(resolved_count)
}

/// The entry block is also entered from outside the procedure, so it never qualifies.
fn is_sole_edge(graph: &BlockGraph, parent: &Label, child: &Label) -> Result<bool> {
    if parent == child || child == graph.entry() {
        return Ok(false);
    }
    let edge_count = graph
        .get(parent)?
        .children()
        .iter()
        .filter(|c| *c == child)
        .count();
    let child_parents = graph.get(child)?.parents();
    Ok(edge_count == 1 && child_parents.len() == 1)
}

fn resolve_in_child(
    graph: &mut BlockGraph,
    child: &Label,
    cond: JumpCondition,
    temp: &Temp,
) -> Result<bool> {
    let temp = Operand::Temp(temp.clone());
    let instrs = graph.get_mut(child)?.instrs_mut();

    if instrs.iter().any(|instr| instr.dst() == Some(&temp)) {
        return Ok(false);
    }

    let repeat_idx = instrs.iter().position(|instr| {
        matches!(instr, Instruction::JumpIf(JumpIf { cond: c, operand, .. }) if *c == cond && *operand == temp)
    });
    let Some(idx) = repeat_idx else {
        return Ok(false);
    };

    let known_target = match (&instrs[idx], instrs.get(idx + 1)) {
        (Instruction::JumpIf(JumpIf { lbl, .. }), Some(Instruction::Jump(_))) => lbl.clone(),
        _ => return Ok(false),
    };
    instrs[idx] = Instruction::Nop;
    instrs[idx + 1] = Instruction::Jump(known_target);

    graph.refresh_edges(child)?;

    Ok(true)
}

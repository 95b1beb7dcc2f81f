//! A reference evaluator of TAC, used to compare observable behavior before and after optimizing.

use crate::stage2_tac::tac_ast::*;
use anyhow::{Result, anyhow};
use std::collections::HashMap;

const STEP_LIMIT: usize = 1_000_000;

#[derive(PartialEq, Eq, Debug)]
pub struct Observed {
    pub prints: Vec<i64>,
    pub ret: i64,
}

/// Runs `@main` to completion.
pub fn interpret(unit: &CompilationUnit) -> Result<Observed> {
    let mut machine = Machine {
        procs: unit
            .procs
            .iter()
            .map(|proc| (proc.ident.clone(), proc))
            .collect(),
        globals: unit
            .global_vars
            .iter()
            .map(|GlobalVariable { ident, init }| (ident.clone(), *init))
            .collect(),
        prints: vec![],
        steps: 0,
    };
    let ret = machine.call(&GlobalSymbol::new("main"), vec![])?;
    Ok(Observed {
        prints: machine.prints,
        ret: ret.unwrap_or(0),
    })
}

struct Machine<'a> {
    procs: HashMap<GlobalSymbol, &'a Procedure>,
    globals: HashMap<GlobalSymbol, i64>,
    prints: Vec<i64>,
    steps: usize,
}

struct Frame {
    temps: HashMap<Temp, i64>,
    params: Vec<(u32, i64)>,
}

impl Machine<'_> {
    fn call(&mut self, callee: &GlobalSymbol, args: Vec<i64>) -> Result<Option<i64>> {
        let proc = *self
            .procs
            .get(callee)
            .ok_or_else(|| anyhow!("No procedure {callee}"))?;
        if proc.formals.len() != args.len() {
            return Err(anyhow!("{callee} takes {} args, got {}", proc.formals.len(), args.len()));
        }

        let labels = proc
            .instrs
            .iter()
            .enumerate()
            .filter_map(|(i, instr)| match instr {
                Instruction::Label(lbl) => Some((lbl.clone(), i)),
                _ => None,
            })
            .collect::<HashMap<_, _>>();
        let goto = |lbl: &Label| {
            labels
                .get(lbl)
                .copied()
                .ok_or_else(|| anyhow!("Dangling jump to {lbl} in {callee}"))
        };

        let mut frame = Frame {
            temps: proc.formals.iter().cloned().zip(args).collect(),
            params: vec![],
        };

        let mut pc = 0;
        while let Some(instr) = proc.instrs.get(pc) {
            self.steps += 1;
            if self.steps > STEP_LIMIT {
                return Err(anyhow!("Step limit exceeded"));
            }
            pc += 1;

            match instr {
                Instruction::Const(Const { value, dst }) => self.write(&mut frame, dst, *value),
                Instruction::Copy(SrcDst { src, dst }) => {
                    let val = self.read(&frame, src)?;
                    self.write(&mut frame, dst, val);
                }
                Instruction::Unary(Unary { op, src, dst }) => {
                    let val = self.read(&frame, src)?;
                    let val = match op {
                        UnaryOperator::Negate => val.wrapping_neg(),
                        UnaryOperator::Complement => !val,
                    };
                    self.write(&mut frame, dst, val);
                }
                Instruction::Binary(Binary { op, lhs, rhs, dst }) => {
                    let l = self.read(&frame, lhs)?;
                    let r = self.read(&frame, rhs)?;
                    let val = match op {
                        BinaryOperator::Add => l.wrapping_add(r),
                        BinaryOperator::Sub => l.wrapping_sub(r),
                        BinaryOperator::Mul => l.wrapping_mul(r),
                        BinaryOperator::Div | BinaryOperator::Mod if r == 0 => {
                            return Err(anyhow!("Division by zero"));
                        }
                        BinaryOperator::Div => l.wrapping_div(r),
                        BinaryOperator::Mod => l.wrapping_rem(r),
                        BinaryOperator::And => l & r,
                        BinaryOperator::Or => l | r,
                        BinaryOperator::Xor => l ^ r,
                        BinaryOperator::Shl => l.wrapping_shl(r as u32),
                        BinaryOperator::Shr => l.wrapping_shr(r as u32),
                    };
                    self.write(&mut frame, dst, val);
                }
                Instruction::Jump(lbl) => pc = goto(lbl)?,
                Instruction::JumpIf(JumpIf { cond, operand, lbl }) => {
                    let val = self.read(&frame, operand)?;
                    let holds = match cond {
                        JumpCondition::Zero => val == 0,
                        JumpCondition::NotZero => val != 0,
                        JumpCondition::Less => val < 0,
                        JumpCondition::LessEq => val <= 0,
                        JumpCondition::NotLess => val >= 0,
                        JumpCondition::NotLessEq => val > 0,
                    };
                    if holds {
                        pc = goto(lbl)?;
                    }
                }
                Instruction::Label(_) | Instruction::Nop => {}
                Instruction::Param(Param { index, arg }) => {
                    let val = self.read(&frame, arg)?;
                    frame.params.push((*index, val));
                }
                Instruction::Call(Call { callee, arg_count, dst }) => {
                    let mut params = std::mem::take(&mut frame.params);
                    params.sort_by_key(|(index, _)| *index);
                    if params.len() != *arg_count as usize {
                        return Err(anyhow!("{callee} called with {} params", params.len()));
                    }
                    let args = params.into_iter().map(|(_, val)| val).collect();
                    let ret = self.call(callee, args)?;
                    if let Some(dst) = dst {
                        let val = ret.ok_or_else(|| anyhow!("{callee} returned no value"))?;
                        self.write(&mut frame, dst, val);
                    }
                }
                Instruction::Return(val) => {
                    return val.as_ref().map(|val| self.read(&frame, val)).transpose();
                }
                Instruction::Print(val) => {
                    let val = self.read(&frame, val)?;
                    self.prints.push(val);
                }
            }
        }
        Ok(None)
    }

    fn read(&self, frame: &Frame, operand: &Operand) -> Result<i64> {
        match operand {
            Operand::Temp(temp) => frame.temps.get(temp),
            Operand::Global(symbol) => self.globals.get(symbol),
        }
        .copied()
        .ok_or_else(|| anyhow!("Read of undefined {operand}"))
    }
    fn write(&mut self, frame: &mut Frame, operand: &Operand, val: i64) {
        match operand {
            Operand::Temp(temp) => {
                frame.temps.insert(temp.clone(), val);
            }
            Operand::Global(symbol) => {
                self.globals.insert(symbol.clone(), val);
            }
        }
    }
}

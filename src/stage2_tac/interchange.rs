//! The persisted form of a [`CompilationUnit`]: a JSON array whose records are either
//! `{"var": "@g", "init": 42}` or `{"proc": "@f", "args": ["%a"], "body": [{"opcode", "args", "result"}, ...]}`.
//!
//! Decoding is the boundary where untyped records become typed instructions,
//! so an unknown opcode or a malformed operand list fails here.

use crate::stage2_tac::tac_ast::*;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Serialize, Deserialize, Debug)]
#[serde(untagged)]
enum Record {
    Var {
        var: String,
        init: i64,
    },
    Proc {
        proc: String,
        args: Vec<String>,
        body: Vec<RawInstruction>,
    },
}

#[derive(Serialize, Deserialize, Debug)]
struct RawInstruction {
    opcode: String,
    /* Some producers pad the list with `null`s. */
    args: Vec<Option<RawArg>>,
    result: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
enum RawArg {
    Int(i64),
    Name(String),
}

pub fn read_unit<R: Read>(reader: R) -> Result<CompilationUnit> {
    let records: Vec<Record> =
        serde_json::from_reader(reader).context("Failed to parse the TAC interchange JSON.")?;
    decode_unit(records)
}

pub fn write_unit<W: Write>(unit: &CompilationUnit, writer: W) -> Result<()> {
    let records = encode_unit(unit);
    serde_json::to_writer(writer, &records).context("Failed to write the TAC interchange JSON.")?;
    Ok(())
}

/* Decoding */

fn decode_unit(records: Vec<Record>) -> Result<CompilationUnit> {
    let mut global_vars = vec![];
    let mut procs = vec![];
    for record in records {
        match record {
            Record::Var { var, init } => {
                let ident = decode_global(&var)?;
                global_vars.push(GlobalVariable { ident, init });
            }
            Record::Proc { proc, args, body } => {
                let ident = decode_global(&proc)?;
                let formals = args
                    .iter()
                    .map(|formal| decode_temp(formal))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("In the formals of {ident}"))?;
                let instrs = body
                    .into_iter()
                    .enumerate()
                    .map(|(i, raw)| {
                        decode_instr(raw)
                            .with_context(|| format!("In {ident}, instruction #{i}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                procs.push(Procedure { ident, formals, instrs });
            }
        }
    }

    let main_count = procs.iter().filter(|proc| proc.ident.is_main()).count();
    if main_count != 1 {
        return Err(anyhow!(
            "Internal compiler error: expected exactly one @main procedure, found {main_count}"
        ));
    }

    Ok(CompilationUnit { global_vars, procs })
}

fn decode_instr(RawInstruction { opcode, args, result }: RawInstruction) -> Result<Instruction> {
    let args = args.into_iter().flatten().collect::<Vec<_>>();
    let dst = result.as_deref().map(decode_operand).transpose()?;

    let opcode = match opcode.as_str() {
        "je" => "jz",
        "jg" => "jnle",
        "jge" => "jnl",
        opcode => opcode,
    };
    let malformed = || {
        anyhow!(
            "Internal compiler error: malformed `{opcode}` instruction, args = {args:?}, result = {result:?}"
        )
    };

    if let Some(op) = UnaryOperator::ALL.into_iter().find(|op| op.opcode() == opcode) {
        return match (&args[..], dst) {
            ([src], Some(dst)) => {
                let src = decode_operand_arg(src)?;
                Ok(Instruction::Unary(Unary { op, src, dst }))
            }
            _ => Err(malformed()),
        };
    }
    if let Some(op) = BinaryOperator::ALL.into_iter().find(|op| op.opcode() == opcode) {
        return match (&args[..], dst) {
            ([lhs, rhs], Some(dst)) => {
                let lhs = decode_operand_arg(lhs)?;
                let rhs = decode_operand_arg(rhs)?;
                Ok(Instruction::Binary(Binary { op, lhs, rhs, dst }))
            }
            _ => Err(malformed()),
        };
    }
    if let Some(cond) = JumpCondition::ALL.into_iter().find(|c| c.opcode() == opcode) {
        return match (&args[..], dst) {
            ([operand, lbl], None) => {
                let operand = decode_operand_arg(operand)?;
                let lbl = decode_label_arg(lbl)?;
                Ok(Instruction::JumpIf(JumpIf { cond, operand, lbl }))
            }
            _ => Err(malformed()),
        };
    }

    let instr = match (opcode, &args[..], dst) {
        ("nop", [], None) => Instruction::Nop,
        ("const", [RawArg::Int(value)], Some(dst)) => {
            Instruction::Const(Const { value: *value, dst })
        }
        ("copy", [src], Some(dst)) => {
            let src = decode_operand_arg(src)?;
            Instruction::Copy(SrcDst { src, dst })
        }
        ("jmp", [lbl], None) => Instruction::Jump(decode_label_arg(lbl)?),
        ("label", [lbl], None) => Instruction::Label(decode_label_arg(lbl)?),
        ("param", [RawArg::Int(index), arg], None) if *index >= 1 => {
            let index = u32::try_from(*index).map_err(|_| malformed())?;
            let arg = decode_operand_arg(arg)?;
            Instruction::Param(Param { index, arg })
        }
        ("call", [RawArg::Name(callee), RawArg::Int(arg_count)], dst) => {
            let callee = decode_global(callee)?;
            let arg_count = u32::try_from(*arg_count).map_err(|_| malformed())?;
            Instruction::Call(Call { callee, arg_count, dst })
        }
        ("ret", [], None) => Instruction::Return(None),
        ("ret", [val], None) => Instruction::Return(Some(decode_operand_arg(val)?)),
        ("print", [val], None) => Instruction::Print(decode_operand_arg(val)?),
        ("nop" | "const" | "copy" | "jmp" | "label" | "param" | "call" | "ret" | "print", _, _) => {
            return Err(malformed());
        }
        (opcode, _, _) => return Err(anyhow!("Internal compiler error: unknown opcode `{opcode}`")),
    };
    Ok(instr)
}

fn decode_operand_arg(arg: &RawArg) -> Result<Operand> {
    match arg {
        RawArg::Name(name) => decode_operand(name),
        RawArg::Int(i) => Err(anyhow!("Expected an operand name, found the integer {i}")),
    }
}
fn decode_label_arg(arg: &RawArg) -> Result<Label> {
    match arg {
        /* Labels are written `%.Lfoo`; the sigil is optional on input. */
        RawArg::Name(name) => match name.strip_prefix('%').unwrap_or(name) {
            lbl if lbl.starts_with('.') => Ok(Label::new(lbl)),
            _ => Err(anyhow!("Expected a label, found `{name}`")),
        },
        RawArg::Int(i) => Err(anyhow!("Expected a label, found the integer {i}")),
    }
}
fn decode_operand(name: &str) -> Result<Operand> {
    if name.starts_with('@') {
        decode_global(name).map(Operand::Global)
    } else {
        decode_temp(name).map(Operand::Temp)
    }
}
fn decode_temp(name: &str) -> Result<Temp> {
    match name.strip_prefix('%') {
        Some(ident) if ident.len() > 0 && ident.starts_with('.') == false => Ok(Temp::new(ident)),
        _ => Err(anyhow!("Expected a temporary `%name`, found `{name}`")),
    }
}
fn decode_global(name: &str) -> Result<GlobalSymbol> {
    match name.strip_prefix('@') {
        Some(ident) if ident.len() > 0 => Ok(GlobalSymbol::new(ident)),
        _ => Err(anyhow!("Expected a global symbol `@name`, found `{name}`")),
    }
}

/* Encoding */

fn encode_unit(CompilationUnit { global_vars, procs }: &CompilationUnit) -> Vec<Record> {
    let vars = global_vars.iter().map(|GlobalVariable { ident, init }| Record::Var {
        var: ident.to_string(),
        init: *init,
    });
    let procs = procs.iter().map(|Procedure { ident, formals, instrs }| Record::Proc {
        proc: ident.to_string(),
        args: formals.iter().map(ToString::to_string).collect(),
        body: instrs.iter().map(encode_instr).collect(),
    });
    vars.chain(procs).collect()
}

fn encode_instr(instr: &Instruction) -> RawInstruction {
    fn name(s: impl ToString) -> Option<RawArg> {
        Some(RawArg::Name(s.to_string()))
    }
    fn int(i: i64) -> Option<RawArg> {
        Some(RawArg::Int(i))
    }

    let args = match instr {
        Instruction::Const(Const { value, .. }) => vec![int(*value)],
        Instruction::Copy(SrcDst { src, .. }) | Instruction::Unary(Unary { src, .. }) => {
            vec![name(src)]
        }
        Instruction::Binary(Binary { lhs, rhs, .. }) => vec![name(lhs), name(rhs)],
        Instruction::Jump(lbl) | Instruction::Label(lbl) => vec![name(lbl)],
        Instruction::JumpIf(JumpIf { operand, lbl, .. }) => vec![name(operand), name(lbl)],
        Instruction::Param(Param { index, arg }) => vec![int(*index as i64), name(arg)],
        Instruction::Call(Call { callee, arg_count, .. }) => {
            vec![name(callee), int(*arg_count as i64)]
        }
        Instruction::Return(None) | Instruction::Nop => vec![],
        Instruction::Return(Some(val)) | Instruction::Print(val) => vec![name(val)],
    };

    RawInstruction {
        opcode: instr.opcode().to_string(),
        args,
        result: instr.dst().map(ToString::to_string),
    }
}

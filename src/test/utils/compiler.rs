use crate::{
    driver::{
        CompilationResult, Driver,
        config::{Args, CompilerUntil, DriverUntil},
        files::SrcFilepath,
    },
    stage1_ast::bx_ast,
    stage2_tac::tac_ast,
    stage4_asm_gen::{FinalizedAsmAst, asm_ast},
    stage5_asm_emit::AsmCodeEmitter,
};
use anyhow::{Result, anyhow};
use std::{
    io::{BufReader, Cursor},
    path::PathBuf,
};

fn compile(
    mock_src_filepath: &str,
    src_json: &str,
    until: CompilerUntil,
    optimize: bool,
) -> Result<CompilationResult> {
    let args = Args {
        src_filepaths: Vec::with_capacity(0),
        until: DriverUntil::Compiler(until),
        optimize,
        runtime: PathBuf::new(),
    };
    let driver = Driver::from(args);

    let mock_src_filepath = SrcFilepath::try_from(PathBuf::from(mock_src_filepath)).unwrap();
    let reader = BufReader::new(Cursor::new(src_json));
    driver.compile(&mock_src_filepath, reader)
}
fn compile_ast(
    bx_prog: &bx_ast::Program,
    until: CompilerUntil,
    optimize: bool,
) -> Result<CompilationResult> {
    let src_json = serde_json::to_string(bx_prog)?;
    compile("/tmp/mock.ast.json", &src_json, until, optimize)
}

pub fn compile_until_tac(bx_prog: &bx_ast::Program) -> Result<tac_ast::CompilationUnit> {
    let compil_res = compile_ast(bx_prog, CompilerUntil::Tac, true)?;
    match compil_res {
        CompilationResult::Tac(unit) => Ok(unit),
        actual => Err(anyhow!("{actual:#?}")),
    }
}

pub fn compile_until_cfopt(bx_prog: &bx_ast::Program) -> Result<tac_ast::CompilationUnit> {
    let compil_res = compile_ast(bx_prog, CompilerUntil::Cfopt, true)?;
    match compil_res {
        CompilationResult::OptimizedTac(unit) => Ok(unit),
        actual => Err(anyhow!("{actual:#?}")),
    }
}

pub fn compile_until_asm_gen(
    bx_prog: &bx_ast::Program,
    optimize: bool,
) -> Result<asm_ast::Program<FinalizedAsmAst>> {
    let compil_res = compile_ast(bx_prog, CompilerUntil::AsmGen, optimize)?;
    match compil_res {
        CompilationResult::AsmCode(prog) => Ok(prog),
        actual => Err(anyhow!("{actual:#?}")),
    }
}

/// Reads the interchange format, as a `.tac.json` source file would be read.
pub fn compile_tac_json_until(
    tac_json: &str,
    until: CompilerUntil,
) -> Result<CompilationResult> {
    compile("/tmp/mock.tac.json", tac_json, until, true)
}

pub fn emit_to_string(prog: asm_ast::Program<FinalizedAsmAst>) -> Result<String> {
    let mut buf = Vec::new();
    let emitter = AsmCodeEmitter::new(&mut buf)?;
    emitter.emit_program(prog)?;
    Ok(String::from_utf8(buf)?)
}

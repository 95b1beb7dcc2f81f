pub mod config;
pub mod files;

use self::{
    config::{Args, CliArgs, CompilerUntil, DriverUntil, Downstream},
    files::{
        AsmFilepath, ObjectFilepath, OptimizedTacFilepath, ProgramFilepath, SrcFilepath, SrcKind,
        TacFilepath,
    },
};
use crate::{
    stage1_ast::bx_ast,
    stage2_tac::{Tackifier, interchange, tac_ast},
    stage3_cfg,
    stage4_asm_gen::{AsmCodeGenerator, FinalizedAsmAst, asm_ast},
    stage5_asm_emit::AsmCodeEmitter,
};
use anyhow::{Context, Result, anyhow};
use clap::Parser as ClapParser;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn driver_main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::info!("{args:?}");

    let args = Args::from(args);
    let driver = Driver::from(args);
    driver.run()
}

#[derive(Debug)]
pub enum CompilationResult {
    Tac(tac_ast::CompilationUnit),
    OptimizedTac(tac_ast::CompilationUnit),
    AsmCode(asm_ast::Program<FinalizedAsmAst>),
}

pub struct Driver {
    args: Args,
}
impl From<Args> for Driver {
    fn from(args: Args) -> Self {
        Self { args }
    }
}
impl Driver {
    pub fn run(self) -> Result<()> {
        let mut asm_filepaths = vec![];
        for src_filepath in self.args.src_filepaths.iter() {
            let src_filepath = SrcFilepath::try_from(src_filepath.clone())?;
            let asm_filepath = self
                .compile_file(&src_filepath)
                .with_context(|| format!("While compiling {src_filepath:?}"))?;
            log::info!("Compiler done -> {asm_filepath:?}");
            if let Some(asm_filepath) = asm_filepath {
                asm_filepaths.push(asm_filepath);
            }
        }

        match &self.args.until {
            DriverUntil::Compiler(_) => Ok(()),
            DriverUntil::Downstream(Downstream::Assembler) => {
                for asm_filepath in asm_filepaths {
                    assemble(asm_filepath)?;
                }
                Ok(())
            }
            DriverUntil::Downstream(Downstream::Linker) => {
                assemble_and_link_program(asm_filepaths, &self.args.runtime)?;
                Ok(())
            }
        }
    }

    fn compile_file(&self, src_filepath: &SrcFilepath) -> Result<Option<AsmFilepath>> {
        let reader = File::open(src_filepath as &PathBuf)
            .with_context(|| format!("Failed to open {src_filepath:?}"))?;
        let reader = BufReader::new(reader);

        match self.compile(src_filepath, reader)? {
            CompilationResult::Tac(unit) => {
                let tac_filepath = TacFilepath::from(src_filepath);
                write_tac(src_filepath, &tac_filepath, &unit)?;
                Ok(None)
            }
            CompilationResult::OptimizedTac(unit) => {
                let tac_filepath = OptimizedTacFilepath::from(src_filepath);
                write_tac(src_filepath, &tac_filepath, &unit)?;
                Ok(None)
            }
            CompilationResult::AsmCode(prog) => {
                if self.args.until == DriverUntil::Compiler(CompilerUntil::AsmGen) {
                    println!("asm_prog: {prog:#?}");
                    return Ok(None);
                }

                let asm_filepath = AsmFilepath::from(src_filepath);
                let asm_file = File::create(&asm_filepath as &PathBuf)
                    .with_context(|| format!("Failed to create {asm_filepath:?}"))?;
                let asm_emitter = AsmCodeEmitter::new(BufWriter::new(asm_file))?;
                asm_emitter.emit_program(prog)?;
                log::info!("Assembly emitted -> {asm_filepath:?}");

                if self.args.until == DriverUntil::Compiler(CompilerUntil::AsmEmit) {
                    println!("asm file: {asm_filepath:?}");
                    return Ok(None);
                }
                Ok(Some(asm_filepath))
            }
        }
    }

    /// Runs the in-memory stages, without touching the file system.
    pub fn compile<R: Read>(
        &self,
        src_filepath: &SrcFilepath,
        reader: R,
    ) -> Result<CompilationResult> {
        let unit = match src_filepath.kind() {
            SrcKind::Ast => {
                let bx_prog: bx_ast::Program = serde_json::from_reader(reader)
                    .context("Failed to parse the typed AST JSON.")?;

                let unit = Tackifier::default().tackify_program(bx_prog)?;
                log::info!("TAC generated, {} procedures", unit.procs.len());
                if self.args.until == DriverUntil::Compiler(CompilerUntil::Tac) {
                    return Ok(CompilationResult::Tac(unit));
                }
                unit
            }
            SrcKind::Tac => {
                let unit = interchange::read_unit(reader)?;
                log::info!("TAC read, {} procedures", unit.procs.len());
                if self.args.until == DriverUntil::Compiler(CompilerUntil::Tac) {
                    return Ok(CompilationResult::Tac(unit));
                }
                unit
            }
        };

        let unit = match self.args.optimize {
            true => {
                let unit = stage3_cfg::optimize_unit(unit)?;
                log::info!("TAC optimized");
                unit
            }
            false => unit,
        };
        if self.args.until == DriverUntil::Compiler(CompilerUntil::Cfopt) {
            return Ok(CompilationResult::OptimizedTac(unit));
        }

        let asm_gen = AsmCodeGenerator::default();
        let asm_prog = asm_gen.gen_program(unit)?;
        log::info!("Assembly generated");
        Ok(CompilationResult::AsmCode(asm_prog))
    }
}

fn write_tac(
    src_filepath: &SrcFilepath,
    tac_filepath: &Path,
    unit: &tac_ast::CompilationUnit,
) -> Result<()> {
    if tac_filepath == src_filepath as &Path {
        log::warn!("Not overwriting the source file {tac_filepath:?}");
        return Ok(());
    }
    let tac_file = File::create(tac_filepath)
        .with_context(|| format!("Failed to create {tac_filepath:?}"))?;
    interchange::write_unit(unit, BufWriter::new(tac_file))?;
    log::info!("TAC written -> {tac_filepath:?}");
    Ok(())
}

fn assemble(asm_filepath: AsmFilepath) -> Result<ObjectFilepath> {
    /* Run separate gcc command per foo.s file, so that we can specify each `-o foo.o` filepath. */
    let obj_filepath = ObjectFilepath::from(&asm_filepath);
    use_gcc(&["-c"], vec![asm_filepath], &[], &obj_filepath, "assembler")?;
    Ok(obj_filepath)
}
fn assemble_and_link_program(
    asm_filepaths: Vec<AsmFilepath>,
    runtime: &Path,
) -> Result<Option<ProgramFilepath>> {
    /* The program is named after the first input. */
    match asm_filepaths.first() {
        None => Ok(None),
        Some(asm0) => {
            let prog_filepath = ProgramFilepath::from(asm0);
            use_gcc(
                &[],
                asm_filepaths,
                &[runtime],
                &prog_filepath,
                "assembler and linker",
            )?;
            Ok(Some(prog_filepath))
        }
    }
}
fn use_gcc(
    gcc_flags: &[&str],
    asm_paths: Vec<AsmFilepath>,
    extra_inputs: &[&Path],
    out_path: &Path,
    descr: &str,
) -> Result<()> {
    let mut cmd = Command::new("gcc");
    cmd.args(gcc_flags);
    cmd.args(asm_paths.iter().map(|p| p.as_os_str()));
    cmd.args(extra_inputs);
    cmd.arg("-o").arg(out_path);
    log::info!("{descr} command: {cmd:?}");

    let mut child = cmd
        .spawn()
        .with_context(|| format!("Failed to launch the {descr} process."))?;
    let child_exit_status = child
        .wait()
        .with_context(|| format!("The {descr} process was not running."))?;
    if !child_exit_status.success() {
        return Err(anyhow!("The {descr} exit status = {child_exit_status}"));
    }
    log::info!("{descr} done -> {out_path:?}");

    for asm_path in asm_paths {
        fs::remove_file(&asm_path as &PathBuf)?;
    }

    Ok(())
}

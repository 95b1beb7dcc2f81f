use clap::Parser as ClapParser;
use std::path::PathBuf;

pub const DEFAULT_RUNTIME: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/runtime/bx_runtime.c");

#[derive(ClapParser, Debug)]
pub struct CliArgs {
    /// Each file is `<stem>.ast.json` or `<stem>.tac.json`.
    src_filepaths: Vec<PathBuf>,

    #[clap(long = "tac")]
    until_tac: bool,

    #[clap(long = "cfopt")]
    until_cfopt: bool,

    #[clap(long = "codegen")]
    until_asm_codegen: bool,

    #[clap(short = 'S')]
    until_asm_emission: bool,

    #[clap(short = 'c')]
    until_assembler: bool,

    #[clap(long = "no-opt")]
    no_opt: bool,

    /// The C source linked into every program, providing `bx_print_int`.
    #[clap(long = "runtime", default_value = DEFAULT_RUNTIME)]
    runtime: PathBuf,
}

#[derive(Debug)]
pub struct Args {
    pub src_filepaths: Vec<PathBuf>,

    pub until: DriverUntil,

    pub optimize: bool,

    pub runtime: PathBuf,
}
impl From<CliArgs> for Args {
    fn from(cli_args: CliArgs) -> Self {
        let until = if cli_args.until_tac {
            DriverUntil::Compiler(CompilerUntil::Tac)
        } else if cli_args.until_cfopt {
            DriverUntil::Compiler(CompilerUntil::Cfopt)
        } else if cli_args.until_asm_codegen {
            DriverUntil::Compiler(CompilerUntil::AsmGen)
        } else if cli_args.until_asm_emission {
            DriverUntil::Compiler(CompilerUntil::AsmEmit)
        } else if cli_args.until_assembler {
            DriverUntil::Downstream(Downstream::Assembler)
        } else {
            DriverUntil::Downstream(Downstream::Linker)
        };

        Self {
            src_filepaths: cli_args.src_filepaths,
            until,
            optimize: !cli_args.no_opt,
            runtime: cli_args.runtime,
        }
    }
}

#[derive(PartialEq, Eq, Debug)]
pub enum DriverUntil {
    Compiler(CompilerUntil),
    Downstream(Downstream),
}
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompilerUntil {
    Tac,
    Cfopt,
    AsmGen,
    AsmEmit,
}
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Downstream {
    Assembler,
    Linker,
}

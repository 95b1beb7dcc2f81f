//! Programs linked through the real driver and run natively, against the TAC interpreter.

use crate::{
    driver::{
        Driver,
        config::{Args, DEFAULT_RUNTIME, DriverUntil, Downstream},
    },
    stage1_ast::bx_ast::Program,
    test::utils::*,
};
use anyhow::{Context, Result, anyhow};
use pretty_assertions::assert_eq;
use std::{fs, path::PathBuf, process::Command};

/// Compiles, assembles and links `bx_prog` in a scratch directory, then runs it and collects what it prints.
fn run_native(name: &str, bx_prog: &Program, optimize: bool) -> Result<Vec<i64>> {
    let dir = std::env::temp_dir().join(format!("bx_native_{}_{name}_{optimize}", std::process::id()));
    fs::create_dir_all(&dir)?;
    let src_filepath = dir.join(format!("{name}.ast.json"));
    fs::write(&src_filepath, serde_json::to_string(bx_prog)?)?;

    let args = Args {
        src_filepaths: vec![src_filepath],
        until: DriverUntil::Downstream(Downstream::Linker),
        optimize,
        runtime: PathBuf::from(DEFAULT_RUNTIME),
    };
    Driver::from(args).run()?;

    let prog_filepath = dir.join(name);
    let output = Command::new(&prog_filepath)
        .output()
        .with_context(|| format!("Failed to run {prog_filepath:?}"))?;
    fs::remove_dir_all(&dir)?;
    if !output.status.success() {
        return Err(anyhow!("{name} exit status = {}", output.status));
    }

    String::from_utf8(output.stdout)?
        .lines()
        .map(|line| line.parse::<i64>().with_context(|| format!("Unexpected output line {line:?}")))
        .collect()
}

fn assert_native_matches(name: &str, bx_prog: Program) -> Result<()> {
    let expected = interpret(&compile_until_tac(&bx_prog)?)?.prints;
    for optimize in [false, true] {
        let actual = run_native(name, &bx_prog, optimize)?;
        assert_eq!(actual, expected, "{name}, optimize = {optimize}");
    }
    Ok(())
}

#[test]
fn sign_check() -> Result<()> {
    assert_native_matches("sign_check", sign_check_prog())
}

#[test]
fn odd_sum() -> Result<()> {
    assert_native_matches("odd_sum", odd_sum_prog())
}

#[test]
fn seventh_arg() -> Result<()> {
    assert_native_matches("seventh_arg", seven_args_prog())
}

#[test]
fn shared_global() -> Result<()> {
    assert_native_matches("shared_global", shared_global_prog())
}

#[test]
fn kitchen_sink() -> Result<()> {
    assert_native_matches("kitchen_sink", kitchen_sink_prog())
}

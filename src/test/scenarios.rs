//! Observable behavior of whole programs, before and after optimizing.

use crate::{
    stage1_ast::bx_ast::Program,
    test::utils::{
        Observed, compile_until_cfopt, compile_until_tac, interpret, kitchen_sink_prog,
        odd_sum_prog, seven_args_prog, shared_global_prog, sign_check_prog,
    },
};
use anyhow::Result;
use pretty_assertions::assert_eq;

fn observe_both(bx_prog: &Program) -> Result<(Observed, Observed)> {
    let unoptimized = interpret(&compile_until_tac(bx_prog)?)?;
    let optimized = interpret(&compile_until_cfopt(bx_prog)?)?;
    Ok((unoptimized, optimized))
}

#[test]
fn sign_check() -> Result<()> {
    let (unoptimized, optimized) = observe_both(&sign_check_prog())?;
    let expected = Observed {
        prints: vec![1, 0],
        ret: 0,
    };
    assert_eq!(unoptimized, expected);
    assert_eq!(optimized, expected);
    Ok(())
}

#[test]
fn odd_sum() -> Result<()> {
    let (unoptimized, optimized) = observe_both(&odd_sum_prog())?;
    assert_eq!(unoptimized.prints, vec![9]);
    assert_eq!(optimized, unoptimized);
    Ok(())
}

#[test]
fn seventh_arg() -> Result<()> {
    let (unoptimized, optimized) = observe_both(&seven_args_prog())?;
    assert_eq!(unoptimized.prints, vec![70]);
    assert_eq!(optimized, unoptimized);
    Ok(())
}

#[test]
fn shared_global() -> Result<()> {
    let (unoptimized, optimized) = observe_both(&shared_global_prog())?;
    assert_eq!(unoptimized.prints, vec![42]);
    assert_eq!(optimized, unoptimized);
    Ok(())
}

#[test]
fn kitchen_sink() -> Result<()> {
    let (unoptimized, optimized) = observe_both(&kitchen_sink_prog())?;
    assert_eq!(
        unoptimized.prints,
        vec![0, -1, 1, -3, 3, -5, 8, -7, 48, -8, -3, -1, 5, 7, -42, -1, 1]
    );
    assert_eq!(optimized, unoptimized);
    Ok(())
}

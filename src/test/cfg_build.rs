use crate::{
    stage2_tac::tac_ast::*,
    stage3_cfg::CfgBuilder,
    test::utils::{compile_until_tac, fail, kitchen_sink_prog, odd_sum_prog},
};
use anyhow::Result;
use pretty_assertions::assert_eq;

fn temp(name: &str) -> Operand {
    Operand::Temp(Temp::new(name))
}
fn lbl(name: &str) -> Label {
    Label::new(name)
}

#[test]
fn normalization_is_idempotent() -> Result<()> {
    let mut units = vec![];
    units.push(compile_until_tac(&odd_sum_prog())?);
    units.push(compile_until_tac(&kitchen_sink_prog())?);

    for proc in units.into_iter().flat_map(|unit| unit.procs) {
        let mut builder = CfgBuilder::default();
        let once = builder.normalize(proc.instrs);
        let twice = builder.normalize(once.clone());
        assert_eq!(once, twice);
    }
    Ok(())
}

#[test]
fn normalization_makes_control_explicit() {
    let instrs = vec![
        Instruction::Const(Const { value: 1, dst: temp("0") }),
        Instruction::Label(lbl(".L0")),
        Instruction::Print(temp("0")),
        Instruction::Return(None),
        Instruction::Print(temp("0")),
    ];
    let actual = CfgBuilder::default().normalize(instrs);
    assert_eq!(
        actual,
        vec![
            Instruction::Label(lbl(".Lentry")),
            Instruction::Const(Const { value: 1, dst: temp("0") }),
            Instruction::Jump(lbl(".L0")),
            Instruction::Label(lbl(".L0")),
            Instruction::Print(temp("0")),
            Instruction::Return(None),
            Instruction::Label(lbl(".Ljmp0")),
            Instruction::Print(temp("0")),
            Instruction::Return(None),
        ]
    );
}

#[test]
fn synthesized_labels_never_repeat() {
    let instrs = vec![
        Instruction::Label(lbl(".L0")),
        Instruction::Return(None),
        Instruction::Nop,
    ];
    let mut builder = CfgBuilder::default();
    let first = builder.normalize(instrs.clone());
    let second = builder.normalize(instrs);
    assert_eq!(first[2], Instruction::Label(lbl(".Ljmp0")));
    assert_eq!(second[2], Instruction::Label(lbl(".Ljmp1")));
}

#[test]
fn loop_header_has_body_and_exit() -> Result<()> {
    let unit = compile_until_tac(&odd_sum_prog())?;
    let main = unit.procs.into_iter().next().unwrap();

    let graph = CfgBuilder::default().build(main.instrs)?;
    let header = graph.get(&lbl(".L0"))?;
    assert_eq!(header.children(), &vec![lbl(".L1"), lbl(".L2")]);
    /* Entered from the preceding code, and from the back edges of `continue` and of the body's end. */
    assert!(header.parents().contains(graph.entry()));
    assert!(header.parents().len() >= 2);
    Ok(())
}

#[test]
fn extended_block_keeps_every_edge() -> Result<()> {
    let instrs = vec![
        Instruction::Label(lbl(".La")),
        Instruction::JumpIf(JumpIf {
            cond: JumpCondition::Zero,
            operand: temp("t"),
            lbl: lbl(".Lb"),
        }),
        Instruction::JumpIf(JumpIf {
            cond: JumpCondition::Less,
            operand: temp("t"),
            lbl: lbl(".Lc"),
        }),
        Instruction::Jump(lbl(".Lb")),
        Instruction::Label(lbl(".Lb")),
        Instruction::Return(None),
        Instruction::Label(lbl(".Lc")),
        Instruction::Return(Some(temp("t"))),
    ];
    let graph = CfgBuilder::default().build(instrs)?;
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.entry(), &lbl(".La"));

    let a = graph.get(&lbl(".La"))?;
    assert_eq!(a.instrs().len(), 4);
    assert_eq!(a.children(), &vec![lbl(".Lb"), lbl(".Lc"), lbl(".Lb")]);

    let b = graph.get(&lbl(".Lb"))?;
    assert_eq!(b.parents().iter().collect::<Vec<_>>(), vec![&lbl(".La")]);
    assert!(b.children().is_empty());
    Ok(())
}

#[test]
fn dangling_jump_is_fatal() {
    let instrs = vec![Instruction::Jump(lbl(".Lnowhere"))];
    match CfgBuilder::default().build(instrs) {
        Ok(graph) => fail!("{graph:#?}"),
        Err(e) => {
            let msg = e.to_string();
            assert!(msg.starts_with("Internal compiler error"), "{msg}");
            assert!(msg.contains("%.Lnowhere"), "{msg}");
        }
    }
}

#[test]
fn duplicate_label_is_fatal() {
    let print_const = |value| {
        vec![
            Instruction::Const(Const {
                value,
                dst: temp("a"),
            }),
            Instruction::Print(temp("a")),
            Instruction::Return(None),
        ]
    };
    let mut instrs = vec![Instruction::Label(lbl(".L1"))];
    instrs.extend(print_const(1));
    instrs.push(Instruction::Label(lbl(".L1")));
    instrs.extend(print_const(2));

    match CfgBuilder::default().build(instrs) {
        Ok(graph) => fail!("{graph:#?}"),
        Err(e) => {
            let msg = e.to_string();
            assert!(msg.starts_with("Internal compiler error"), "{msg}");
            assert!(msg.contains("%.L1 is defined more than once"), "{msg}");
        }
    }
}

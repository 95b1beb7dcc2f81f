#![allow(rustdoc::private_intra_doc_links)]

mod common;
pub mod driver;
mod stage1_ast;
mod stage2_tac;
mod stage3_cfg;
mod stage4_asm_gen;
mod stage5_asm_emit;
mod utils;

#[cfg(test)]
mod test;

//! Lower TAC to x86-64.
//!
//! + Phase 1: select instructions for each TAC instruction, leaving each temporary as a pseudo operand.
//! + Phase 2: give each temporary its own 8-byte stack slot, and size the frame.
//! + Phase 3: rewrite operand combinations that x86-64 does not encode.

pub mod asm_ast;
mod generate;
mod phase1_generate;
mod phase2_finalize;
mod phase3_fix;

pub use generate::AsmCodeGenerator;
pub use phase2_finalize::FinalizedAsmAst;

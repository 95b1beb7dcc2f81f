//! Write the lowered program as AT&T-syntax assembly text.

mod emit;

pub use emit::AsmCodeEmitter;

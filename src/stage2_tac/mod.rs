//! Three-address code: the tree-free, procedure-local representation
//! that every later stage consumes.

mod generate;
pub mod interchange;
pub mod tac_ast;

pub use generate::Tackifier;

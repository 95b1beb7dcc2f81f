mod ast;
mod compiler;
mod interp;
mod misc;
mod programs;

pub use ast::*;
pub use compiler::*;
pub use interp::*;
pub(crate) use misc::*;
pub use programs::*;

use derive_more::{Deref, Display};
use std::rc::Rc;

/// A procedure-scoped storage location.
/// Formals keep their source name; every other temporary is numbered.
#[derive(Deref, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[display("%{_0}")]
pub struct Temp(Rc<str>);
impl Temp {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }
    pub fn new_generated(ids: &mut IdCounter) -> Self {
        Self::new(ids.fresh().to_string())
    }
}

/// A procedure-scoped jump target.
#[derive(Deref, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[display("%{_0}")]
pub struct Label(Rc<str>);
impl Label {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }
    pub fn new_generated(ids: &mut IdCounter) -> Self {
        Self::new(format!(".L{}", ids.fresh()))
    }
}

/// A program-scoped name: either a global variable or a procedure.
#[derive(Deref, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[display("@{_0}")]
pub struct GlobalSymbol(Rc<str>);
impl GlobalSymbol {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }
    pub fn is_main(&self) -> bool {
        &*self.0 == "main"
    }
}

/// Monotonically increasing source of fresh ids.
/// Each procedure owns its own counters, so ids are unique within a procedure only.
#[derive(Default, Debug)]
pub struct IdCounter {
    next: u32,
}
impl IdCounter {
    pub fn fresh(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

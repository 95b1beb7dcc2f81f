use crate::stage4_asm_gen::asm_ast::{StackPosition, Temp};
use std::collections::HashMap;

/// Each temporary gets its own 8-byte slot below RBP, in order of first use.
pub struct VarToStackPos {
    last_used_stack_pos: StackPosition,
    var_to_stack_pos: HashMap<Temp, StackPosition>,
}
impl Default for VarToStackPos {
    fn default() -> Self {
        Self {
            last_used_stack_pos: StackPosition(0),
            var_to_stack_pos: HashMap::new(),
        }
    }
}
impl VarToStackPos {
    pub fn slot_count(&self) -> usize {
        self.var_to_stack_pos.len()
    }

    pub fn resolve_stack_pos(&mut self, temp: Temp) -> StackPosition {
        let pos = self.var_to_stack_pos.entry(temp).or_insert_with(|| {
            *self.last_used_stack_pos -= 8;
            self.last_used_stack_pos
        });
        *pos
    }
}

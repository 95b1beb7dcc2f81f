use super::{AsmCodeEmitter, TAB, label::LabelLocality};
use crate::stage4_asm_gen::asm_ast::GlobalVariable;
use std::io::{self, Write};

impl<W: Write> AsmCodeEmitter<W> {
    /// Every global is a read-write 8-byte integer with an explicit initial value.
    pub(super) fn write_global_var(
        &mut self,
        GlobalVariable { ident, init }: GlobalVariable,
    ) -> Result<(), io::Error> {
        self.write_symbol_visibility(&ident, LabelLocality::OF_GLOBAL_VAR)?;
        writeln!(&mut self.w, "{TAB}.data")?;
        self.write_symbol_decl(&ident, LabelLocality::OF_GLOBAL_VAR)?;
        writeln!(&mut self.w, "{TAB}.quad{TAB}{init}")?;
        Ok(())
    }
}

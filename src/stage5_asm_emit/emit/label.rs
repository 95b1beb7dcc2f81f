use super::{AsmCodeEmitter, TAB};
use crate::stage4_asm_gen::asm_ast::{AsmLabel, GlobalSymbol};
use std::io::{self, Write};

impl<W: Write> AsmCodeEmitter<W> {
    /* Asm symbol */

    pub(super) fn write_symbol_visibility(
        &mut self,
        ident: &GlobalSymbol,
        locality: LabelLocality,
    ) -> Result<(), io::Error> {
        match locality {
            LabelLocality::InObjSymTab => {
                write!(&mut self.w, "{TAB}.globl{TAB}")?;
                self.write_symbol_name(ident, locality)?;
                writeln!(&mut self.w)?;
            }
            LabelLocality::Local => { /* No-op. */ }
        }
        Ok(())
    }
    pub(super) fn write_symbol_decl(
        &mut self,
        ident: &GlobalSymbol,
        locality: LabelLocality,
    ) -> Result<(), io::Error> {
        self.write_symbol_name(ident, locality)?;
        writeln!(&mut self.w, ":")?;
        Ok(())
    }
    pub(super) fn write_symbol_name(
        &mut self,
        ident: &GlobalSymbol,
        locality: LabelLocality,
    ) -> Result<(), io::Error> {
        let ident_pfx = locality.ident_pfx();
        let name: &str = ident;
        write!(&mut self.w, "{ident_pfx}{name}")
    }

    /* Asm jump label */

    pub(super) fn write_jump_decl(
        &mut self,
        proc_ident: &GlobalSymbol,
        lbl: &AsmLabel,
    ) -> Result<(), io::Error> {
        self.write_jump_name(proc_ident, lbl)?;
        writeln!(&mut self.w, ":")?;
        Ok(())
    }
    /// Jump labels are prefixed with their procedure's name, so that they are unique across the whole unit.
    pub(super) fn write_jump_name(
        &mut self,
        proc_ident: &GlobalSymbol,
        lbl: &AsmLabel,
    ) -> Result<(), io::Error> {
        let proc_name = self.label_bad_char.replace_all(proc_ident, "_");
        match lbl {
            AsmLabel::Local(lbl) => {
                let ident_pfx = LabelLocality::OF_JUMP.ident_pfx();
                let lbl_name = self.label_bad_char.replace_all(lbl, "_");
                write!(&mut self.w, "{ident_pfx}{proc_name}{lbl_name}")
            }
            AsmLabel::Epilogue => write!(&mut self.w, "{EPILOGUE_PFX}{proc_name}"),
        }
    }
}

const IDENT_PFX_NONLOCAL: &str = if cfg!(target_os = "macos") { "_" } else { "" };
const IDENT_PFX_LOCAL: &str = if cfg!(target_os = "macos") {
    "L."
} else {
    ".L."
};
const EPILOGUE_PFX: &str = if cfg!(target_os = "macos") {
    "Lend_"
} else {
    ".Lend_"
};

#[derive(Clone, Copy)]
pub enum LabelLocality {
    InObjSymTab, // Non-local, ie assembler will include this label in the object file's symbol table.
    Local,       // Ditto not include.
}
impl LabelLocality {
    pub const OF_PROC: Self = Self::InObjSymTab;
    pub const OF_GLOBAL_VAR: Self = Self::InObjSymTab;
    pub const OF_JUMP: Self = Self::Local;

    fn ident_pfx(self) -> &'static str {
        match self {
            Self::InObjSymTab => IDENT_PFX_NONLOCAL,
            Self::Local => IDENT_PFX_LOCAL,
        }
    }
}

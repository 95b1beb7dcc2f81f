use anyhow::{Result, anyhow};
use derive_more::Deref;
use std::{borrow::Borrow, path::PathBuf};

const AST_SFX: &str = ".ast.json";
const TAC_SFX: &str = ".tac.json";
const OPTIMIZED_TAC_SFX: &str = ".optimized_tac.json";

/// What the driver reads a source file as.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SrcKind {
    /// A typed AST, as written by the front end.
    Ast,
    /// The TAC interchange format, as written by `--tac` or `--cfopt`.
    Tac,
}

#[derive(Deref, Debug)]
pub struct SrcFilepath {
    #[deref]
    path: PathBuf,
    kind: SrcKind,
}
impl TryFrom<PathBuf> for SrcFilepath {
    type Error = anyhow::Error;
    fn try_from(path: PathBuf) -> Result<Self> {
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        /* The output of `--cfopt` is read back as TAC. */
        let kind = if name.ends_with(AST_SFX) && name.len() > AST_SFX.len() {
            SrcKind::Ast
        } else if name.ends_with(OPTIMIZED_TAC_SFX) && name.len() > OPTIMIZED_TAC_SFX.len() {
            SrcKind::Tac
        } else if name.ends_with(TAC_SFX) && name.len() > TAC_SFX.len() {
            SrcKind::Tac
        } else {
            return Err(anyhow!(
                "The source file must have extension `{AST_SFX}`, `{TAC_SFX}` or `{OPTIMIZED_TAC_SFX}`, found {path:?}."
            ));
        };
        Ok(Self { path, kind })
    }
}
impl SrcFilepath {
    pub fn kind(&self) -> SrcKind {
        self.kind
    }

    /// The path with the whole multi-part extension stripped off.
    fn stem(&self) -> PathBuf {
        let sfx = match self.kind {
            SrcKind::Ast => AST_SFX,
            SrcKind::Tac if self.to_string_lossy().ends_with(OPTIMIZED_TAC_SFX) => {
                OPTIMIZED_TAC_SFX
            }
            SrcKind::Tac => TAC_SFX,
        };
        let path = self.to_string_lossy();
        PathBuf::from(&path[..path.len() - sfx.len()])
    }
    fn with_sfx(&self, sfx: &str) -> PathBuf {
        let mut path = self.stem().into_os_string();
        path.push(sfx);
        PathBuf::from(path)
    }
}

#[derive(Deref, Debug)]
pub struct TacFilepath(PathBuf);
impl<S: Borrow<SrcFilepath>> From<S> for TacFilepath {
    fn from(src_filepath: S) -> Self {
        Self(src_filepath.borrow().with_sfx(TAC_SFX))
    }
}

#[derive(Deref, Debug)]
pub struct OptimizedTacFilepath(PathBuf);
impl<S: Borrow<SrcFilepath>> From<S> for OptimizedTacFilepath {
    fn from(src_filepath: S) -> Self {
        Self(src_filepath.borrow().with_sfx(OPTIMIZED_TAC_SFX))
    }
}

#[derive(Deref, Debug)]
pub struct AsmFilepath(PathBuf);
impl<S: Borrow<SrcFilepath>> From<S> for AsmFilepath {
    fn from(src_filepath: S) -> Self {
        Self(src_filepath.borrow().with_sfx(".s"))
    }
}

#[derive(Deref, Debug)]
pub struct ObjectFilepath(PathBuf);
impl<A: Borrow<AsmFilepath>> From<A> for ObjectFilepath {
    fn from(asm_filepath: A) -> Self {
        let mut obj_filepath = PathBuf::from(asm_filepath.borrow() as &PathBuf);
        obj_filepath.set_extension("o");
        Self(obj_filepath)
    }
}

#[derive(Deref, Debug)]
pub struct ProgramFilepath(PathBuf);
impl<A: Borrow<AsmFilepath>> From<A> for ProgramFilepath {
    fn from(asm_filepath: A) -> Self {
        let mut prog_filepath = PathBuf::from(asm_filepath.borrow() as &PathBuf);
        prog_filepath.set_extension("");
        Self(prog_filepath)
    }
}

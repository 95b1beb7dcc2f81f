use super::InstrsGenerator;
use crate::{stage2_tac::tac_ast as t, stage4_asm_gen::asm_ast::*};

/// TAC Operand -> Asm Operand
impl InstrsGenerator {
    pub(super) fn convert_operand(t_operand: t::Operand) -> PreFinalOperand {
        match t_operand {
            t::Operand::Temp(temp) => PreFinalOperand::Pseudo(temp),
            t::Operand::Global(ident) => PreFinalOperand::Data(ident),
        }
    }
}

use crate::{stage1_ast::bx_ast as bx, stage2_tac::tac_ast::*};

pub enum UnaryOperatorType {
    Numeric(UnaryOperator),
    LogicalNot,
}
pub enum BinaryOperatorType {
    Numeric(BinaryOperator),
    Comparison(JumpCondition),
    ShortCircuit(ShortCircuitBOT),
}
pub enum ShortCircuitBOT {
    And,
    Or,
}

pub fn convert_op_unary(bx_unary_op: bx::UnaryOperator) -> UnaryOperatorType {
    use UnaryOperatorType as UOT;
    use bx::UnaryOperator as BUO;
    match bx_unary_op {
        BUO::Negate => UOT::Numeric(UnaryOperator::Negate),
        BUO::Complement => UOT::Numeric(UnaryOperator::Complement),
        BUO::Not => UOT::LogicalNot,
    }
}

/// Each comparison is lowered as a test of `lhs - rhs` against zero.
pub fn convert_op_binary(bx_binary_op: bx::BinaryOperator) -> BinaryOperatorType {
    use BinaryOperator as TBO;
    use BinaryOperatorType as BOT;
    use JumpCondition as JC;
    use ShortCircuitBOT as SBOT;
    use bx::BinaryOperator as BBO;
    match bx_binary_op {
        BBO::Add => BOT::Numeric(TBO::Add),
        BBO::Sub => BOT::Numeric(TBO::Sub),
        BBO::Mul => BOT::Numeric(TBO::Mul),
        BBO::Div => BOT::Numeric(TBO::Div),
        BBO::Mod => BOT::Numeric(TBO::Mod),
        BBO::BitAnd => BOT::Numeric(TBO::And),
        BBO::BitOr => BOT::Numeric(TBO::Or),
        BBO::BitXor => BOT::Numeric(TBO::Xor),
        BBO::Shl => BOT::Numeric(TBO::Shl),
        BBO::Shr => BOT::Numeric(TBO::Shr),
        BBO::Eq => BOT::Comparison(JC::Zero),
        BBO::Neq => BOT::Comparison(JC::NotZero),
        BBO::Lt => BOT::Comparison(JC::Less),
        BBO::Lte => BOT::Comparison(JC::LessEq),
        BBO::Gt => BOT::Comparison(JC::NotLessEq),
        BBO::Gte => BOT::Comparison(JC::NotLess),
        BBO::And => BOT::ShortCircuit(SBOT::And),
        BBO::Or => BOT::ShortCircuit(SBOT::Or),
    }
}

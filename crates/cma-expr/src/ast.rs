// ast.rs — Parsed form of a constraint expression.

use crate::value::Value;

/// A parsed constraint expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal string, number, or boolean.
    Literal(Value),
    /// Dotted field path resolved against the entity at evaluation time.
    Path(Vec<String>),
    /// `not <expr>`
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Binary operators, loosest-binding last in the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// List membership: `'PII' in tags`.
    In,
    And,
    Or,
    /// Material implication: false/absent antecedent makes it true.
    Implies,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Implies => "implies",
        };
        write!(f, "{}", text)
    }
}

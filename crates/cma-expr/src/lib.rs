//! # cma-expr
//!
//! The constraint expression mini-language for Composable Mesh
//! Architecture governance.
//!
//! Constraint expressions are small boolean formulas over an entity's
//! resolved attributes:
//!
//! ```text
//! deployment.encryption.atRest == true
//! 'PII' in tags
//! deployment.environment != 'production' implies deployment.masking.enabled == true
//! ```
//!
//! The crate provides a tokenizer, a recursive-descent parser to a
//! small AST, and a deterministic, sandboxed evaluator over a typed
//! value union — no runtime eval, no function calls, no side effects.
//!
//! ## Key semantics
//!
//! - Missing field paths resolve to [`Value::Absent`]; `absent == x`
//!   is always false, `'X' in tags` is false when tags is absent.
//! - `implies` is material implication: a false or absent antecedent
//!   makes the whole expression true without evaluating the consequent.
//! - Type mismatches (ordering non-numbers, non-boolean results) are
//!   reported as [`ExprError::TypeMismatch`] — distinct from a clean
//!   `false`, so callers never conflate "violated" with "unevaluable".

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

// Re-export the main types at the crate root for convenience.
pub use ast::{BinaryOp, Expr};
pub use error::ExprError;
pub use eval::{eval, eval_bool, Resolver};
pub use parser::parse;
pub use value::Value;

// eval.rs — Evaluator for constraint expressions.
//
// Evaluation is deterministic and sandboxed: there is no function call
// syntax, no side channel, just field lookups through the Resolver and
// boolean/comparison operators. Absent values have defined semantics
// (see Value) so missing deployment attributes produce a clean `false`
// where that is meaningful and a TypeMismatch where it is not.

use crate::ast::{BinaryOp, Expr};
use crate::error::ExprError;
use crate::value::Value;

/// Resolves dotted field paths to values for one entity.
///
/// Implemented by the governance engine over the entity's own fields,
/// tags, semantics, and deployment attribute tree. Missing paths must
/// resolve to [`Value::Absent`], never error.
pub trait Resolver {
    fn resolve(&self, path: &[String]) -> Value;
}

/// Evaluate an expression to its final value.
pub fn eval(expr: &Expr, resolver: &dyn Resolver) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Path(path) => Ok(resolver.resolve(path)),
        Expr::Not(inner) => {
            let operand = eval(inner, resolver)?;
            Ok(Value::Bool(!truthy(&operand, "not")?))
        }
        Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, resolver),
    }
}

/// Evaluate an expression that must produce a boolean — the contract
/// for constraint expressions. A non-boolean result is a type mismatch,
/// reported distinctly from a clean `false`.
pub fn eval_bool(expr: &Expr, resolver: &dyn Resolver) -> Result<bool, ExprError> {
    match eval(expr, resolver)? {
        Value::Bool(b) => Ok(b),
        other => Err(ExprError::mismatch(format!(
            "constraint expression evaluated to {} instead of a boolean",
            other.type_name()
        ))),
    }
}

fn eval_binary(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    resolver: &dyn Resolver,
) -> Result<Value, ExprError> {
    // Short-circuit forms first — their right side may never run.
    match op {
        BinaryOp::And => {
            if !truthy(&eval(lhs, resolver)?, "and")? {
                return Ok(Value::Bool(false));
            }
            return Ok(Value::Bool(truthy(&eval(rhs, resolver)?, "and")?));
        }
        BinaryOp::Or => {
            if truthy(&eval(lhs, resolver)?, "or")? {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(truthy(&eval(rhs, resolver)?, "or")?));
        }
        BinaryOp::Implies => {
            // Material implication: a false or absent antecedent makes
            // the implication vacuously true, consequent unevaluated.
            if !truthy(&eval(lhs, resolver)?, "implies")? {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(truthy(&eval(rhs, resolver)?, "implies")?));
        }
        _ => {}
    }

    let left = eval(lhs, resolver)?;
    let right = eval(rhs, resolver)?;

    match op {
        BinaryOp::Eq => Ok(Value::Bool(left.loose_eq(&right))),
        BinaryOp::Ne => Ok(Value::Bool(!left.loose_eq(&right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let (a, b) = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => (*a, *b),
                _ => {
                    return Err(ExprError::mismatch(format!(
                        "cannot order {} against {} (ordering is numeric only)",
                        left.type_name(),
                        right.type_name()
                    )))
                }
            };
            let result = match op {
                BinaryOp::Lt => a < b,
                BinaryOp::Le => a <= b,
                BinaryOp::Gt => a > b,
                BinaryOp::Ge => a >= b,
                _ => unreachable!(),
            };
            Ok(Value::Bool(result))
        }
        BinaryOp::In => match &right {
            Value::List(items) => Ok(Value::Bool(items.iter().any(|item| item.loose_eq(&left)))),
            // An absent collection contains nothing.
            Value::Absent => Ok(Value::Bool(false)),
            other => Err(ExprError::mismatch(format!(
                "right side of 'in' must be a list, got {}",
                other.type_name()
            ))),
        },
        BinaryOp::And | BinaryOp::Or | BinaryOp::Implies => unreachable!(),
    }
}

/// Boolean coercion for logical operators: Bool is itself, Absent is
/// false, anything else is a type mismatch.
fn truthy(value: &Value, op: &str) -> Result<bool, ExprError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Absent => Ok(false),
        other => Err(ExprError::mismatch(format!(
            "operand of '{}' must be a boolean, got {}",
            op,
            other.type_name()
        ))),
    }
}

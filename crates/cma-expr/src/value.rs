// value.rs — The typed value union constraint expressions evaluate over.
//
// Absent is a first-class value, not an error: constraint expressions
// routinely reference deployment attributes the snapshot simply does not
// carry, and the language gives that a defined meaning (equality is
// false, implication antecedents are vacuously false) instead of
// failing the evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value in the constraint expression language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A field path that resolved to nothing.
    Absent,
}

impl Value {
    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Absent => "absent",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Equality as the language defines it: Absent is equal to nothing
    /// (including itself), numbers compare numerically, and values of
    /// different types are simply unequal.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Absent, _) | (_, Value::Absent) => false,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.loose_eq(vb))
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_equals_nothing() {
        assert!(!Value::Absent.loose_eq(&Value::Bool(true)));
        assert!(!Value::Absent.loose_eq(&Value::Absent));
        assert!(!Value::Bool(false).loose_eq(&Value::Absent));
    }

    #[test]
    fn cross_type_is_unequal_not_an_error() {
        assert!(!Value::Number(1.0).loose_eq(&Value::Str("1".into())));
        assert!(!Value::Bool(true).loose_eq(&Value::Number(1.0)));
    }

    #[test]
    fn same_type_compares() {
        assert!(Value::Str("live".into()).loose_eq(&Value::Str("live".into())));
        assert!(Value::Number(365.0).loose_eq(&Value::Number(365.0)));
        assert!(Value::List(vec![Value::Bool(true)]).loose_eq(&Value::List(vec![Value::Bool(true)])));
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Absent.type_name(), "absent");
        assert_eq!(Value::List(vec![]).type_name(), "list");
    }
}

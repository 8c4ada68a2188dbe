//! Scalar values carried by data items.

use std::fmt;

/// A normalized observation value.
///
/// Collectors only ever produce numbers, booleans and strings, so the set
/// is closed: there is no "other" variant to reject at evaluation time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// The type tag of a [`Value`], used for type compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Bool,
    Text,
}

impl ValueKind {
    /// Returns true for kinds that only support equality comparisons.
    pub fn is_equality_only(&self) -> bool {
        matches!(self, ValueKind::Bool | ValueKind::Text)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Bool => "bool",
            ValueKind::Text => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the type tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Returns the numeric payload, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Value::from(1.5).kind(), ValueKind::Number);
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from("x").kind(), ValueKind::Text);
        assert!(ValueKind::Text.is_equality_only());
        assert!(ValueKind::Bool.is_equality_only());
        assert!(!ValueKind::Number.is_equality_only());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(3_u64).as_f64(), Some(3.0));
        assert_eq!(Value::from("a").as_f64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(2.0).to_string(), "2");
        assert_eq!(Value::from(0.25).to_string(), "0.25");
        assert_eq!(Value::from("920100-1").to_string(), "920100-1");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_untagged() {
        let json = serde_json::to_string(&vec![Value::from(1.5), Value::from(true), Value::from("a")])
            .unwrap();
        assert_eq!(json, r#"[1.5,true,"a"]"#);
    }
}

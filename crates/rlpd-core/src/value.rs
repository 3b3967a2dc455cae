// Recursive RLP value model: a byte string or an ordered list of values.
use serde_json::json;
use std::fmt::{self, Write as _};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Leaf(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    pub fn leaf(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Leaf(bytes.into())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Leaf(b) => Some(b),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::Leaf(_) => None,
            Value::List(items) => Some(items),
        }
    }

    /// Indented, one-item-per-line rendering with hex leaves.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.fmt_value(0, &mut out).ok();
        out
    }

    fn fmt_value(&self, indent: usize, out: &mut String) -> fmt::Result {
        let pad = |n: usize| -> String { " ".repeat(n) };
        match self {
            Value::Leaf(b) if b.is_empty() => writeln!(out, "<empty>"),
            Value::Leaf(b) => writeln!(out, "0x{}", hex::encode(b)),
            Value::List(items) => {
                writeln!(out, "List({}) [", items.len())?;
                for it in items {
                    write!(out, "{}", pad(indent + 2))?;
                    it.fmt_value(indent + 2, out)?;
                }
                write!(out, "{}]", pad(indent))?;
                writeln!(out)
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Leaf(b) => json!({ "hex": hex::encode(b) }),
            Value::List(items) => {
                json!({ "list": items.iter().map(Value::to_json).collect::<Vec<_>>() })
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

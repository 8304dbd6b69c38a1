//! Loosely-typed values and the SQL literal quoter.
//!
//! Every value that ends up inside a generated statement goes through [`quote`].
//! This is a literal embedder, not a parameter binder: numeric-looking text is
//! emitted bare and everything else is backslash-escaped and single-quoted.

use crate::schema::ColumnType;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static NUMERIC_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\-.]+$").expect("valid numeric literal regex"));

/// A caller-supplied or database-returned value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    /// A list of values; rendered as an `IN (...)` list inside conditions.
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Text form of a scalar value, `None` for `NULL` and lists.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::List(_) => None,
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::UInt(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Whether the text form consists of ASCII digits only.
    pub fn is_digits(&self) -> bool {
        self.as_text().is_some_and(|t| is_digits(&t))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            other => f.write_str(&other.as_text().unwrap_or_default()),
        }
    }
}

macro_rules! value_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

macro_rules! value_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::UInt(u64::from(v))
            }
        })*
    };
}

value_from_signed!(i8, i16, i32, i64);
value_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            // Nested objects have no column meaning; embed them as JSON text.
            obj @ serde_json::Value::Object(_) => Value::Text(obj.to_string()),
        }
    }
}

/// A quoted SQL literal, or a list of them for `IN` lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quoted {
    Scalar(String),
    List(Vec<String>),
}

impl Quoted {
    pub fn into_list(self) -> Vec<String> {
        match self {
            Quoted::Scalar(s) => vec![s],
            Quoted::List(items) => items,
        }
    }
}

impl fmt::Display for Quoted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quoted::Scalar(s) => f.write_str(s),
            Quoted::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Quote a value as a SQL literal.
///
/// Lists are quoted element-wise. Text matching `^[0-9\-.]+$` is emitted bare
/// whatever the column type; this includes date-like strings such as
/// `2024-01-05`. Booleans become `1`/`0`, quoted only for string columns.
pub fn quote(value: &Value, column_type: Option<ColumnType>) -> Quoted {
    match value {
        Value::List(items) => Quoted::List(
            items
                .iter()
                .map(|item| quote_scalar(item, column_type))
                .collect(),
        ),
        other => Quoted::Scalar(quote_scalar(other, column_type)),
    }
}

fn quote_scalar(value: &Value, column_type: Option<ColumnType>) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => {
            let digit = if *b { "1" } else { "0" };
            match column_type {
                Some(ColumnType::String) => format!("'{digit}'"),
                _ => digit.to_string(),
            }
        }
        Value::List(items) => items
            .iter()
            .map(|item| quote_scalar(item, column_type))
            .collect::<Vec<_>>()
            .join(","),
        other => {
            let text = other.as_text().unwrap_or_default();
            if is_numeric_literal(&text) {
                text
            } else {
                format!("'{}'", escape_str(&text))
            }
        }
    }
}

/// Whether `text` matches `^[0-9\-.]+$`.
pub fn is_numeric_literal(text: &str) -> bool {
    NUMERIC_LITERAL.is_match(text)
}

/// Whether `text` is non-empty and made of ASCII digits only.
pub fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Backslash-escape quotes, backslashes and NUL.
pub fn escape_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

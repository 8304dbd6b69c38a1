//! Result rows and typed column access

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// A result row: column name → value, in result-set order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Text form of a column; `None` when missing, `NULL` or a list.
    pub fn get_str(&self, column: &str) -> Option<String> {
        self.get(column).and_then(Value::as_text)
    }

    /// Decode a column into `T`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        match self.get(column) {
            Some(value) => T::from_value(value).map_err(|msg| OrmError::decode(column, msg)),
            None => T::from_missing()
                .ok_or_else(|| OrmError::decode(column, "column not present in row")),
        }
    }

    /// The first value of the row, e.g. the `COUNT(*)` of a count query.
    pub fn first(&self) -> Option<&Value> {
        self.columns.get_index(0).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Conversion from a row [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;

    /// Value used when the column is absent from the row.
    fn from_missing() -> Option<Self> {
        None
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_text()
            .ok_or_else(|| format!("cannot read {value:?} as text"))
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::UInt(n) => i64::try_from(*n).map_err(|e| e.to_string()),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Text(s) => s.trim().parse().map_err(|e| format!("{e}: {s:?}")),
            other => Err(format!("cannot read {other:?} as i64")),
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::UInt(n) => Ok(*n),
            Value::Int(n) => u64::try_from(*n).map_err(|e| e.to_string()),
            Value::Bool(b) => Ok(u64::from(*b)),
            Value::Text(s) => s.trim().parse().map_err(|e| format!("{e}: {s:?}")),
            other => Err(format!("cannot read {other:?} as u64")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(n) => Ok(*n as f64),
            Value::UInt(n) => Ok(*n as f64),
            Value::Text(s) => s.trim().parse().map_err(|e| format!("{e}: {s:?}")),
            other => Err(format!("cannot read {other:?} as f64")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(n) => Ok(*n != 0),
            Value::UInt(n) => Ok(*n != 0),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" | "" => Ok(false),
                other => Err(format!("cannot read {other:?} as bool")),
            },
            other => Err(format!("cannot read {other:?} as bool")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn from_missing() -> Option<Self> {
        Some(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        [
            ("id", Value::Text("7".into())),
            ("title", Value::Text("hello".into())),
            ("deleted_at", Value::Null),
            ("score", Value::Float(1.5)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn typed_access() {
        let row = sample();
        assert_eq!(row.try_get::<i64>("id").unwrap(), 7);
        assert_eq!(row.try_get::<u64>("id").unwrap(), 7);
        assert_eq!(row.try_get::<String>("title").unwrap(), "hello");
        assert_eq!(row.try_get::<Option<String>>("deleted_at").unwrap(), None);
        assert_eq!(row.try_get::<f64>("score").unwrap(), 1.5);
    }

    #[test]
    fn missing_and_bad_columns() {
        let row = sample();
        assert!(row.try_get::<i64>("nope").is_err());
        assert_eq!(row.try_get::<Option<i64>>("nope").unwrap(), None);
        let err = row.try_get::<i64>("title").unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "title"));
    }

    #[test]
    fn keeps_column_order_and_serializes() {
        let row = sample();
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            ["id", "title", "deleted_at", "score"]
        );
        assert_eq!(row.first(), Some(&Value::Text("7".into())));
        assert_eq!(
            row.to_json(),
            serde_json::json!({"id": "7", "title": "hello", "deleted_at": null, "score": 1.5})
        );
    }
}

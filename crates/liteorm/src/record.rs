//! Insert/update input records.

use crate::value::Value;
use indexmap::IndexMap;

/// Column → value input for INSERT and UPDATE.
///
/// Keys that do not name a schema column are ignored by the builders; a `NULL`
/// value counts as "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// The value of `column` unless it is absent or `NULL`.
    pub fn supplied(&self, column: &str) -> Option<&Value> {
        self.get(column).filter(|v| !v.is_null())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Record {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<IndexMap<String, Value>> for Record {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }
}

/// One or more records for a multi-row INSERT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records(pub Vec<Record>);

impl Records {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Record::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.0.iter()
    }
}

impl From<Record> for Records {
    fn from(record: Record) -> Self {
        Records(vec![record])
    }
}

impl From<Vec<Record>> for Records {
    fn from(records: Vec<Record>) -> Self {
        Records(records)
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Records {
    fn from(pairs: [(K, V); N]) -> Self {
        Records(vec![Record::from(pairs)])
    }
}

impl From<serde_json::Value> for Records {
    /// An object is one record, an array of objects is many; anything else is
    /// empty input.
    fn from(json: serde_json::Value) -> Self {
        fn record(map: serde_json::Map<String, serde_json::Value>) -> Record {
            map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
        }

        match json {
            serde_json::Value::Object(map) => Records(vec![record(map)]),
            serde_json::Value::Array(items) => Records(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::Object(map) => Some(record(map)),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Records::default(),
        }
    }
}

impl From<serde_json::Value> for Record {
    fn from(json: serde_json::Value) -> Self {
        Records::from(json).0.into_iter().next().unwrap_or_default()
    }
}

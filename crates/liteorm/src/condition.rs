//! WHERE-clause conditions.
//!
//! Callers hand conditions over in one of three shapes (an id, a column → value
//! map, or a raw SQL fragment). [`Condition`] makes the shape explicit; the
//! `From` impls accept the loose forms at the call boundary so that
//! `session.find(3, ..)`, `session.find([("id", 3)], ..)` and
//! `session.find("`id` = 3", ..)` all select the same row.
//!
//! # Example
//! ```ignore
//! use liteorm::Condition;
//!
//! let by_id = Condition::from(3);
//! let by_map = Condition::from([("author", "John Smith")]);
//! let by_list = Condition::from([("id", vec![1, 2, 3])]);
//! let raw = Condition::raw("created_at > NOW() - INTERVAL 1 DAY");
//! ```

use crate::builder::TableRef;
use crate::ident::{quote_ident, write_ident};
use crate::value::{Value, is_digits};
use indexmap::IndexMap;

/// Combinator used when `operator` is not given in the options.
pub const DEFAULT_OPERATOR: &str = "AND";

/// Filter criteria for a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// No filtering.
    #[default]
    All,
    /// Primary-key equality.
    ById(u64),
    /// Column equality per entry (or `IN` for list values), joined with the
    /// options' operator. Entries keep insertion order.
    Equals(IndexMap<String, Value>),
    /// A caller-trusted SQL fragment emitted after `WHERE` unmodified. A
    /// fragment made of digits only is read as an id.
    Raw(String),
}

impl Condition {
    /// Trusted raw fragment. Never pass untrusted input here.
    pub fn raw(fragment: impl Into<String>) -> Self {
        Condition::Raw(fragment.into())
    }

    /// Whether the condition compiles to no clause at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::All => true,
            Condition::ById(_) => false,
            Condition::Equals(map) => map.is_empty(),
            Condition::Raw(s) => s.trim().is_empty(),
        }
    }

    /// Compile to `WHERE ...` (no leading space), or `""` when there is
    /// nothing to filter on.
    ///
    /// Map entries whose key is numeric are primary-key tests on their value; such
    /// an entry with a non-numeric value produces no fragment at all.
    pub fn compile(&self, operator: &str, table: &TableRef<'_>) -> String {
        match self {
            Condition::All => String::new(),
            Condition::ById(id) => format!("WHERE {} = {id}", quote_ident(table.primary_key)),
            Condition::Raw(fragment) => {
                let trimmed = fragment.trim();
                if trimmed.is_empty() {
                    String::new()
                } else if is_digits(trimmed) {
                    format!("WHERE {} = {trimmed}", quote_ident(table.primary_key))
                } else {
                    format!("WHERE {fragment}")
                }
            }
            Condition::Equals(map) => {
                let fragments: Vec<String> = map
                    .iter()
                    .filter_map(|(key, value)| compile_entry(key, value, table))
                    .collect();
                if fragments.is_empty() {
                    return String::new();
                }
                let operator = match operator.trim() {
                    "" => DEFAULT_OPERATOR,
                    op => op,
                };
                format!("WHERE {}", fragments.join(&format!(" {operator} ")))
            }
        }
    }
}

fn compile_entry(key: &str, value: &Value, table: &TableRef<'_>) -> Option<String> {
    let numeric_key = is_digits(key);
    let column = if numeric_key { table.primary_key } else { key };

    let mut out = String::new();
    if let Value::List(items) = value {
        write_ident(&mut out, column);
        if items.is_empty() {
            // `IN ()` is a syntax error; an empty list matches nothing.
            return Some("1=0".to_string());
        }
        let quoted = table.columns.quote(value, Some(column)).into_list();
        out.push_str(" IN (");
        out.push_str(&quoted.join(","));
        out.push(')');
        return Some(out);
    }

    if numeric_key {
        let text = value.as_text().filter(|t| is_digits(t))?;
        write_ident(&mut out, table.primary_key);
        out.push_str(" = ");
        out.push_str(&text);
        return Some(out);
    }

    write_ident(&mut out, key);
    out.push_str(" = ");
    out.push_str(&table.columns.quote(value, Some(key)).to_string());
    Some(out)
}

impl From<()> for Condition {
    fn from(_: ()) -> Self {
        Condition::All
    }
}

impl From<u64> for Condition {
    fn from(id: u64) -> Self {
        Condition::ById(id)
    }
}

impl From<u32> for Condition {
    fn from(id: u32) -> Self {
        Condition::ById(u64::from(id))
    }
}

impl From<usize> for Condition {
    fn from(id: usize) -> Self {
        Condition::ById(id as u64)
    }
}

macro_rules! condition_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Condition {
            /// Non-negative values are ids; negative ones become a raw fragment.
            fn from(n: $ty) -> Self {
                match u64::try_from(n) {
                    Ok(id) => Condition::ById(id),
                    Err(_) => Condition::Raw(n.to_string()),
                }
            }
        })*
    };
}

condition_from_signed!(i32, i64);

impl From<f64> for Condition {
    /// Always a raw fragment of the float's text. A whole non-negative value
    /// prints as digits only and so compiles to a primary-key test.
    fn from(n: f64) -> Self {
        Condition::Raw(Value::Float(n).to_string())
    }
}

impl From<&str> for Condition {
    fn from(fragment: &str) -> Self {
        Condition::Raw(fragment.to_string())
    }
}

impl From<String> for Condition {
    fn from(fragment: String) -> Self {
        Condition::Raw(fragment)
    }
}

impl From<IndexMap<String, Value>> for Condition {
    fn from(map: IndexMap<String, Value>) -> Self {
        Condition::Equals(map)
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Condition {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Condition {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Condition {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Condition::Equals(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<T: Into<Condition>> From<Option<T>> for Condition {
    fn from(c: Option<T>) -> Self {
        c.map_or(Condition::All, Into::into)
    }
}

impl From<serde_json::Value> for Condition {
    /// Objects are column maps and arrays are maps keyed by position (so
    /// `[3, 4]` tests the primary key against both values). `true` reads as id 1.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null | serde_json::Value::Bool(false) => Condition::All,
            serde_json::Value::Bool(true) => Condition::ById(1),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(id) => Condition::ById(id),
                None => Condition::Raw(n.to_string()),
            },
            serde_json::Value::String(s) => Condition::Raw(s),
            serde_json::Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), Value::from(v)))
                .collect(),
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDescriptor, TableColumns};

    fn posts() -> TableColumns {
        TableColumns::new([
            ColumnDescriptor::new("id", "int(11)").auto_increment(),
            ColumnDescriptor::new("title", "varchar(255)"),
            ColumnDescriptor::new("author", "varchar(255)"),
            ColumnDescriptor::new("published", "tinyint(1)"),
        ])
    }

    fn compile(c: impl Into<Condition>) -> String {
        let columns = posts();
        let table = TableRef::new("posts", "id", &columns);
        c.into().compile(DEFAULT_OPERATOR, &table)
    }

    #[test]
    fn three_equivalent_id_forms() {
        assert_eq!(compile(3), "WHERE `id` = 3");
        assert_eq!(compile([("id", 3)]), "WHERE `id` = 3");
        assert_eq!(compile("`id` = 3"), "WHERE `id` = 3");
        assert_eq!(compile("3"), "WHERE `id` = 3");
    }

    #[test]
    fn empty_inputs_yield_no_clause() {
        assert_eq!(compile(Condition::All), "");
        assert_eq!(compile(IndexMap::<String, Value>::new()), "");
        assert_eq!(compile(""), "");
        assert_eq!(compile("   "), "");
        assert_eq!(compile(None::<u64>), "");
        assert_eq!(compile(serde_json::Value::Null), "");
    }

    #[test]
    fn zero_is_a_valid_id() {
        assert_eq!(compile(0), "WHERE `id` = 0");
        assert!(!Condition::from(0).is_empty());
    }

    #[test]
    fn numbers_that_are_not_ids_are_raw() {
        assert_eq!(compile(-5), "WHERE -5");
        assert_eq!(compile(2.5), "WHERE 2.5");
        assert_eq!(compile(4.0), "WHERE `id` = 4");
    }

    #[test]
    fn map_entries_are_quoted_and_joined() {
        assert_eq!(
            compile([("author", "John Smith"), ("title", "O'Brien")]),
            r"WHERE `author` = 'John Smith' AND `title` = 'O\'Brien'"
        );
    }

    #[test]
    fn custom_operator() {
        let columns = posts();
        let table = TableRef::new("posts", "id", &columns);
        let c = Condition::from([("author", "a"), ("title", "b")]);
        assert_eq!(
            c.compile("OR", &table),
            "WHERE `author` = 'a' OR `title` = 'b'"
        );
        assert_eq!(c.compile("", &table), "WHERE `author` = 'a' AND `title` = 'b'");
    }

    #[test]
    fn list_values_become_in_lists() {
        assert_eq!(compile([("id", vec![1, 2, 3])]), "WHERE `id` IN (1,2,3)");
        assert_eq!(
            compile([("author", vec!["a", "b"])]),
            "WHERE `author` IN ('a','b')"
        );
        assert_eq!(compile([("id", Vec::<i32>::new())]), "WHERE 1=0");
    }

    #[test]
    fn bool_values_follow_column_type() {
        assert_eq!(compile([("published", true)]), "WHERE `published` = 1");
        assert_eq!(compile([("title", true)]), "WHERE `title` = '1'");
    }

    #[test]
    fn numeric_keys_test_the_primary_key() {
        assert_eq!(compile([("0", 7)]), "WHERE `id` = 7");
        assert_eq!(compile(serde_json::json!([3, 4])), "WHERE `id` = 3 AND `id` = 4");
        assert_eq!(compile([("0", vec![7, 8])]), "WHERE `id` IN (7,8)");
    }

    #[test]
    fn numeric_key_with_non_numeric_value_is_dropped() {
        assert_eq!(compile([("0", "abc")]), "");
        assert_eq!(
            compile(vec![("0", Value::from("abc")), ("author", Value::from("x"))]),
            "WHERE `author` = 'x'"
        );
    }

    #[test]
    fn custom_primary_key() {
        let columns = posts();
        let table = TableRef::new("posts", "post_id", &columns);
        assert_eq!(Condition::from(9).compile("AND", &table), "WHERE `post_id` = 9");
    }

    #[test]
    fn json_shapes() {
        assert_eq!(compile(serde_json::json!(5)), "WHERE `id` = 5");
        assert_eq!(compile(serde_json::json!({"author": "x"})), "WHERE `author` = 'x'");
        assert_eq!(compile(serde_json::json!("title IS NULL")), "WHERE title IS NULL");
        assert_eq!(compile(serde_json::json!(true)), "WHERE `id` = 1");
    }
}

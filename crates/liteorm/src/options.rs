//! Statement modifiers appended after the WHERE clause.
//!
//! [`QueryOptions`] is either a key → value map with a few well-known keys
//! (`select`, `joins`, `order`, `group`, `limit`, `offset`, `operator`) plus
//! arbitrary pass-through keys, or a raw trailing string.
//!
//! Keys are stored lower-cased, so `ORDER` and `order` are the same option.
//! Option values are caller text. Every value is cut at its first `;` so that
//! an option cannot smuggle a second statement; no other sanitization happens.

use crate::condition::DEFAULT_OPERATOR;
use indexmap::IndexMap;

/// Keys consumed elsewhere and never rendered as trailing clauses.
const RESERVED: &[&str] = &["operator", "select", "joins"];
const GROUP_KEYS: &[&str] = &["group", "group_by"];
const ORDER_KEYS: &[&str] = &["order", "order_by"];

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOptions {
    Map(IndexMap<String, String>),
    Raw(String),
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions::Map(IndexMap::new())
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A raw trailing clause, appended after one space.
    pub fn raw(clause: impl Into<String>) -> Self {
        QueryOptions::Raw(clause.into())
    }

    /// Set `key` to `value`. On raw options this is a no-op.
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        if let QueryOptions::Map(map) = &mut self {
            map.insert(normalize_key(key), value.to_string());
        }
        self
    }

    /// Set `key` only when it is not already present. Raw options already
    /// carry their whole trailing clause and are left alone.
    pub fn with_default(mut self, key: &str, value: impl ToString) -> Self {
        if let QueryOptions::Map(map) = &mut self {
            map.entry(normalize_key(key))
                .or_insert_with(|| value.to_string());
        }
        self
    }

    pub fn select(self, projection: impl Into<String>) -> Self {
        self.set("select", projection.into())
    }

    pub fn joins(self, joins: impl Into<String>) -> Self {
        self.set("joins", joins.into())
    }

    /// `column [ASC|DESC]`, or a comma-separated list of those.
    pub fn order(self, order: impl Into<String>) -> Self {
        self.set("order", order.into())
    }

    pub fn group(self, group: impl Into<String>) -> Self {
        self.set("group", group.into())
    }

    pub fn limit(self, limit: u64) -> Self {
        self.set("limit", limit)
    }

    pub fn offset(self, offset: u64) -> Self {
        self.set("offset", offset)
    }

    /// Combinator for map conditions (`AND` when unset).
    pub fn operator(self, operator: impl Into<String>) -> Self {
        self.set("operator", operator.into())
    }

    /// The value stored under `key`, cut at its first `;`.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            QueryOptions::Map(map) => map
                .get(key.to_ascii_lowercase().as_str())
                .map(|v| truncate_statement(v)),
            QueryOptions::Raw(_) => None,
        }
    }

    /// Non-empty value of the first present key among `keys`.
    fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self, QueryOptions::Map(map) if map.contains_key(key.to_ascii_lowercase().as_str()))
    }

    /// Projection for SELECT, `*` when unset or empty.
    pub fn projection(&self) -> &str {
        self.first_of(&["select"]).unwrap_or("*")
    }

    /// Extra projection for COUNT queries, if any.
    pub fn extra_projection(&self) -> Option<&str> {
        self.first_of(&["select"])
    }

    /// JOIN clauses placed between the table and WHERE.
    pub fn join_clause(&self) -> Option<&str> {
        self.first_of(&["joins"])
    }

    /// Combinator for map conditions.
    pub fn condition_operator(&self) -> &str {
        self.first_of(&["operator"]).unwrap_or(DEFAULT_OPERATOR)
    }

    /// ` LIMIT n` when a limit was requested, else `""`.
    pub fn limit_clause(&self) -> String {
        self.first_of(&["limit"])
            .map(|n| format!(" LIMIT {n}"))
            .unwrap_or_default()
    }

    /// Trailing text for UPDATE statements: ` LIMIT n` for map options, the
    /// whole clause for raw ones.
    pub fn update_tail(&self) -> String {
        match self {
            QueryOptions::Map(_) => self.limit_clause(),
            QueryOptions::Raw(_) => self.compile(),
        }
    }

    /// Compile into trailing clause text. Each clause carries a leading space;
    /// an empty option set yields `""`.
    ///
    /// Order is fixed: GROUP BY, ORDER BY, pass-through keys in insertion order,
    /// then LIMIT and OFFSET.
    pub fn compile(&self) -> String {
        let map = match self {
            QueryOptions::Raw(clause) => {
                let clause = truncate_statement(clause);
                return if clause.trim().is_empty() {
                    String::new()
                } else {
                    format!(" {clause}")
                };
            }
            QueryOptions::Map(map) => map,
        };

        let mut out = String::new();
        if let Some(group) = self.first_of(GROUP_KEYS) {
            out.push_str(" GROUP BY ");
            out.push_str(group);
        }
        if let Some(order) = self.first_of(ORDER_KEYS) {
            out.push_str(" ORDER BY ");
            out.push_str(&compile_order(order));
        }
        for (key, value) in map {
            let key = key.as_str();
            if RESERVED.contains(&key)
                || GROUP_KEYS.contains(&key)
                || ORDER_KEYS.contains(&key)
                || key == "limit"
                || key == "offset"
            {
                continue;
            }
            let value = truncate_statement(value).trim();
            if value.is_empty() {
                continue;
            }
            out.push(' ');
            out.push_str(&key.to_ascii_uppercase());
            out.push(' ');
            out.push_str(value);
        }
        out.push_str(&self.limit_clause());
        if let Some(offset) = self.first_of(&["offset"]) {
            out.push_str(" OFFSET ");
            out.push_str(offset);
        }
        out
    }
}

impl From<&str> for QueryOptions {
    fn from(clause: &str) -> Self {
        QueryOptions::raw(clause)
    }
}

impl From<String> for QueryOptions {
    fn from(clause: String) -> Self {
        QueryOptions::raw(clause)
    }
}

impl From<()> for QueryOptions {
    fn from(_: ()) -> Self {
        QueryOptions::default()
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for QueryOptions {
    fn from(pairs: [(K, V); N]) -> Self {
        QueryOptions::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (normalize_key(k), v.to_string()))
                .collect(),
        )
    }
}

impl From<IndexMap<String, String>> for QueryOptions {
    fn from(map: IndexMap<String, String>) -> Self {
        QueryOptions::Map(map.into_iter().map(|(k, v)| (normalize_key(k), v)).collect())
    }
}

impl<T: Into<QueryOptions>> From<Option<T>> for QueryOptions {
    fn from(opts: Option<T>) -> Self {
        opts.map_or_else(QueryOptions::default, Into::into)
    }
}

fn normalize_key(key: impl Into<String>) -> String {
    let mut key = key.into();
    key.make_ascii_lowercase();
    key
}

/// Cut `value` at its first `;`.
pub fn truncate_statement(value: &str) -> &str {
    value.split(';').next().unwrap_or_default()
}

/// Render an ORDER BY list: `id desc, title` becomes `` `id` DESC, `title` ``.
fn compile_order(order: &str) -> String {
    order
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(compile_order_item)
        .collect::<Vec<_>>()
        .join(", ")
}

fn compile_order_item(item: &str) -> String {
    let (column, direction) = match item.rsplit_once(char::is_whitespace) {
        Some((column, dir))
            if dir.eq_ignore_ascii_case("ASC") || dir.eq_ignore_ascii_case("DESC") =>
        {
            (column.trim(), Some(dir.to_ascii_uppercase()))
        }
        _ => (item, None),
    };
    let column = if column.eq_ignore_ascii_case("RAND()") || column.contains('`') {
        column.to_string()
    } else {
        format!("`{column}`")
    };
    match direction {
        Some(dir) => format!("{column} {dir}"),
        None => column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_compile_to_nothing() {
        assert_eq!(QueryOptions::new().compile(), "");
        assert_eq!(QueryOptions::from(None::<&str>).compile(), "");
        assert_eq!(QueryOptions::raw("").compile(), "");
    }

    #[test]
    fn order_and_limit() {
        let opts = QueryOptions::from([("order", "id DESC"), ("limit", "15")]);
        assert_eq!(opts.compile(), " ORDER BY `id` DESC LIMIT 15");
    }

    #[test]
    fn limit_and_offset_always_last() {
        let opts = QueryOptions::new()
            .limit(10)
            .offset(20)
            .set("having", "COUNT(*) > 1")
            .group("author");
        assert_eq!(
            opts.compile(),
            " GROUP BY author HAVING COUNT(*) > 1 LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn order_direction_is_case_insensitive() {
        assert_eq!(compile_order("title asc"), "`title` ASC");
        assert_eq!(compile_order("title"), "`title`");
        assert_eq!(compile_order("created_at Desc, id"), "`created_at` DESC, `id`");
    }

    #[test]
    fn order_leaves_rand_and_quoted_columns_alone() {
        assert_eq!(compile_order("RAND()"), "RAND()");
        assert_eq!(compile_order("`posts`.`id` DESC"), "`posts`.`id` DESC");
    }

    #[test]
    fn reserved_keys_are_not_rendered() {
        let opts = QueryOptions::new()
            .select("id, title")
            .joins("JOIN users ON users.id = posts.author_id")
            .operator("OR");
        assert_eq!(opts.compile(), "");
        assert_eq!(opts.projection(), "id, title");
        assert_eq!(opts.condition_operator(), "OR");
        assert!(opts.join_clause().is_some());
    }

    #[test]
    fn empty_pass_through_values_are_skipped() {
        let opts = QueryOptions::from([("having", ""), ("order", "")]);
        assert_eq!(opts.compile(), "");
    }

    #[test]
    fn values_are_truncated_at_semicolon() {
        let opts = QueryOptions::from([("limit", "1; DROP TABLE posts")]);
        assert_eq!(opts.compile(), " LIMIT 1");
        let opts = QueryOptions::from([("order", "id; DELETE FROM posts")]);
        assert_eq!(opts.compile(), " ORDER BY `id`");
        assert_eq!(QueryOptions::raw("LIMIT 3; DROP TABLE x").compile(), " LIMIT 3");
    }

    #[test]
    fn raw_options_pass_through() {
        assert_eq!(
            QueryOptions::from("ORDER BY id DESC LIMIT 5").compile(),
            " ORDER BY id DESC LIMIT 5"
        );
        let raw = QueryOptions::raw("LIMIT 2").with_default("limit", 1);
        assert_eq!(raw.compile(), " LIMIT 2");
    }

    #[test]
    fn with_default_keeps_caller_value() {
        let opts = QueryOptions::new().limit(5).with_default("limit", 1);
        assert_eq!(opts.get("limit"), Some("5"));
        let opts = QueryOptions::new().with_default("limit", 1);
        assert_eq!(opts.limit_clause(), " LIMIT 1");
    }

    #[test]
    fn order_by_alias_and_group_by_alias() {
        let opts = QueryOptions::from([("order_by", "RAND()"), ("group_by", "author")]);
        assert_eq!(opts.compile(), " GROUP BY author ORDER BY RAND()");
    }

    #[test]
    fn pass_through_keys_are_upper_cased() {
        let opts = QueryOptions::new().set("procedure", "ANALYSE()");
        assert_eq!(opts.compile(), " PROCEDURE ANALYSE()");
    }

    #[test]
    fn keys_are_case_insensitive() {
        let opts = QueryOptions::from([("LIMIT", "5"), ("ORDER", "id DESC"), ("having", "x > 1")]);
        assert_eq!(opts.compile(), " ORDER BY `id` DESC HAVING x > 1 LIMIT 5");
        assert_eq!(opts.get("limit"), Some("5"));
        assert_eq!(opts.get("Order"), Some("id DESC"));

        let opts = QueryOptions::new()
            .set("Select", "id")
            .set("OPERATOR", "OR")
            .set("Group_By", "author");
        assert_eq!(opts.compile(), " GROUP BY author");
        assert_eq!(opts.projection(), "id");
        assert_eq!(opts.condition_operator(), "OR");

        let mut map = IndexMap::new();
        map.insert("Offset".to_string(), "10".to_string());
        map.insert("LIMIT".to_string(), "2".to_string());
        let opts = QueryOptions::from(map).with_default("limit", 1);
        assert_eq!(opts.compile(), " LIMIT 2 OFFSET 10");
    }

    #[test]
    fn update_tail_keeps_raw_clause() {
        assert_eq!(QueryOptions::raw("LIMIT 5").update_tail(), " LIMIT 5");
        assert_eq!(QueryOptions::new().limit(2).order("id").update_tail(), " LIMIT 2");
        assert_eq!(QueryOptions::new().update_tail(), "");
    }

    #[test]
    fn projection_defaults_to_star() {
        assert_eq!(QueryOptions::new().projection(), "*");
        assert_eq!(QueryOptions::new().select("").projection(), "*");
        assert_eq!(QueryOptions::new().extra_projection(), None);
    }
}

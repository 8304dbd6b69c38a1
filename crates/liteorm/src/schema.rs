//! Column metadata and the per-table schema cache.

use crate::client::GenericClient;
use crate::error::OrmResult;
use crate::value::{Quoted, Value, quote};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Semantic type of a column, derived from its declared SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Decimal,
    String,
}

impl ColumnType {
    /// Normalize a declared type such as `int(11) unsigned` or `varchar(255)`.
    ///
    /// The length/precision suffix and trailing attributes are ignored.
    pub fn from_declared(declared: &str) -> Self {
        let lower = declared.trim().to_ascii_lowercase();
        let base = lower.split('(').next().unwrap_or_default();
        let base = base.split_whitespace().next().unwrap_or_default();
        match base {
            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" => {
                ColumnType::Integer
            }
            "float" | "double" | "decimal" => ColumnType::Decimal,
            _ => ColumnType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::String => "string",
        }
    }
}

/// Column information as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: String,
    pub nullable: bool,
    pub auto_increment: bool,
}

impl ColumnDescriptor {
    /// A non-nullable, non-auto-increment column.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: false,
            auto_increment: false,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::from_declared(&self.declared_type)
    }
}

/// Ordered column set of one table.
///
/// Iteration order is the introspection order and defines the column order of
/// generated INSERT statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableColumns {
    columns: IndexMap<String, ColumnDescriptor>,
}

impl TableColumns {
    pub fn new(columns: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Semantic type of `name`, if the column exists.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.get(name).map(ColumnDescriptor::column_type)
    }

    /// Quote `value` for `column`. All builders quote through here.
    pub fn quote(&self, value: &Value, column: Option<&str>) -> Quoted {
        quote(value, column.and_then(|c| self.column_type(c)))
    }
}

impl FromIterator<ColumnDescriptor> for TableColumns {
    fn from_iter<I: IntoIterator<Item = ColumnDescriptor>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Lazily populated column metadata for the active table.
///
/// The cache holds a single table. It is filled on first access and must be
/// invalidated when the active table changes. Not synchronized: the owner
/// guarantees single-writer access.
#[derive(Debug, Default)]
pub struct SchemaCache {
    table: Option<String>,
    columns: TableColumns,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether columns are cached for `table`.
    pub fn is_loaded_for(&self, table: &str) -> bool {
        self.table.as_deref() == Some(table)
    }

    /// Cached columns, if any.
    pub fn cached(&self) -> Option<&TableColumns> {
        self.table.as_ref().map(|_| &self.columns)
    }

    /// Drop cached columns; the next `load` introspects again.
    pub fn invalidate(&mut self) {
        if let Some(table) = self.table.take() {
            tracing::trace!(target: "liteorm.schema", %table, "column cache invalidated");
        }
        self.columns = TableColumns::default();
    }

    /// Return the columns of `table`, introspecting through `client` on a miss.
    ///
    /// With no table selected the result is empty and nothing is cached. An empty
    /// introspection result is returned but not cached. The database is
    /// whatever `client` is connected to; a server error for a missing database
    /// is returned as is.
    pub async fn load<C: GenericClient>(
        &mut self,
        client: &C,
        table: Option<&str>,
    ) -> OrmResult<&TableColumns> {
        let Some(table) = table else {
            self.invalidate();
            return Ok(&self.columns);
        };
        if self.is_loaded_for(table) {
            return Ok(&self.columns);
        }

        self.invalidate();
        let columns = TableColumns::new(client.describe_columns(table).await?);
        tracing::debug!(
            target: "liteorm.schema",
            table,
            columns = columns.len(),
            "loaded column metadata"
        );
        if !columns.is_empty() {
            self.table = Some(table.to_string());
        }
        self.columns = columns;
        Ok(&self.columns)
    }
}

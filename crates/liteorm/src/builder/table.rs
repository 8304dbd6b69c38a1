use super::delete::DeleteBuilder;
use super::insert::InsertBuilder;
use super::select::{CountBuilder, FindBuilder};
use super::update::{IncrementBuilder, UpdateBuilder};
use crate::condition::Condition;
use crate::options::QueryOptions;
use crate::record::{Record, Records};
use crate::schema::TableColumns;
use crate::value::Value;

/// The table a statement targets: its name, primary key and cached columns.
///
/// # Example
///
/// ```rust
/// use liteorm::builder::{SqlBuilder, TableRef};
/// use liteorm::{ColumnDescriptor, TableColumns};
///
/// let columns = TableColumns::new([
///     ColumnDescriptor::new("id", "int(11)").auto_increment(),
///     ColumnDescriptor::new("title", "varchar(255)"),
/// ]);
/// let posts = TableRef::new("posts", "id", &columns);
///
/// let sql = posts.find(3, ()).to_sql().unwrap();
/// assert_eq!(sql, "SELECT * FROM `posts` WHERE `id` = 3;");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TableRef<'a> {
    pub name: &'a str,
    pub primary_key: &'a str,
    pub columns: &'a TableColumns,
}

impl<'a> TableRef<'a> {
    pub fn new(name: &'a str, primary_key: &'a str, columns: &'a TableColumns) -> Self {
        Self {
            name,
            primary_key,
            columns,
        }
    }

    pub fn find(
        self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> FindBuilder<'a> {
        FindBuilder::new(self, condition.into(), options.into())
    }

    pub fn count(
        self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> CountBuilder<'a> {
        CountBuilder::new(self, condition.into(), options.into())
    }

    pub fn insert(self, records: impl Into<Records>) -> InsertBuilder<'a> {
        InsertBuilder::new(self, records.into())
    }

    pub fn update(
        self,
        condition: impl Into<Condition>,
        record: impl Into<Record>,
        options: impl Into<QueryOptions>,
    ) -> UpdateBuilder<'a> {
        UpdateBuilder::new(self, condition.into(), record.into(), options.into())
    }

    pub fn increment(
        self,
        condition: impl Into<Condition>,
        column: impl Into<String>,
        by: impl Into<Value>,
        options: impl Into<QueryOptions>,
    ) -> IncrementBuilder<'a> {
        IncrementBuilder::new(
            self,
            condition.into(),
            column.into(),
            by.into(),
            options.into(),
        )
    }

    pub fn delete(
        self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> DeleteBuilder<'a> {
        DeleteBuilder::new(self, condition.into(), options.into())
    }

    /// Back-quoted table name.
    pub(crate) fn quoted_name(&self) -> String {
        crate::ident::quote_ident(self.name)
    }
}

//! Generic client trait: the boundary between statement building and the
//! connection layer.

use crate::error::{OrmError, OrmResult};
use crate::ident::quote_ident;
use crate::row::Row;
use crate::schema::ColumnDescriptor;
use std::sync::Arc;

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affected {
    /// Number of affected rows.
    pub rows: u64,
    /// Identity generated by an INSERT, when the server reports one.
    pub last_insert_id: Option<u64>,
}

/// What a single `execute` call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    Rows(Vec<Row>),
    Affected(Affected),
}

impl ExecResult {
    /// Rows of a result set; empty for row-less statements.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            ExecResult::Rows(rows) => rows,
            ExecResult::Affected(_) => Vec::new(),
        }
    }

    /// Affected-row summary; a result set counts its rows.
    pub fn affected(&self) -> Affected {
        match self {
            ExecResult::Rows(rows) => Affected {
                rows: rows.len() as u64,
                last_insert_id: None,
            },
            ExecResult::Affected(affected) => *affected,
        }
    }
}

/// A database handle able to run SQL text.
///
/// Anything that can execute a statement and describe a table can back a
/// [`Session`](crate::Session): a single connection, a pooled one, or a test
/// double.
pub trait GenericClient: Send + Sync {
    /// Execute a complete SQL statement.
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send;

    /// Describe the columns of `table` in definition order.
    ///
    /// The default implementation runs ``SHOW COLUMNS FROM `table`;`` through
    /// [`GenericClient::execute`] and reads the `Field`, `Type`, `Null` and
    /// `Extra` columns.
    fn describe_columns(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = OrmResult<Vec<ColumnDescriptor>>> + Send {
        let sql = format!("SHOW COLUMNS FROM {};", quote_ident(table));
        async move {
            let rows = self.execute(&sql).await?.into_rows();
            rows.iter().map(column_from_show_row).collect()
        }
    }
}

fn column_from_show_row(row: &Row) -> OrmResult<ColumnDescriptor> {
    let name = row
        .get_str("Field")
        .ok_or_else(|| OrmError::decode("Field", "missing column name in SHOW COLUMNS row"))?;
    Ok(ColumnDescriptor {
        name,
        declared_type: row.get_str("Type").unwrap_or_default(),
        nullable: row
            .get_str("Null")
            .is_some_and(|n| n.eq_ignore_ascii_case("YES")),
        auto_increment: row
            .get_str("Extra")
            .is_some_and(|e| e.to_ascii_lowercase().contains("auto_increment")),
    })
}

impl<C: GenericClient> GenericClient for &C {
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute(sql)
    }

    fn describe_columns(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = OrmResult<Vec<ColumnDescriptor>>> + Send {
        (**self).describe_columns(table)
    }
}

impl<C: GenericClient> GenericClient for Arc<C> {
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute(sql)
    }

    fn describe_columns(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = OrmResult<Vec<ColumnDescriptor>>> + Send {
        (**self).describe_columns(table)
    }
}

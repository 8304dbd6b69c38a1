use super::table::TableRef;
use super::traits::{SqlBuilder, Statement};
use super::reject;
use crate::error::OrmResult;
use crate::ident::write_ident;
use crate::record::Records;
use crate::schema::ColumnDescriptor;

/// INSERT builder.
///
/// The column list is the full schema column list, in introspection order. Per
/// row and column the value is the caller's (if present and not `NULL`), else
/// `NULL` for auto-increment and nullable columns, else `''`.
#[derive(Debug, Clone)]
pub struct InsertBuilder<'a> {
    table: TableRef<'a>,
    records: Records,
}

impl<'a> InsertBuilder<'a> {
    pub fn new(table: TableRef<'a>, records: Records) -> Self {
        Self { table, records }
    }

    /// Number of VALUES tuples the statement will carry.
    pub fn row_count(&self) -> usize {
        self.records.0.len()
    }
}

impl SqlBuilder for InsertBuilder<'_> {
    fn build(&self) -> OrmResult<Statement> {
        if self.records.is_empty() {
            return Err(reject(self.table.name, "INSERT", "no input rows"));
        }
        let columns = self.table.columns;
        if columns.is_empty() {
            return Err(reject(self.table.name, "INSERT", "no column metadata"));
        }

        let mut sql = format!("INSERT INTO {} (", self.table.quoted_name());
        for (i, name) in columns.names().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            write_ident(&mut sql, name);
        }
        sql.push_str(") VALUES ");

        for (r, record) in self.records.iter().enumerate() {
            if r > 0 {
                sql.push(',');
            }
            sql.push('(');
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    sql.push(',');
                }
                match record.supplied(&column.name) {
                    Some(value) => {
                        sql.push_str(&columns.quote(value, Some(&column.name)).to_string())
                    }
                    None => sql.push_str(default_literal(column)),
                }
            }
            sql.push(')');
        }
        sql.push(';');
        Ok(Statement::new(sql))
    }
}

fn default_literal(column: &ColumnDescriptor) -> &'static str {
    if column.auto_increment || column.nullable {
        "NULL"
    } else {
        "''"
    }
}

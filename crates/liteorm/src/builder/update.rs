use super::table::TableRef;
use super::traits::{SqlBuilder, Statement};
use super::{push_clause, reject};
use crate::condition::Condition;
use crate::error::OrmResult;
use crate::ident::{quote_ident, write_ident};
use crate::options::QueryOptions;
use crate::record::Record;
use crate::schema::ColumnType;
use crate::value::Value;

/// UPDATE builder.
///
/// `UPDATE `t` SET `a` = v, `b` = w WHERE ...[ LIMIT n];`
///
/// Refuses to build without a WHERE clause. Only record keys that name a schema
/// column other than the primary key are assigned; a `NULL` value becomes
/// `NULL` on nullable columns and `''` otherwise. Of map options only `limit`
/// (and `operator`, for the condition) is used; raw options are appended as
/// given.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<'a> {
    table: TableRef<'a>,
    condition: Condition,
    record: Record,
    options: QueryOptions,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(
        table: TableRef<'a>,
        condition: Condition,
        record: Record,
        options: QueryOptions,
    ) -> Self {
        Self {
            table,
            condition,
            record,
            options,
        }
    }
}

impl SqlBuilder for UpdateBuilder<'_> {
    fn build(&self) -> OrmResult<Statement> {
        let where_clause = self
            .condition
            .compile(self.options.condition_operator(), &self.table);
        if where_clause.is_empty() {
            return Err(reject(self.table.name, "UPDATE", "refusing to update without a condition"));
        }

        let columns = self.table.columns;
        let mut assignments = Vec::new();
        for column in columns.iter() {
            if column.name == self.table.primary_key {
                continue;
            }
            let Some(value) = self.record.get(&column.name) else {
                continue;
            };
            let mut assignment = String::new();
            write_ident(&mut assignment, &column.name);
            assignment.push_str(" = ");
            match value {
                Value::Null if column.nullable => assignment.push_str("NULL"),
                Value::Null => assignment.push_str("''"),
                value => {
                    assignment.push_str(&columns.quote(value, Some(&column.name)).to_string())
                }
            }
            assignments.push(assignment);
        }
        if assignments.is_empty() {
            return Err(reject(self.table.name, "UPDATE", "no assignable columns in input"));
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.table.quoted_name(),
            assignments.join(", ")
        );
        push_clause(&mut sql, &where_clause);
        sql.push_str(&self.options.update_tail());
        sql.push(';');
        Ok(Statement::new(sql))
    }
}

/// Increment builder.
///
/// `UPDATE `t` SET `c` = `c` + n [WHERE ...][ LIMIT n];`
///
/// The column must exist and be integer-typed. `n` is taken from the amount when
/// it is an integer literal (negative amounts decrement) and is `1` otherwise.
#[derive(Debug, Clone)]
pub struct IncrementBuilder<'a> {
    table: TableRef<'a>,
    condition: Condition,
    column: String,
    by: Value,
    options: QueryOptions,
}

impl<'a> IncrementBuilder<'a> {
    pub fn new(
        table: TableRef<'a>,
        condition: Condition,
        column: String,
        by: Value,
        options: QueryOptions,
    ) -> Self {
        Self {
            table,
            condition,
            column,
            by,
            options,
        }
    }

    /// The amount actually added.
    pub fn amount(&self) -> i64 {
        match &self.by {
            Value::Int(n) => *n,
            Value::UInt(n) => i64::try_from(*n).unwrap_or(1),
            Value::Text(s) => s.trim().parse().unwrap_or(1),
            _ => 1,
        }
    }
}

impl SqlBuilder for IncrementBuilder<'_> {
    fn build(&self) -> OrmResult<Statement> {
        match self.table.columns.column_type(&self.column) {
            Some(ColumnType::Integer) => {}
            Some(_) => {
                return Err(reject(self.table.name, "INCREMENT", "column is not integer-typed"));
            }
            None => return Err(reject(self.table.name, "INCREMENT", "unknown column")),
        }

        let column = quote_ident(&self.column);
        let mut sql = format!(
            "UPDATE {} SET {column} = {column} + {}",
            self.table.quoted_name(),
            self.amount()
        );
        push_clause(
            &mut sql,
            &self
                .condition
                .compile(self.options.condition_operator(), &self.table),
        );
        sql.push_str(&self.options.update_tail());
        sql.push(';');
        Ok(Statement::new(sql))
    }
}

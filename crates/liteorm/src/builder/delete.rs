use super::table::TableRef;
use super::traits::{SqlBuilder, Statement};
use super::push_clause;
use crate::condition::Condition;
use crate::error::OrmResult;
use crate::options::QueryOptions;

/// DELETE builder.
///
/// `DELETE FROM `t` [WHERE ...]<options>;`
///
/// An empty condition is allowed here; the session decides whether a
/// whole-table delete is intended (`delete_all`) or bounded by a default limit.
#[derive(Debug, Clone)]
pub struct DeleteBuilder<'a> {
    table: TableRef<'a>,
    condition: Condition,
    options: QueryOptions,
}

impl<'a> DeleteBuilder<'a> {
    pub fn new(table: TableRef<'a>, condition: Condition, options: QueryOptions) -> Self {
        Self {
            table,
            condition,
            options,
        }
    }
}

impl SqlBuilder for DeleteBuilder<'_> {
    fn build(&self) -> OrmResult<Statement> {
        let mut sql = format!("DELETE FROM {}", self.table.quoted_name());
        push_clause(
            &mut sql,
            &self
                .condition
                .compile(self.options.condition_operator(), &self.table),
        );
        sql.push_str(&self.options.compile());
        sql.push(';');
        Ok(Statement::new(sql))
    }
}

use super::table::TableRef;
use super::traits::{SqlBuilder, Statement};
use super::push_clause;
use crate::condition::Condition;
use crate::error::OrmResult;
use crate::options::QueryOptions;

/// SELECT builder.
///
/// `SELECT <select|*> FROM `t` [<joins>] [WHERE ...]<options>;`
#[derive(Debug, Clone)]
pub struct FindBuilder<'a> {
    table: TableRef<'a>,
    condition: Condition,
    options: QueryOptions,
}

impl<'a> FindBuilder<'a> {
    pub fn new(table: TableRef<'a>, condition: Condition, options: QueryOptions) -> Self {
        Self {
            table,
            condition,
            options,
        }
    }
}

impl SqlBuilder for FindBuilder<'_> {
    fn build(&self) -> OrmResult<Statement> {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.options.projection(),
            self.table.quoted_name()
        );
        write_tail(&mut sql, &self.table, &self.condition, &self.options);
        Ok(Statement::new(sql))
    }
}

/// COUNT builder.
///
/// `SELECT COUNT(*)[, <select>] FROM `t` [<joins>] [WHERE ...]<options>;`
///
/// With a `group` option each result row is `(count, group value)`.
#[derive(Debug, Clone)]
pub struct CountBuilder<'a> {
    table: TableRef<'a>,
    condition: Condition,
    options: QueryOptions,
}

impl<'a> CountBuilder<'a> {
    pub fn new(table: TableRef<'a>, condition: Condition, options: QueryOptions) -> Self {
        Self {
            table,
            condition,
            options,
        }
    }
}

impl SqlBuilder for CountBuilder<'_> {
    fn build(&self) -> OrmResult<Statement> {
        let mut sql = String::from("SELECT COUNT(*)");
        if let Some(extra) = self.options.extra_projection() {
            sql.push_str(", ");
            sql.push_str(extra);
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.table.quoted_name());
        write_tail(&mut sql, &self.table, &self.condition, &self.options);
        Ok(Statement::new(sql))
    }
}

/// `[ <joins>][ WHERE ...]<options>;`
fn write_tail(sql: &mut String, table: &TableRef<'_>, condition: &Condition, options: &QueryOptions) {
    if let Some(joins) = options.join_clause() {
        push_clause(sql, joins);
    }
    push_clause(sql, &condition.compile(options.condition_operator(), table));
    sql.push_str(&options.compile());
    sql.push(';');
}

use crate::error::OrmResult;
use crate::monitor::QueryType;
use std::fmt;

/// A complete SQL statement ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    query_type: QueryType,
}

impl Statement {
    pub fn new(sql: String) -> Self {
        let query_type = QueryType::from_sql(&sql);
        Self { sql, query_type }
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl AsRef<str> for Statement {
    fn as_ref(&self) -> &str {
        &self.sql
    }
}

/// Base trait for SQL builders.
pub trait SqlBuilder {
    /// Build the statement, or reject the input.
    fn build(&self) -> OrmResult<Statement>;

    /// Debug helper.
    fn to_sql(&self) -> OrmResult<String> {
        self.build().map(Statement::into_sql)
    }
}

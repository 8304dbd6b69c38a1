use super::types::{QueryResult, QueryType};
use std::time::Duration;

/// One executed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedQuery {
    pub sql: String,
    pub query_type: QueryType,
    pub duration: Duration,
    pub result: QueryResult,
}

/// In-memory record of executed statements, in execution order.
///
/// Disabled by default; a disabled log drops everything recorded into it.
#[derive(Debug, Clone, Default)]
pub struct QueryLog {
    enabled: bool,
    entries: Vec<LoggedQuery>,
}

impl QueryLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn recording on or off. Existing entries are kept.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn record(&mut self, sql: &str, duration: Duration, result: QueryResult) {
        if !self.enabled {
            return;
        }
        self.entries.push(LoggedQuery {
            sql: sql.to_string(),
            query_type: QueryType::from_sql(sql),
            duration,
            result,
        });
    }

    pub fn entries(&self) -> &[LoggedQuery] {
        &self.entries
    }

    /// SQL text of every entry.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.sql.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return all entries.
    pub fn take(&mut self) -> Vec<LoggedQuery> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

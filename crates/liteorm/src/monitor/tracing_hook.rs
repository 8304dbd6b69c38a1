use super::truncate_sql_bytes;
use super::types::{QueryResult, QueryType};
use std::time::Duration;
use tracing::Level;

/// A `tracing`-based hook that reports each statement after it ran.
///
/// Successful statements are emitted at the configured level (default `DEBUG`)
/// and failures always at `WARN`, both under target `liteorm.sql`.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Tracing event level for successful statements.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    /// Create a new hook with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Emit one event for a finished statement.
    pub fn after_query(&self, sql: &str, duration: Duration, result: &QueryResult) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let query_type = QueryType::from_sql(sql).as_str();
        let sql = self.truncate_sql(sql);
        let elapsed_ms = duration.as_secs_f64() * 1000.0;
        match result {
            QueryResult::Error(error) => tracing::warn!(
                target: "liteorm.sql",
                query_type,
                elapsed_ms,
                sql = %sql,
                error = %error,
                "statement failed"
            ),
            ok => emit_at_level!(
                self.level,
                target: "liteorm.sql",
                query_type,
                elapsed_ms,
                sql = %sql,
                result = %ok,
                "statement executed"
            ),
        }
    }
}

//! Table-bound execution facade.
//!
//! A [`Session`] owns a client, the active database and table, and the column
//! cache for that table. Every operation builds one statement and executes it
//! with a single call into the client.
//!
//! Sessions are not synchronized. Methods that touch the cache or the log take
//! `&mut self`; share a session across tasks only behind the host's own lock.

use crate::builder::{SqlBuilder, Statement, TableRef};
use crate::client::{Affected, ExecResult, GenericClient};
use crate::condition::Condition;
use crate::config::Settings;
use crate::error::{OrmError, OrmResult};
use crate::ident::{quote_ident, validate_name};
use crate::monitor::{QueryLog, QueryResult, TracingSqlHook};
use crate::options::QueryOptions;
use crate::record::{Record, Records};
use crate::row::{FromValue, Row};
use crate::schema::{ColumnType, SchemaCache, TableColumns};
use crate::value::Value;
use indexmap::IndexMap;
use std::time::Instant;

/// Primary key column used unless configured otherwise.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A single-table session over a [`GenericClient`].
///
/// # Example
///
/// ```rust,ignore
/// let mut posts = Session::new(client).with_table("posts");
///
/// posts.insert([("title", "hello world"), ("author", "John Doe")]).await?;
/// let row = posts.find(3, ()).await?;
/// let recent = posts
///     .find_all([("author", "John Smith")], QueryOptions::new().order("id DESC").limit(15))
///     .await?;
/// ```
pub struct Session<C> {
    client: C,
    database: Option<String>,
    table: Option<String>,
    primary_key: String,
    schema: SchemaCache,
    log: QueryLog,
    hook: TracingSqlHook,
}

impl<C: GenericClient> Session<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            database: None,
            table: None,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            schema: SchemaCache::new(),
            log: QueryLog::default(),
            hook: TracingSqlHook::default(),
        }
    }

    /// Session configured from [`Settings`]: table, primary key and query log.
    ///
    /// The database is not switched here; the client is expected to be connected
    /// to it already (see [`Settings::to_url`]).
    pub fn from_settings(client: C, settings: &Settings) -> Self {
        let mut session = Self::new(client).with_query_log(settings.logging);
        session.database = settings.database.clone();
        if let Some(table) = &settings.table {
            session = session.with_table(table.clone());
        }
        if let Some(pk) = &settings.primary_key {
            session = session.with_primary_key(pk.clone());
        }
        session
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self.schema.invalidate();
        self
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Enable or disable the in-memory query log.
    pub fn with_query_log(mut self, enabled: bool) -> Self {
        self.log.set_enabled(enabled);
        self
    }

    pub fn with_sql_hook(mut self, hook: TracingSqlHook) -> Self {
        self.hook = hook;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    // ==================== Server & database ====================

    /// Make `table` the active table. The column cache is dropped only when
    /// the table actually changes.
    pub fn select_table(&mut self, table: &str) -> OrmResult<()> {
        let table = validate_name(table)?;
        if self.table.as_deref() != Some(table) {
            tracing::debug!(target: "liteorm.schema", table, "table selected");
            self.table = Some(table.to_string());
            self.schema.invalidate();
        }
        Ok(())
    }

    /// Switch database with `USE`. Returns `false` when it was already active.
    pub async fn select_db(&mut self, database: &str) -> OrmResult<bool> {
        let database = validate_name(database)?;
        if self.database.as_deref() == Some(database) {
            return Ok(false);
        }
        let sql = format!("USE {};", quote_ident(database));
        self.run(&sql).await?;
        self.database = Some(database.to_string());
        self.schema.invalidate();
        Ok(true)
    }

    // ==================== Schema ====================

    /// Columns of the active table, introspected on first use.
    pub async fn columns(&mut self) -> OrmResult<&TableColumns> {
        self.schema.load(&self.client, self.table.as_deref()).await
    }

    /// Drop the cached columns and introspect again.
    pub async fn refresh_columns(&mut self) -> OrmResult<&TableColumns> {
        self.schema.invalidate();
        self.columns().await
    }

    /// Semantic type of `column`, `None` when the table has no such column.
    pub async fn column_type(&mut self, column: &str) -> OrmResult<Option<ColumnType>> {
        Ok(self.columns().await?.column_type(column))
    }

    // ==================== Data manipulation ====================

    /// First row matching `condition`. Adds `LIMIT 1` unless a limit is given.
    pub async fn find(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Option<Row>> {
        let options = options.into().with_default("limit", 1);
        let condition = condition.into();
        let statement = self
            .prepare(|t| t.find(condition, options).build())
            .await?;
        Ok(self.execute(&statement).await?.into_rows().into_iter().next())
    }

    /// Like [`find`](Self::find), failing with `NotFound` when nothing matches.
    pub async fn find_one(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Row> {
        self.find(condition, options)
            .await?
            .ok_or_else(|| OrmError::not_found("no row matches the condition"))
    }

    /// All rows matching `condition`.
    pub async fn find_all(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Vec<Row>> {
        let condition = condition.into();
        let options = options.into();
        let statement = self
            .prepare(|t| t.find(condition, options).build())
            .await?;
        Ok(self.execute(&statement).await?.into_rows())
    }

    /// All matching rows keyed by the text of column `index`.
    ///
    /// A repeated key is stored as `key_1`, `key_2`, ... (first free suffix). Rows
    /// without a usable `index` value get the next free positional key.
    pub async fn find_all_indexed(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
        index: &str,
    ) -> OrmResult<IndexMap<String, Row>> {
        let rows = self.find_all(condition, options).await?;
        Ok(index_rows(rows, index))
    }

    /// Up to `limit` rows in random order.
    pub async fn random(
        &mut self,
        limit: Option<u64>,
        condition: impl Into<Condition>,
    ) -> OrmResult<Vec<Row>> {
        let mut options = QueryOptions::new();
        if let Some(limit) = limit {
            options = options.limit(limit);
        }
        self.find_all(condition, options.set("order_by", "RAND()"))
            .await
    }

    /// Number of rows matching `condition`.
    pub async fn count(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<u64> {
        let condition = condition.into();
        let options = options.into();
        let statement = self
            .prepare(|t| t.count(condition, options).build())
            .await?;
        let rows = self.execute(&statement).await?.into_rows();
        match rows.first().and_then(Row::first) {
            Some(value) => u64::from_value(value).map_err(|msg| OrmError::decode("COUNT(*)", msg)),
            None => Ok(0),
        }
    }

    /// Row counts per value of the `group` option, in result order.
    ///
    /// The grouped expression is selected next to `COUNT(*)` unless the options
    /// already carry a `select`.
    pub async fn count_grouped(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Vec<(Value, u64)>> {
        let options = options.into();
        let Some(group) = options
            .get("group")
            .or_else(|| options.get("group_by"))
            .map(str::to_string)
        else {
            return Err(OrmError::rejected("count_grouped needs a `group` option"));
        };
        let options = options.with_default("select", group);
        let condition = condition.into();
        let statement = self
            .prepare(|t| t.count(condition, options).build())
            .await?;
        let rows = self.execute(&statement).await?.into_rows();

        let mut counts = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut values = row.iter().map(|(_, v)| v);
            let count = values
                .next()
                .map(u64::from_value)
                .transpose()
                .map_err(|msg| OrmError::decode("COUNT(*)", msg))?
                .unwrap_or(0);
            let key = values.next().cloned().unwrap_or(Value::Null);
            counts.push((key, count));
        }
        Ok(counts)
    }

    /// Insert one or more records.
    pub async fn insert(&mut self, records: impl Into<Records>) -> OrmResult<Affected> {
        let records = records.into();
        let statement = self.prepare(|t| t.insert(records).build()).await?;
        Ok(self.execute(&statement).await?.affected())
    }

    /// Update the first row matching `condition`. Adds `LIMIT 1` unless a
    /// limit is given.
    pub async fn update(
        &mut self,
        condition: impl Into<Condition>,
        record: impl Into<Record>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Affected> {
        let options = options.into().with_default("limit", 1);
        self.update_all(condition, record, options).await
    }

    /// Update every row matching `condition`. A condition is required.
    pub async fn update_all(
        &mut self,
        condition: impl Into<Condition>,
        record: impl Into<Record>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Affected> {
        let condition = condition.into();
        let record = record.into();
        let options = options.into();
        let statement = self
            .prepare(|t| t.update(condition, record, options).build())
            .await?;
        Ok(self.execute(&statement).await?.affected())
    }

    /// Add `by` to an integer column of the matching rows.
    pub async fn increment(
        &mut self,
        condition: impl Into<Condition>,
        column: &str,
        by: impl Into<Value>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Affected> {
        let condition = condition.into();
        let by = by.into();
        let options = options.into();
        let statement = self
            .prepare(|t| t.increment(condition, column, by, options).build())
            .await?;
        Ok(self.execute(&statement).await?.affected())
    }

    /// Delete the first row matching `condition`. Adds `LIMIT 1` unless a
    /// limit is given.
    pub async fn delete(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Affected> {
        let options = options.into().with_default("limit", 1);
        self.delete_all(condition, options).await
    }

    /// Delete every row matching `condition`; with no condition, every row.
    pub async fn delete_all(
        &mut self,
        condition: impl Into<Condition>,
        options: impl Into<QueryOptions>,
    ) -> OrmResult<Affected> {
        let condition = condition.into();
        let options = options.into();
        let statement = self
            .prepare(|t| t.delete(condition, options).build())
            .await?;
        Ok(self.execute(&statement).await?.affected())
    }

    // ==================== Advanced ====================

    /// Execute arbitrary SQL. Logged like every other statement.
    pub async fn query(&mut self, sql: &str) -> OrmResult<ExecResult> {
        if sql.trim().is_empty() {
            return Err(OrmError::rejected("empty SQL statement"));
        }
        self.run(sql).await
    }

    /// `OPTIMIZE [NO_WRITE_TO_BINLOG] TABLE` on the active table.
    pub async fn optimize(&mut self, no_write_to_binlog: bool) -> OrmResult<ExecResult> {
        let table = quote_ident(self.require_table()?);
        let binlog = if no_write_to_binlog {
            "NO_WRITE_TO_BINLOG "
        } else {
            ""
        };
        self.run(&format!("OPTIMIZE {binlog}TABLE {table};")).await
    }

    /// `TRUNCATE TABLE` on the active table. Removes every row; nothing is
    /// sent unless `are_you_sure` is `true`.
    pub async fn truncate(&mut self, are_you_sure: bool) -> OrmResult<Option<Affected>> {
        if !are_you_sure {
            return Ok(None);
        }
        let table = quote_ident(self.require_table()?);
        let result = self.run(&format!("TRUNCATE TABLE {table};")).await?;
        Ok(Some(result.affected()))
    }

    /// Executed statements, when the query log is enabled.
    pub fn query_log(&self) -> &QueryLog {
        &self.log
    }

    /// Drain the query log.
    pub fn take_query_log(&mut self) -> Vec<String> {
        self.log.take().into_iter().map(|e| e.sql).collect()
    }

    // ==================== Internals ====================

    fn require_table(&self) -> OrmResult<&str> {
        self.table
            .as_deref()
            .ok_or_else(|| OrmError::rejected("no table selected"))
    }

    /// Load the column cache and run `build` against the active table.
    async fn prepare<F>(&mut self, build: F) -> OrmResult<Statement>
    where
        F: FnOnce(TableRef<'_>) -> OrmResult<Statement>,
    {
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| OrmError::rejected("no table selected"))?;
        let columns = self.schema.load(&self.client, Some(table)).await?;
        build(TableRef::new(table, &self.primary_key, columns))
    }

    async fn execute(&mut self, statement: &Statement) -> OrmResult<ExecResult> {
        self.run(statement.as_str()).await
    }

    async fn run(&mut self, sql: &str) -> OrmResult<ExecResult> {
        let start = Instant::now();
        let result = self.client.execute(sql).await;
        let duration = start.elapsed();
        let outcome = QueryResult::from_exec(result.as_ref());
        self.hook.after_query(sql, duration, &outcome);
        self.log.record(sql, duration, outcome);
        result
    }
}

fn index_rows(rows: Vec<Row>, index: &str) -> IndexMap<String, Row> {
    let mut out: IndexMap<String, Row> = IndexMap::with_capacity(rows.len());
    let mut next_position: u64 = 0;
    for row in rows {
        let key = match row.get_str(index) {
            Some(key) if !out.contains_key(&key) => key,
            Some(key) => {
                let mut i = 1;
                while out.contains_key(&format!("{key}_{i}")) {
                    i += 1;
                }
                format!("{key}_{i}")
            }
            None => {
                while out.contains_key(&next_position.to_string()) {
                    next_position = next_position.checked_add(1).unwrap_or(0);
                }
                next_position.to_string()
            }
        };
        if let Ok(n) = key.parse::<u64>() {
            next_position = next_position.max(n.saturating_add(1));
        }
        out.insert(key, row);
    }
    out
}

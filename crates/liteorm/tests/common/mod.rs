#![allow(dead_code)]

use liteorm::{Affected, ExecResult, GenericClient, OrmError, OrmResult, Row, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory client that records every statement and answers from canned data.
///
/// `SHOW COLUMNS FROM `<table>`;` is answered from the registered column rows;
/// any other statement pops the next queued result, defaulting to one affected
/// row.
#[derive(Default)]
pub struct RecordingClient {
    tables: HashMap<String, Vec<Row>>,
    queued: Mutex<VecDeque<OrmResult<ExecResult>>>,
    executed: Mutex<Vec<String>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// `posts (id int auto_increment, title varchar, author varchar)`.
    pub fn with_posts() -> Self {
        Self::new().with_table(
            "posts",
            &[
                ("id", "int(11)", "NO", "auto_increment"),
                ("title", "varchar(255)", "NO", ""),
                ("author", "varchar(255)", "NO", ""),
            ],
        )
    }

    /// Register `SHOW COLUMNS` output: `(Field, Type, Null, Extra)` per column.
    pub fn with_table(mut self, name: &str, columns: &[(&str, &str, &str, &str)]) -> Self {
        let rows: Vec<Row> = columns
            .iter()
            .map(|(field, ty, null, extra)| {
                [
                    ("Field", Value::from(*field)),
                    ("Type", Value::from(*ty)),
                    ("Null", Value::from(*null)),
                    ("Key", Value::from("")),
                    ("Default", Value::Null),
                    ("Extra", Value::from(*extra)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        self.tables.insert(name.to_string(), rows);
        self
    }

    pub fn push_rows(&self, rows: Vec<Row>) {
        self.push(Ok(ExecResult::Rows(rows)));
    }

    pub fn push_affected(&self, rows: u64, last_insert_id: Option<u64>) {
        self.push(Ok(ExecResult::Affected(Affected {
            rows,
            last_insert_id,
        })));
    }

    pub fn push_error(&self, message: &str) {
        self.push(Err(OrmError::Query(message.to_string())));
    }

    fn push(&self, result: OrmResult<ExecResult>) {
        self.queued.lock().unwrap().push_back(result);
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.executed.lock().unwrap().last().cloned()
    }

    pub fn count_matching(&self, prefix: &str) -> usize {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .filter(|sql| sql.starts_with(prefix))
            .count()
    }

    fn answer(&self, sql: &str) -> OrmResult<ExecResult> {
        self.executed.lock().unwrap().push(sql.to_string());
        if let Some(rest) = sql.strip_prefix("SHOW COLUMNS FROM `") {
            let table = rest.trim_end_matches("`;");
            return Ok(ExecResult::Rows(
                self.tables.get(table).cloned().unwrap_or_default(),
            ));
        }
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ExecResult::Affected(Affected {
                rows: 1,
                last_insert_id: None,
            })))
    }
}

impl GenericClient for RecordingClient {
    fn execute(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        let result = self.answer(sql);
        async move { result }
    }
}

pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
}

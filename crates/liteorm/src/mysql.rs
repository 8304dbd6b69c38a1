//! MySQL client backed by `mysql_async`.
//!
//! [`MySqlClient`] runs statements over the text protocol on one connection;
//! [`ConnectionRegistry`] shares pools between sessions that use the same
//! credentials.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ConnectionRegistry::new();
//! let settings = Settings::from_env()?;
//! let client = registry.connect(&settings).await?;
//! let mut posts = Session::from_settings(client, &settings);
//! ```

use crate::client::{Affected, ExecResult, GenericClient};
use crate::config::Settings;
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, Pool};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A single MySQL connection usable as a [`GenericClient`].
///
/// The connection sits behind an async mutex so that `execute` can take
/// `&self`; statements on one client run one at a time.
#[derive(Debug)]
pub struct MySqlClient {
    conn: Mutex<Conn>,
}

impl MySqlClient {
    pub fn new(conn: Conn) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Connect directly from a `mysql://` URL.
    pub async fn connect(url: &str) -> OrmResult<Self> {
        let opts = Opts::from_url(url).map_err(|e| OrmError::Connection(e.to_string()))?;
        let conn = Conn::new(opts).await?;
        Ok(Self::new(conn))
    }

    /// Check out a connection from `pool`.
    pub async fn from_pool(pool: &Pool) -> OrmResult<Self> {
        Ok(Self::new(pool.get_conn().await?))
    }

    /// Return the connection (to its pool, if it came from one).
    pub async fn disconnect(self) -> OrmResult<()> {
        self.conn.into_inner().disconnect().await?;
        Ok(())
    }
}

impl From<Conn> for MySqlClient {
    fn from(conn: Conn) -> Self {
        Self::new(conn)
    }
}

impl GenericClient for MySqlClient {
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        async move {
            let mut conn = self.conn.lock().await;
            let mut result = conn.query_iter(sql).await?;

            let has_columns = result.columns().is_some_and(|c| !c.is_empty());
            if !has_columns {
                let affected = Affected {
                    rows: result.affected_rows(),
                    last_insert_id: result.last_insert_id().filter(|id| *id != 0),
                };
                result.drop_result().await?;
                return Ok(ExecResult::Affected(affected));
            }

            let raw: Vec<mysql_async::Row> = result.collect().await?;
            result.drop_result().await?;
            Ok(ExecResult::Rows(raw.iter().map(convert_row).collect()))
        }
    }
}

fn convert_row(row: &mysql_async::Row) -> Row {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = row.as_ref(i).map_or(Value::Null, convert_value);
            (column.name_str().into_owned(), value)
        })
        .collect()
}

fn convert_value(value: &mysql_async::Value) -> Value {
    use mysql_async::Value as My;
    match value {
        My::NULL => Value::Null,
        My::Bytes(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        My::Int(n) => Value::Int(*n),
        My::UInt(n) => Value::UInt(*n),
        My::Float(f) => Value::Float(f64::from(*f)),
        My::Double(f) => Value::Float(*f),
        My::Date(y, m, d, 0, 0, 0, 0) => Value::Text(format!("{y:04}-{m:02}-{d:02}")),
        My::Date(y, m, d, h, i, s, 0) => {
            Value::Text(format!("{y:04}-{m:02}-{d:02} {h:02}:{i:02}:{s:02}"))
        }
        My::Date(y, m, d, h, i, s, us) => Value::Text(format!(
            "{y:04}-{m:02}-{d:02} {h:02}:{i:02}:{s:02}.{us:06}"
        )),
        My::Time(neg, days, h, i, s, us) => {
            let sign = if *neg { "-" } else { "" };
            let hours = u32::from(*h) + days * 24;
            if *us == 0 {
                Value::Text(format!("{sign}{hours:02}:{i:02}:{s:02}"))
            } else {
                Value::Text(format!("{sign}{hours:02}:{i:02}:{s:02}.{us:06}"))
            }
        }
    }
}

/// Pools keyed by [`Settings::connection_id`].
///
/// Sessions created from settings with the same credentials and host share one
/// pool. The registry is an ordinary value owned by the application.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    pools: HashMap<String, Pool>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool for `settings`, created on first use.
    pub fn pool(&mut self, settings: &Settings) -> OrmResult<Pool> {
        let id = settings.connection_id();
        if let Some(pool) = self.pools.get(&id) {
            return Ok(pool.clone());
        }
        let opts = Opts::from_url(&settings.to_url()?)
            .map_err(|e| OrmError::Connection(e.to_string()))?;
        let pool = Pool::new(opts);
        tracing::debug!(
            target: "liteorm.sql",
            host = settings.host.as_deref().unwrap_or_default(),
            persistent = settings.persistent,
            "created connection pool"
        );
        self.pools.insert(id, pool.clone());
        Ok(pool)
    }

    /// A client on a connection from the shared pool for `settings`.
    pub async fn connect(&mut self, settings: &Settings) -> OrmResult<MySqlClient> {
        let pool = self.pool(settings)?;
        MySqlClient::from_pool(&pool).await
    }

    pub fn contains(&self, settings: &Settings) -> bool {
        self.pools.contains_key(&settings.connection_id())
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Disconnect every pool.
    pub async fn disconnect_all(&mut self) -> OrmResult<()> {
        for (_, pool) in self.pools.drain() {
            pool.disconnect().await?;
        }
        Ok(())
    }
}

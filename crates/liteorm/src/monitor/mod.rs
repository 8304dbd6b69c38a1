//! Statement logging for SQL execution.
//!
//! Every statement a [`Session`](crate::Session) runs is announced through
//! [`TracingSqlHook`] under target `liteorm.sql` and, when the session's log is
//! enabled, recorded in a [`QueryLog`] together with its outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut session = Session::new(client).with_table("posts").with_query_log(true);
//! session.find(3, ()).await?;
//! for entry in session.query_log().entries() {
//!     println!("[{:?}] {} - {}", entry.duration, entry.sql, entry.result);
//! }
//! ```

mod log;
mod tracing_hook;
mod types;


pub use log::{LoggedQuery, QueryLog};
pub use tracing_hook::TracingSqlHook;
pub use types::{QueryResult, QueryType};

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

//! # liteorm
//!
//! A small schema-aware SQL builder and execution facade for one MySQL table at
//! a time.
//!
//! ## Features
//!
//! - **Loose input, explicit shapes**: conditions are an id, a column → value
//!   map or a raw fragment ([`Condition`]); options are a key → value map or a
//!   raw trailing clause ([`QueryOptions`])
//! - **Schema-aware quoting**: column metadata is introspected once per table
//!   and drives literal quoting and INSERT column order
//! - **Safe defaults**: UPDATE requires a condition; `find`, `update` and
//!   `delete` touch one row unless told otherwise
//! - **Pluggable client**: anything implementing [`GenericClient`] can execute
//!   statements; the `mysql` feature provides one on `mysql_async`
//! - **Statement logging**: `tracing` events under `liteorm.sql` plus an
//!   optional in-memory [`QueryLog`]
//!
//! ## Example
//!
//! ```ignore
//! use liteorm::prelude::*;
//!
//! let mut posts = Session::new(client).with_table("posts");
//!
//! // INSERT INTO `posts` (`id`,`title`,`author`) VALUES (NULL,'hello world','John Doe');
//! posts.insert([("title", "hello world"), ("author", "John Doe")]).await?;
//!
//! // UPDATE `posts` SET `author` = 'John Smith' WHERE `id` = 4 LIMIT 1;
//! posts.update(4, [("author", "John Smith")], ()).await?;
//!
//! // SELECT * FROM `posts` WHERE `author` = 'John Smith' ORDER BY `id` DESC LIMIT 15;
//! let rows = posts
//!     .find_all([("author", "John Smith")], QueryOptions::new().order("id DESC").limit(15))
//!     .await?;
//! ```
//!
//! Values are embedded as escaped literals, not bound as parameters. Raw
//! condition fragments and raw option strings are trusted input.

pub mod builder;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod ident;
pub mod monitor;
pub mod options;
pub mod prelude;
pub mod record;
pub mod row;
pub mod schema;
pub mod session;
pub mod value;

#[cfg(feature = "mysql")]
pub mod mysql;

pub use builder::{SqlBuilder, Statement, TableRef};
pub use client::{Affected, ExecResult, GenericClient};
pub use condition::Condition;
pub use config::Settings;
pub use error::{OrmError, OrmResult};
pub use monitor::{LoggedQuery, QueryLog, QueryResult, QueryType, TracingSqlHook};
pub use options::QueryOptions;
pub use record::{Record, Records};
pub use row::{FromValue, Row};
pub use schema::{ColumnDescriptor, ColumnType, SchemaCache, TableColumns};
pub use session::Session;
pub use value::{Quoted, Value, quote};

#[cfg(feature = "mysql")]
pub use mysql::{ConnectionRegistry, MySqlClient};

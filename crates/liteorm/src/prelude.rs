//! Convenient imports for typical `liteorm` usage.
//!
//! ```ignore
//! use liteorm::prelude::*;
//! ```

pub use crate::{
    Affected, Condition, GenericClient, OrmError, OrmResult, QueryOptions, Record, Row, Session,
    Settings, Value,
};

#[cfg(feature = "mysql")]
pub use crate::{ConnectionRegistry, MySqlClient};

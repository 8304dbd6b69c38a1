//! Statement builders.
//!
//! Each builder assembles one complete, `;`-terminated MySQL statement from a
//! [`TableRef`], a [`Condition`](crate::Condition) and
//! [`QueryOptions`](crate::QueryOptions). Building is pure: no I/O happens here,
//! and a builder either returns a whole statement or an
//! [`OrmError::InputRejected`](crate::OrmError::InputRejected).
//!
//! ## Guardrails
//!
//! - INSERT requires at least one input row and a known column set.
//! - UPDATE requires a WHERE clause and at least one assignable column.
//! - Increment requires an integer-typed column.
//!
//! Values are embedded as literals through [`TableColumns::quote`](crate::TableColumns::quote).

pub mod delete;
pub mod insert;
pub mod select;
pub mod table;
pub mod traits;
pub mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::{CountBuilder, FindBuilder};
pub use table::TableRef;
pub use traits::{SqlBuilder, Statement};
pub use update::{IncrementBuilder, UpdateBuilder};

use crate::error::OrmError;

/// Build an [`OrmError::InputRejected`] and note it under `liteorm.sql`.
pub(crate) fn reject(table: &str, statement: &'static str, reason: &str) -> OrmError {
    tracing::debug!(target: "liteorm.sql", table, statement, reason, "statement rejected");
    OrmError::rejected(format!("{statement} on `{table}`: {reason}"))
}

/// Join non-empty clause fragments, each preceded by one space.
pub(crate) fn push_clause(out: &mut String, clause: &str) {
    if !clause.is_empty() {
        if !clause.starts_with(' ') {
            out.push(' ');
        }
        out.push_str(clause);
    }
}

#[cfg(test)]
mod tests;

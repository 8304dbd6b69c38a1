//! MySQL identifier handling.
//!
//! Table, column and database names are always emitted back-quoted. A name is
//! taken verbatim; an embedded back-quote is escaped by doubling it.
//!
//! # Example
//! ```ignore
//! use liteorm::ident::quote_ident;
//!
//! assert_eq!(quote_ident("posts"), "`posts`");
//! assert_eq!(quote_ident("we`ird"), "`we``ird`");
//! ```

use crate::error::{OrmError, OrmResult};

/// Back-quote a single identifier.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_ident(&mut out, name);
    out
}

pub(crate) fn write_ident(out: &mut String, name: &str) {
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
}

/// Check a table or database name before it becomes session state.
///
/// MySQL accepts almost anything inside back-quotes; only empty names, NUL and
/// trailing spaces are refused by the server, so they are refused here too.
pub fn validate_name(name: &str) -> OrmResult<&str> {
    if name.is_empty() {
        return Err(OrmError::rejected("identifier cannot be empty"));
    }
    if name.contains('\0') {
        return Err(OrmError::rejected("identifier cannot contain NUL character"));
    }
    if name.ends_with(' ') {
        return Err(OrmError::rejected(format!(
            "identifier cannot end with a space: {name:?}"
        )));
    }
    Ok(name)
}

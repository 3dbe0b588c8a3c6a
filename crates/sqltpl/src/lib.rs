//! # sqltpl
//!
//! Render SQL query templates into literal SQL strings.
//!
//! ## Features
//!
//! - **Typed placeholders**: `?d` integer, `?f` float, `?a` list/mapping, `?#` identifiers,
//!   bare `?` picks a format from the argument's own kind
//! - **Positional binding**: the Nth placeholder takes the Nth argument; missing ones are null
//! - **Conditional blocks**: `{...}` is kept, or dropped entirely when bound to [`skip()`]
//! - **No nesting**: nested or unbalanced braces are rejected
//!
//! ## Example
//!
//! ```ignore
//! use sqltpl::{args, build_query, skip};
//!
//! let sql = build_query(
//!     "SELECT ?# FROM users WHERE user_id = ?d {AND block = ?d}",
//!     &args![["name", "email"], 2, skip()],
//! )?;
//! assert_eq!(sql, "SELECT `name`, `email` FROM users WHERE user_id = 2 ");
//! ```
//!
//! Text values are wrapped in single quotes **without** escaping embedded quotes.
//! Only pass trusted text to generic and `?a` placeholders.

pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod template;
pub mod value;

mod trace;

pub use builder::{BuildQuery, QueryBuilder};
pub use config::QueryBuilderConfig;
pub use error::{TplError, TplResult};
pub use format::{TypeTag, format_value};
pub use template::{Placeholder, SKIP_SENTINEL, Template};
pub use value::Arg;

/// Render `template` with positional `args`.
///
/// Fails with [`TplError::EmptyTemplate`] on an empty template and with
/// [`TplError::NestedCondition`] when a brace is left after conditional
/// blocks are resolved. Missing arguments bind null.
pub fn build_query(template: &str, args: &[Arg]) -> TplResult<String> {
    QueryBuilder::new().build_query(template, args)
}

/// The argument that drops the conditional block it is bound in.
pub fn skip() -> Arg {
    Arg::Int(SKIP_SENTINEL)
}

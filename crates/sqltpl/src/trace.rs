//! Render events, emitted through `tracing` when the `tracing` feature is on.
//!
//! Events use the `sqltpl.render` target:
//! - `DEBUG` for every successful render, with the rendered SQL
//! - `WARN` when a render is rejected

use crate::error::TplError;
use crate::template::Resolved;
use crate::value::Arg;

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) struct RenderEvent<'a> {
    pub placeholder_count: usize,
    pub args: &'a [Arg],
    pub max_sql_length: Option<usize>,
    pub template: &'a str,
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
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

impl RenderEvent<'_> {
    /// Argument kinds in binding order, e.g. `int,text,list`.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    fn arg_kinds(&self) -> String {
        let mut out = String::with_capacity(self.args.len() * 5);
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(arg.kind());
        }
        out
    }

    #[cfg(feature = "tracing")]
    fn truncate(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn rendered(&self, resolved: &Resolved) {
        tracing::debug!(
            target: "sqltpl.render",
            placeholder_count = self.placeholder_count,
            arg_count = self.args.len(),
            arg_kinds = %self.arg_kinds(),
            blocks_kept = resolved.kept,
            blocks_dropped = resolved.dropped,
            sql = %self.truncate(&resolved.sql),
        );
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn rejected(&self, err: &TplError) {
        tracing::warn!(
            target: "sqltpl.render",
            placeholder_count = self.placeholder_count,
            arg_count = self.args.len(),
            arg_kinds = %self.arg_kinds(),
            template = %self.truncate(self.template),
            error = %err,
        );
    }

    #[cfg(not(feature = "tracing"))]
    pub(crate) fn rendered(&self, _resolved: &Resolved) {}

    #[cfg(not(feature = "tracing"))]
    pub(crate) fn rejected(&self, _err: &TplError) {}
}

//! Template parsing and rendering.
//!
//! A [`Template`] is scanned once and can be rendered any number of times:
//!
//! ```ignore
//! use sqltpl::{args, skip, Template};
//!
//! let t = Template::parse("SELECT * FROM users WHERE name = ? {AND block = ?d}")?;
//! assert_eq!(t.placeholder_count(), 2);
//!
//! let sql = t.render(&args!["Jack", skip()])?;
//! assert_eq!(sql, "SELECT * FROM users WHERE name = 'Jack' ");
//! ```
//!
//! Rendering runs in three steps: placeholders are substituted in document
//! order, conditional blocks are resolved on the substituted text, and any
//! brace that is left over is rejected.

mod blocks;
mod expand;
mod scan;


pub use blocks::SKIP_SENTINEL;
pub(crate) use expand::Arity;
pub use scan::Placeholder;

pub(crate) use blocks::Resolved;

use crate::error::{TplError, TplResult};
use crate::value::Arg;
use scan::Token;
use std::str::FromStr;

/// A scanned query template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
    placeholder_count: usize,
}

impl Template {
    /// Scan `source` for placeholders.
    ///
    /// Fails only on an empty template; block structure is checked at render
    /// time because substituted values take part in it.
    pub fn parse(source: impl Into<String>) -> TplResult<Self> {
        let source = source.into();
        if source.is_empty() {
            return Err(TplError::EmptyTemplate);
        }

        let tokens = scan::scan(&source);
        let placeholder_count = tokens
            .iter()
            .filter(|t| matches!(t, Token::Placeholder(_)))
            .count();

        Ok(Self {
            source,
            tokens,
            placeholder_count,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholders in document order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Placeholder(p) => Some(p),
            Token::Literal(_) => None,
        })
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholder_count
    }

    /// Render with positional `args`. Missing arguments bind null.
    pub fn render(&self, args: &[Arg]) -> TplResult<String> {
        self.render_with(args, Arity::Lenient).map(|r| r.sql)
    }

    pub(crate) fn render_with(&self, args: &[Arg], arity: Arity) -> TplResult<Resolved> {
        let expanded = if self.placeholder_count == 0 {
            self.source.clone()
        } else {
            expand::expand(&self.source, &self.tokens, args, arity)?
        };
        blocks::resolve(&expanded)
    }
}

impl FromStr for Template {
    type Err = TplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

use super::scan::Token;
use crate::error::{TplError, TplResult};
use crate::format::write_value;
use crate::value::Arg;

static NULL: Arg = Arg::Null;

/// What to do when a placeholder has no matching argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Arity {
    /// Bind null.
    #[default]
    Lenient,
    /// Fail with [`TplError::MissingArgument`].
    Strict,
}

/// Substitute every placeholder with its formatted argument.
///
/// Single pass over the scanned tokens: substituted text is never rescanned.
pub(crate) fn expand(
    source: &str,
    tokens: &[Token],
    args: &[Arg],
    arity: Arity,
) -> TplResult<String> {
    let mut out = String::with_capacity(source.len() + args.len() * 8);

    for token in tokens {
        match token {
            Token::Literal(range) => out.push_str(&source[range.clone()]),
            Token::Placeholder(p) => {
                let value = match (args.get(p.index), arity) {
                    (Some(value), _) => value,
                    (None, Arity::Lenient) => &NULL,
                    (None, Arity::Strict) => {
                        return Err(TplError::MissingArgument { index: p.index });
                    }
                };
                write_value(p.tag, value, &mut out);
            }
        }
    }

    Ok(out)
}

//! Conditional `{...}` blocks.
//!
//! Blocks are resolved on the placeholder-expanded text. A block whose content
//! contains `=`, optional whitespace, then the skip sentinel digit is dropped
//! together with its braces; any other block is replaced by its content.
//! Blocks do not nest: the first brace that does not fit a flat `{ }` pair is
//! reported as [`TplError::NestedCondition`].

use crate::error::{TplError, TplResult};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Marker value callers bind to drop a conditional block.
pub const SKIP_SENTINEL: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockToken {
    Literal(Range<usize>),
    Open(usize),
    Close(usize),
}

/// Output of block resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub sql: String,
    pub kept: usize,
    pub dropped: usize,
}

fn tokenize(text: &str) -> Vec<BlockToken> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;

    for (pos, c) in text.char_indices() {
        let token = match c {
            '{' => BlockToken::Open(pos),
            '}' => BlockToken::Close(pos),
            _ => continue,
        };
        if literal_start < pos {
            tokens.push(BlockToken::Literal(literal_start..pos));
        }
        tokens.push(token);
        literal_start = pos + 1;
    }

    if literal_start < text.len() {
        tokens.push(BlockToken::Literal(literal_start..text.len()));
    }
    tokens
}

/// Returns `true` if rendered block content asks for the block to be dropped.
///
/// Matches anywhere in the content, so an unrelated `col = 0` inside the same
/// block also drops it.
pub(crate) fn is_skipped(content: &str) -> bool {
    static SKIP_RE: OnceLock<Regex> = OnceLock::new();
    SKIP_RE
        .get_or_init(|| {
            Regex::new(&format!(r"=(?-u:\s)*{SKIP_SENTINEL}"))
                .expect("invalid built-in skip regex")
        })
        .is_match(content)
}

/// Resolve every conditional block in `text`.
pub(crate) fn resolve(text: &str) -> TplResult<Resolved> {
    if !text.contains(['{', '}']) {
        return Ok(Resolved {
            sql: text.to_string(),
            kept: 0,
            dropped: 0,
        });
    }

    let mut out = String::with_capacity(text.len());
    let mut open: Option<usize> = None;
    let mut kept = 0;
    let mut dropped = 0;

    for token in tokenize(text) {
        match (token, open) {
            (BlockToken::Literal(range), None) => out.push_str(&text[range]),
            // Inside a block; the content is sliced out at the closing brace.
            (BlockToken::Literal(_), Some(_)) => {}
            (BlockToken::Open(pos), None) => open = Some(pos),
            (BlockToken::Open(pos), Some(_)) => return Err(TplError::nested(pos)),
            (BlockToken::Close(pos), None) => return Err(TplError::nested(pos)),
            (BlockToken::Close(pos), Some(start)) => {
                let content = &text[start + 1..pos];
                if is_skipped(content) {
                    dropped += 1;
                } else {
                    out.push_str(content);
                    kept += 1;
                }
                open = None;
            }
        }
    }

    if let Some(start) = open {
        return Err(TplError::nested(start));
    }

    Ok(Resolved {
        sql: out,
        kept,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_braces_passes_through() {
        let r = resolve("SELECT 1").unwrap();
        assert_eq!(r.sql, "SELECT 1");
        assert_eq!((r.kept, r.dropped), (0, 0));
    }

    #[test]
    fn keeps_and_drops_blocks_in_order() {
        let r = resolve("a {AND x = 1} b {AND y = 0} c").unwrap();
        assert_eq!(r.sql, "a AND x = 1 b  c");
        assert_eq!((r.kept, r.dropped), (1, 1));
    }

    #[test]
    fn empty_block_is_kept_as_nothing() {
        assert_eq!(resolve("a{}b").unwrap().sql, "ab");
    }

    #[test]
    fn skip_pattern_variants() {
        assert!(is_skipped("AND del = 0"));
        assert!(is_skipped("AND del=0"));
        assert!(is_skipped("AND del =\t\n0"));
        assert!(!is_skipped("AND del = 10"));
        assert!(!is_skipped("AND del = 1"));
        assert!(!is_skipped("AND del = '0'"));
        assert!(!is_skipped("AND del IN (0)"));
    }

    // Known sharp edge: any `= 0` inside the block drops it.
    #[test]
    fn skip_matches_unrelated_zero_assignment() {
        assert!(is_skipped("AND a = 5 AND b = 0"));
        assert!(is_skipped("AND price = 0.5"));
    }

    #[test]
    fn nested_block_reports_inner_open_brace() {
        assert_eq!(resolve("{a{b}c}"), Err(TplError::nested(2)));
    }

    #[test]
    fn stray_close_brace_is_rejected() {
        assert_eq!(resolve("a}b"), Err(TplError::nested(1)));
        assert_eq!(resolve("{a}}"), Err(TplError::nested(3)));
    }

    #[test]
    fn unclosed_block_reports_its_open_brace() {
        assert_eq!(resolve("x {a"), Err(TplError::nested(2)));
    }

    mod residual_brace {
        use crate::template::blocks::{is_skipped, resolve};
        use proptest::prelude::*;
        use regex::Regex;

        /// Replace every innermost `{...}` once, then reject if any brace is left over.
        fn reference(text: &str) -> Option<String> {
            let block = Regex::new(r"\{([^{}]*)\}").unwrap();
            let out = block
                .replace_all(text, |caps: &regex::Captures<'_>| {
                    let content = &caps[1];
                    if is_skipped(content) {
                        String::new()
                    } else {
                        content.to_string()
                    }
                })
                .into_owned();
            (!out.contains(['{', '}'])).then_some(out)
        }

        #[test]
        fn reference_agrees_on_known_inputs() {
            assert_eq!(reference("a{b}c").as_deref(), Some("abc"));
            assert_eq!(reference("a{= 0}c").as_deref(), Some("ac"));
            assert_eq!(reference("{a{b}c}"), None);
            assert_eq!(reference("}{"), None);
        }

        proptest! {
            #[test]
            fn resolve_accepts_what_residual_rule_accepts(text in "[a{} =01]{0,24}") {
                let ours = resolve(&text).ok().map(|r| r.sql);
                prop_assert_eq!(ours, reference(&text));
            }

            #[test]
            fn balanced_flat_blocks_always_resolve(
                parts in prop::collection::vec(("[a =01]{0,6}", "[a =01]{0,6}"), 0..6),
            ) {
                let text: String = parts
                    .iter()
                    .map(|(lit, block)| format!("{lit}{{{block}}}"))
                    .collect();
                let resolved = resolve(&text).unwrap();
                prop_assert_eq!(resolved.kept + resolved.dropped, parts.len());
                prop_assert_eq!(Some(resolved.sql), reference(&text));
            }
        }
    }
}

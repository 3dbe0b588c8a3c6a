use crate::format::TypeTag;
use std::ops::Range;

/// One placeholder occurrence in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// 0-based occurrence index; also the argument slot it binds.
    pub index: usize,
    pub tag: TypeTag,
    /// Byte offset of the `?`.
    pub start: usize,
    /// Byte offset just past the placeholder (after the tag char, if any).
    pub end: usize,
}

impl Placeholder {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(Range<usize>),
    Placeholder(Placeholder),
}

/// Split a template into literal runs and placeholders, left to right.
///
/// `?` followed by `d`, `f`, `a` or `#` is a typed placeholder spanning two
/// chars; any other `?` is a generic placeholder and the char after it stays
/// literal. Never fails.
pub(crate) fn scan(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = template.char_indices().peekable();
    let mut literal_start = 0;
    let mut index = 0;

    while let Some((pos, c)) = chars.next() {
        if c != '?' {
            continue;
        }

        if literal_start < pos {
            tokens.push(Token::Literal(literal_start..pos));
        }

        let tag = chars.peek().and_then(|&(_, next)| TypeTag::from_char(next));
        let end = match tag {
            Some(_) => {
                chars.next();
                pos + 2
            }
            None => pos + 1,
        };

        tokens.push(Token::Placeholder(Placeholder {
            index,
            tag: tag.unwrap_or(TypeTag::Generic),
            start: pos,
            end,
        }));
        index += 1;
        literal_start = end;
    }

    if literal_start < template.len() {
        tokens.push(Token::Literal(literal_start..template.len()));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(template: &str) -> Vec<Placeholder> {
        scan(template)
            .into_iter()
            .filter_map(|t| match t {
                Token::Placeholder(p) => Some(p),
                Token::Literal(_) => None,
            })
            .collect()
    }

    #[test]
    fn plain_text_is_one_literal() {
        assert_eq!(scan("SELECT 1"), vec![Token::Literal(0..8)]);
        assert!(scan("").is_empty());
    }

    #[test]
    fn typed_and_generic_in_order() {
        let found = placeholders("a = ?d AND b IN (?a) AND c = ? AND ?#");
        let tags: Vec<TypeTag> = found.iter().map(|p| p.tag).collect();
        assert_eq!(
            tags,
            vec![
                TypeTag::Integer,
                TypeTag::Array,
                TypeTag::Generic,
                TypeTag::Keys
            ]
        );
        let indexes: Vec<usize> = found.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn spans_cover_tag_char() {
        let found = placeholders("x=?f");
        assert_eq!(found[0].span(), 2..4);
    }

    #[test]
    fn adjacent_placeholders_scan_independently() {
        let found = placeholders("??d?");
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].tag, TypeTag::Generic);
        assert_eq!(found[0].span(), 0..1);
        assert_eq!(found[1].tag, TypeTag::Integer);
        assert_eq!(found[1].span(), 1..3);
        assert_eq!(found[2].span(), 3..4);
    }

    #[test]
    fn unknown_tag_char_stays_literal() {
        let tokens = scan("?x");
        assert_eq!(
            tokens,
            vec![
                Token::Placeholder(Placeholder {
                    index: 0,
                    tag: TypeTag::Generic,
                    start: 0,
                    end: 1,
                }),
                Token::Literal(1..2),
            ]
        );
    }

    #[test]
    fn uppercase_tag_is_not_a_tag() {
        assert_eq!(placeholders("?D")[0].tag, TypeTag::Generic);
    }

    #[test]
    fn only_one_tag_char_is_consumed() {
        let tokens = scan("?dd");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], Token::Literal(2..3));
    }

    #[test]
    fn multibyte_literals_keep_byte_offsets() {
        let found = placeholders("名前 = ?");
        assert_eq!(found[0].start, "名前 = ".len());
    }
}

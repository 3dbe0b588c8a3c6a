//! Type-directed rendering of arguments into SQL literal text.
//!
//! Each placeholder carries a [`TypeTag`] picked by the character after `?`:
//!
//! | Tag | Rendering |
//! |-----|-----------|
//! | `?d` | integer, unquoted |
//! | `?f` | float, unquoted |
//! | `?a` | list (`v1, v2`) or mapping (`` `k` = v ``) |
//! | `?#` | identifiers wrapped in backticks |
//! | `?`  | generic, picked by the argument's own kind |
//!
//! Text values are only wrapped in single quotes. Embedded quotes are **not**
//! escaped, so untrusted text must not reach a generic or `?a` placeholder.

use crate::value::Arg;

/// Formatting rule selected by a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `?d`
    Integer,
    /// `?f`
    Float,
    /// `?a`
    Array,
    /// `?#`
    Keys,
    /// Bare `?`
    Generic,
}

/// Recognized tag characters. Anything else after `?` is literal text.
const TYPE_TAGS: [(char, TypeTag); 4] = [
    ('d', TypeTag::Integer),
    ('f', TypeTag::Float),
    ('a', TypeTag::Array),
    ('#', TypeTag::Keys),
];

impl TypeTag {
    /// Look up the tag for the character following `?`.
    pub fn from_char(c: char) -> Option<Self> {
        TYPE_TAGS
            .iter()
            .find_map(|&(ch, tag)| (ch == c).then_some(tag))
    }

    /// The tag character, `None` for generic placeholders.
    pub fn as_char(self) -> Option<char> {
        TYPE_TAGS
            .iter()
            .find_map(|&(ch, tag)| (tag == self).then_some(ch))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Array => "array",
            Self::Keys => "keys",
            Self::Generic => "generic",
        }
    }
}

/// Render `value` according to `tag`.
pub fn format_value(tag: TypeTag, value: &Arg) -> String {
    let mut out = String::new();
    write_value(tag, value, &mut out);
    out
}

pub(crate) fn write_value(tag: TypeTag, value: &Arg, out: &mut String) {
    match tag {
        TypeTag::Integer => out.push_str(&to_int(value).to_string()),
        TypeTag::Float => write_float(to_float(value), out),
        TypeTag::Array => match value {
            Arg::List(items) => write_list(items, out),
            Arg::Map(pairs) => write_pairs(pairs, out),
            scalar => write_generic(scalar, out),
        },
        TypeTag::Keys => match value {
            Arg::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_quoted_ident(item, out);
                }
            }
            Arg::Map(pairs) => write_pairs(pairs, out),
            scalar => write_quoted_ident(scalar, out),
        },
        TypeTag::Generic => write_generic(value, out),
    }
}

fn write_generic(value: &Arg, out: &mut String) {
    match value {
        Arg::Null => out.push_str("NULL"),
        Arg::Bool(b) => out.push(if *b { '1' } else { '0' }),
        Arg::Int(i) => out.push_str(&i.to_string()),
        Arg::Float(f) => write_float(*f, out),
        // Empty text is indistinguishable from null here.
        Arg::Text(s) if s.is_empty() => out.push_str("NULL"),
        Arg::Text(s) => {
            out.push('\'');
            out.push_str(s);
            out.push('\'');
        }
        Arg::List(items) => write_list(items, out),
        Arg::Map(pairs) => write_pairs(pairs, out),
    }
}

fn write_list(items: &[Arg], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_generic(item, out);
    }
}

fn write_pairs(pairs: &[(String, Arg)], out: &mut String) {
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('`');
        out.push_str(key);
        out.push_str("` = ");
        write_generic(value, out);
    }
}

fn write_quoted_ident(value: &Arg, out: &mut String) {
    out.push('`');
    write_ident_text(value, out);
    out.push('`');
}

fn write_ident_text(value: &Arg, out: &mut String) {
    match value {
        Arg::Null => {}
        Arg::Bool(b) => out.push(if *b { '1' } else { '0' }),
        Arg::Int(i) => out.push_str(&i.to_string()),
        Arg::Float(f) => write_float(*f, out),
        Arg::Text(s) => out.push_str(s),
        Arg::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_ident_text(item, out);
            }
        }
        Arg::Map(pairs) => {
            for (i, (_, item)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_ident_text(item, out);
            }
        }
    }
}

fn write_float(f: f64, out: &mut String) {
    if f.is_nan() {
        out.push_str("NAN");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "INF" } else { "-INF" });
    } else {
        out.push_str(&f.to_string());
    }
}

/// Integer coercion used by `?d`.
/// Truncates toward zero; NaN and infinities become 0, finite overflow saturates.
fn float_to_int(f: f64) -> i64 {
    if f.is_finite() { f as i64 } else { 0 }
}

fn to_int(value: &Arg) -> i64 {
    match value {
        Arg::Null => 0,
        Arg::Bool(b) => i64::from(*b),
        Arg::Int(i) => *i,
        Arg::Float(f) => float_to_int(*f),
        Arg::Text(s) => match numeric_prefix(s) {
            Some((digits, true)) => digits.parse::<i64>().unwrap_or_else(|_| {
                if digits.starts_with('-') {
                    i64::MIN
                } else {
                    i64::MAX
                }
            }),
            Some((digits, false)) => digits.parse::<f64>().map_or(0, float_to_int),
            None => 0,
        },
        Arg::List(items) => i64::from(!items.is_empty()),
        Arg::Map(pairs) => i64::from(!pairs.is_empty()),
    }
}

/// Float coercion used by `?f`.
fn to_float(value: &Arg) -> f64 {
    match value {
        Arg::Float(f) => *f,
        Arg::Int(i) => *i as f64,
        Arg::Text(s) => numeric_prefix(s)
            .and_then(|(digits, _)| digits.parse::<f64>().ok())
            .unwrap_or(0.0),
        other => to_int(other) as f64,
    }
}

/// Find the leading numeric part of `s`.
///
/// Accepts leading ASCII whitespace, an optional sign, digits with an optional
/// fraction, and an optional exponent. Returns the matched slice (whitespace
/// excluded) and whether it is a plain integer.
fn numeric_prefix(s: &str) -> Option<(&str, bool)> {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut integral = true;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        let mut pos = end + 1;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        frac_digits = pos - end - 1;
        if int_digits + frac_digits > 0 {
            integral = false;
            end = pos;
        }
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut pos = end + 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_start = pos;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        if pos > exp_start {
            integral = false;
            end = pos;
        }
    }

    Some((&s[..end], integral))
}

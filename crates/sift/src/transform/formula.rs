//! Mini formula interpreter.
//!
//! Recognizes a fixed set of named functions with a single argument list —
//! no nesting, no composition, not a general expression language. Function
//! names match case-insensitively anywhere in the expression; the first
//! known name wins. Unrecognized or malformed formulas leave the carried
//! value unchanged.

use crate::record::parse_date;

use super::operations::DateStyle;

type Handler = fn(input: &str, args: &[String]) -> String;

/// Dispatch table, in match priority order.
static FUNCTIONS: &[(&str, Handler)] = &[
    ("CONCAT", concat),
    ("UPPER", upper),
    ("LOWER", lower),
    ("TRIM", trim),
    ("LENGTH", length),
    ("SUBSTRING", substring),
    ("REPLACE", replace),
    ("DATE_FORMAT", date_format),
];

/// Evaluate a formula expression against the carried cell value.
pub(crate) fn evaluate(expression: &str, input: &str) -> String {
    for (name, handler) in FUNCTIONS {
        if let Some(position) = find_ignore_ascii_case(expression, name) {
            return match extract_args(expression, position + name.len()) {
                Some(args) => handler(input, &args),
                None => input.to_string(),
            };
        }
    }
    input.to_string()
}

/// Byte offset of the first case-insensitive occurrence of an ASCII needle.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Parse the `(a, b, c)` argument list that must directly follow the
/// function name. Arguments are trimmed and quote-stripped.
fn extract_args(expression: &str, after_name: usize) -> Option<Vec<String>> {
    let rest = expression.get(after_name..)?.strip_prefix('(')?;
    let close = rest.find(')')?;
    let inner = &rest[..close];

    Some(
        inner
            .split(',')
            .map(|part| strip_quotes(part.trim()).to_string())
            .collect(),
    )
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// CONCAT joins its literal arguments and ignores the carried value.
fn concat(_input: &str, args: &[String]) -> String {
    args.concat()
}

fn upper(input: &str, _args: &[String]) -> String {
    input.to_uppercase()
}

fn lower(input: &str, _args: &[String]) -> String {
    input.to_lowercase()
}

fn trim(input: &str, _args: &[String]) -> String {
    input.trim().to_string()
}

fn length(input: &str, _args: &[String]) -> String {
    input.chars().count().to_string()
}

/// SUBSTRING(value, start, length) with a 1-based start.
fn substring(input: &str, args: &[String]) -> String {
    let (Some(start), Some(len)) = (
        args.get(1).and_then(|a| a.parse::<usize>().ok()),
        args.get(2).and_then(|a| a.parse::<usize>().ok()),
    ) else {
        return input.to_string();
    };

    if start == 0 {
        return input.to_string();
    }

    input.chars().skip(start - 1).take(len).collect()
}

/// REPLACE(value, search, replacement), literal.
fn replace(input: &str, args: &[String]) -> String {
    let (Some(search), Some(replacement)) = (args.get(1), args.get(2)) else {
        return input.to_string();
    };

    if search.is_empty() {
        return input.to_string();
    }

    input.replace(search.as_str(), replacement)
}

/// DATE_FORMAT(value, pattern) re-renders the carried value as a date.
fn date_format(input: &str, args: &[String]) -> String {
    let style = args
        .get(1)
        .map(|pattern| DateStyle::from_pattern(pattern))
        .unwrap_or_default();

    match parse_date(input) {
        Some(date) => style.render(date),
        None => input.to_string(),
    }
}

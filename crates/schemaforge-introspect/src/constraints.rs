//! Enumeration extraction from free-text CHECK clauses.
//!
//! Only a fixed set of grammars is recognized; anything else yields no
//! values. Supported shapes, tried in this order on every clause:
//!
//! 1. `col = ANY (ARRAY['a', 'b'])`
//! 2. `col IN ('a', 'b')`
//! 3. `col = 'a' OR col = 'b'`
//! 4. `col <@ ARRAY['a', 'b']`

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

const IDENT: &str = r#"(?P<col>"[^"]+"|`[^`]+`|\[[^\]]+\]|[A-Za-z_][\w$]*)"#;

static CAST: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)::\s*(?:character\s+varying|double\s+precision|bit\s+varying|time(?:stamp)?\s+with(?:out)?\s+time\s+zone|"?[A-Za-z_][\w.]*"?)(?:\s*\(\s*\d+(?:\s*,\s*\d+)?\s*\))?(?:\s*\[\s*\])*"#,
    )
    .ok()
});

static WRAPPED_IDENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(^|[^\w$])\(\s*("[^"]+"|`[^`]+`|\[[^\]]+\]|[A-Za-z_][\w$]*)\s*\)"#).ok()
});

static ANY_ARRAY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^{IDENT}\s*=\s*any\s*[(\s]*array\s*\[(?P<list>.*)\][)\s]*$"
    ))
    .ok()
});

static IN_LIST: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(r"(?is)^{IDENT}\s+in\s*\((?P<list>.*)\)$")).ok()
});

static EQUALITY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&format!(r"(?is)^{IDENT}\s*=\s*(?P<lit>.+)$")).ok());

static CONTAINED_IN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^{IDENT}\s*<@\s*[(\s]*array\s*\[(?P<list>.*)\][)\s]*$"
    ))
    .ok()
});

fn compiled(cell: &'static LazyLock<Option<Regex>>) -> Option<&'static Regex> {
    LazyLock::force(cell).as_ref()
}

/// Recognized CHECK grammars, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    AnyArray,
    InList,
    OrChain,
    ContainedIn,
}

impl Grammar {
    pub const ALL: [Grammar; 4] = [
        Grammar::AnyArray,
        Grammar::InList,
        Grammar::OrChain,
        Grammar::ContainedIn,
    ];

    fn extract(self, column: &str, clause: &str) -> Option<Vec<String>> {
        match self {
            Grammar::AnyArray => parse_list_grammar(&ANY_ARRAY, column, clause),
            Grammar::InList => parse_list_grammar(&IN_LIST, column, clause),
            Grammar::OrChain => parse_or_chain(column, clause),
            Grammar::ContainedIn => parse_list_grammar(&CONTAINED_IN, column, clause),
        }
    }
}

/// Extract the ordered enumeration values a set of CHECK clauses allows for `column`.
///
/// Values from every clause and every matching grammar are unioned,
/// de-duplicated by first appearance. Unrecognized clauses contribute nothing.
pub fn extract_enum<S: AsRef<str>>(column: &str, clauses: &[S]) -> Vec<String> {
    let target = normalize_identifier(column);
    let mut seen = HashSet::new();
    let mut values = Vec::new();

    for clause in clauses {
        let prepared = prepare_clause(clause.as_ref());
        for grammar in Grammar::ALL {
            let Some(found) = grammar.extract(&target, &prepared) else {
                continue;
            };
            for value in found {
                if seen.insert(value.clone()) {
                    values.push(value);
                }
            }
        }
    }

    values
}

/// Grammars that match `clause` for `column`, for diagnostics.
pub fn matching_grammars(column: &str, clause: &str) -> Vec<Grammar> {
    let target = normalize_identifier(column);
    let prepared = prepare_clause(clause);
    Grammar::ALL
        .into_iter()
        .filter(|grammar| grammar.extract(&target, &prepared).is_some())
        .collect()
}

fn parse_list_grammar(
    grammar: &'static LazyLock<Option<Regex>>,
    column: &str,
    clause: &str,
) -> Option<Vec<String>> {
    let caps = compiled(grammar)?.captures(clause)?;
    if normalize_identifier(&caps["col"]) != column {
        return None;
    }
    parse_literal_list(&caps["list"])
}

fn parse_or_chain(column: &str, clause: &str) -> Option<Vec<String>> {
    let regex = compiled(&EQUALITY)?;
    let mut values = Vec::new();

    for part in split_top_level(clause, Separator::Or) {
        let part = strip_outer_parens(part);
        let caps = regex.captures(part)?;
        if normalize_identifier(&caps["col"]) != column {
            return None;
        }
        values.push(parse_literal(&caps["lit"])?);
    }

    if values.is_empty() { None } else { Some(values) }
}

/// Strip the `CHECK` keyword, type casts and parenthesized identifiers, then
/// any balanced outer parentheses.
fn prepare_clause(clause: &str) -> String {
    let mut text = clause.trim();
    if text.get(..5).is_some_and(|head| head.eq_ignore_ascii_case("check")) {
        let rest = &text[5..];
        if rest.starts_with(|ch: char| ch.is_whitespace() || ch == '(') {
            text = rest.trim_start();
        }
    }

    let without_casts = map_unquoted(text, |segment| match compiled(&CAST) {
        Some(cast) => cast.replace_all(segment, "").into_owned(),
        None => segment.to_string(),
    });

    let unwrapped = map_unquoted(&without_casts, |segment| {
        let Some(wrapped) = compiled(&WRAPPED_IDENT) else {
            return segment.to_string();
        };
        let mut current = segment.to_string();
        loop {
            let next = wrapped.replace_all(&current, "$1$2").into_owned();
            if next == current {
                return current;
            }
            current = next;
        }
    });

    strip_outer_parens(&unwrapped).to_string()
}

/// Apply `transform` to every segment outside single-quoted literals.
fn map_unquoted(text: &str, transform: impl Fn(&str) -> String) -> String {
    let mut output = String::with_capacity(text.len());
    let mut segment = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\'' {
            segment.push(ch);
            continue;
        }

        output.push_str(&transform(&segment));
        segment.clear();
        output.push('\'');
        while let Some(inner) = chars.next() {
            output.push(inner);
            if inner == '\'' {
                if chars.peek() == Some(&'\'') {
                    if let Some(escaped) = chars.next() {
                        output.push(escaped);
                    }
                } else {
                    break;
                }
            }
        }
    }

    output.push_str(&transform(&segment));
    output
}

fn strip_outer_parens(text: &str) -> &str {
    let mut current = text.trim();
    while current.starts_with('(') && current.ends_with(')') && wraps_whole(current) {
        current = current[1..current.len() - 1].trim();
    }
    current
}

/// True when the first `(` is closed by the final `)`.
fn wraps_whole(text: &str) -> bool {
    let mut depth = 0_i32;
    let mut in_quote = false;
    let last = text.len() - 1;

    for (index, ch) in text.char_indices() {
        if ch == '\'' {
            in_quote = !in_quote;
            continue;
        }
        if in_quote {
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && index != last {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

#[derive(Clone, Copy)]
enum Separator {
    Comma,
    Or,
}

/// Split on a separator that sits outside quotes and parentheses.
fn split_top_level(text: &str, separator: Separator) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut in_quote = false;
    let mut start = 0;
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];
        if byte == b'\'' {
            in_quote = !in_quote;
        } else if !in_quote {
            match byte {
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                match separator {
                    Separator::Comma if byte == b',' => {
                        parts.push(&text[start..index]);
                        start = index + 1;
                    }
                    Separator::Or if is_or_keyword(bytes, index) => {
                        parts.push(&text[start..index]);
                        start = index + 2;
                        index += 2;
                        continue;
                    }
                    _ => {}
                }
            }
        }
        index += 1;
    }

    parts.push(&text[start..]);
    parts
}

fn is_or_keyword(bytes: &[u8], index: usize) -> bool {
    if index + 2 > bytes.len() || !bytes[index..index + 2].eq_ignore_ascii_case(b"or") {
        return false;
    }
    let before = index.checked_sub(1).map(|prev| bytes[prev]);
    let after = bytes.get(index + 2).copied();
    let is_boundary = |byte: Option<u8>| {
        byte.is_some_and(|byte| byte.is_ascii_whitespace() || byte == b'(' || byte == b')')
    };
    is_boundary(before) && is_boundary(after)
}

fn parse_literal_list(list: &str) -> Option<Vec<String>> {
    let list = strip_outer_parens(list);
    if list.is_empty() {
        return None;
    }
    split_top_level(list, Separator::Comma)
        .into_iter()
        .map(parse_literal)
        .collect()
}

/// Parse a single-quoted literal, unescaping doubled quotes.
///
/// Accepts the `N'...'` national prefix and MySQL charset introducers
/// (`_utf8mb4'...'`). Anything that is not exactly one string literal is
/// rejected.
fn parse_literal(item: &str) -> Option<String> {
    let mut text = strip_outer_parens(item);
    if let Some(rest) = text.strip_prefix(['N', 'n'])
        && rest.starts_with('\'')
    {
        text = rest;
    } else if text.starts_with('_')
        && let Some(quote) = text.find('\'')
        && text[1..quote]
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric())
    {
        text = &text[quote..];
    }

    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\'' && chars.next() != Some('\'') {
            return None;
        }
        value.push(ch);
    }
    Some(value)
}

/// Lowercase an identifier and strip quoting characters.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier
        .trim()
        .trim_matches(|ch| matches!(ch, '"' | '`' | '[' | ']'))
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_list() {
        assert_eq!(
            extract_enum("status", &["status IN ('a','b','c')"]),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn extracts_or_chain() {
        assert_eq!(
            extract_enum("role", &["role = 'x' OR role = 'y'"]),
            vec!["x", "y"]
        );
    }

    #[test]
    fn extracts_postgres_any_array_with_casts() {
        let clause = "CHECK (((status)::text = ANY ((ARRAY['active'::character varying, 'banned'::character varying])::text[])))";
        assert_eq!(extract_enum("status", &[clause]), vec!["active", "banned"]);
    }

    #[test]
    fn extracts_parenthesized_or_chain_with_casts() {
        let clause = "CHECK (((kind)::text = 'a'::text) OR ((kind)::text = 'b'::text))";
        assert_eq!(extract_enum("kind", &[clause]), vec!["a", "b"]);
    }

    #[test]
    fn extracts_containment() {
        assert_eq!(
            extract_enum("tags", &["tags <@ ARRAY['red'::text, 'blue'::text]"]),
            vec!["red", "blue"]
        );
    }

    #[test]
    fn matches_quoted_identifiers_case_insensitively() {
        assert_eq!(
            extract_enum("Status", &["(`status` in (_utf8mb4'on',_utf8mb4'off'))"]),
            vec!["on", "off"]
        );
        assert_eq!(
            extract_enum("status", &["([Status]=N'open' OR [Status]=N'closed')"]),
            vec!["open", "closed"]
        );
        assert_eq!(
            extract_enum("status", &[r#""STATUS" IN ('x')"#]),
            vec!["x"]
        );
    }

    #[test]
    fn unescapes_doubled_quotes_and_keeps_casts_inside_literals() {
        assert_eq!(
            extract_enum("label", &["label IN ('it''s', 'a::text')"]),
            vec!["it's", "a::text"]
        );
    }

    #[test]
    fn unions_and_deduplicates_across_clauses() {
        let clauses = [
            "status IN ('a', 'b')",
            "status = 'b' OR status = 'c'",
        ];
        assert_eq!(extract_enum("status", &clauses), vec!["a", "b", "c"]);
    }

    #[test]
    fn ignores_other_columns_and_unrecognized_grammar() {
        assert!(extract_enum("status", &["role IN ('a')"]).is_empty());
        assert!(extract_enum("price", &["price > 0"]).is_empty());
        assert!(extract_enum("status", &["status = 'a' OR role = 'b'"]).is_empty());
        assert!(extract_enum("status", &["status IN (1, 2)"]).is_empty());
        assert!(extract_enum("status", &["lower(status) IN ('a')"]).is_empty());
        assert!(extract_enum("status", &["status IN ('a') AND status <> 'b'"]).is_empty());
        assert!(extract_enum::<&str>("status", &[]).is_empty());
    }

    #[test]
    fn reports_matching_grammars() {
        assert_eq!(
            matching_grammars("status", "status = ANY (ARRAY['a'])"),
            vec![Grammar::AnyArray]
        );
        assert!(matching_grammars("status", "status > 1").is_empty());
    }
}

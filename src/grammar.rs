//! Shared clause grammar for filter and having expressions.
//!
//! A clause is `<subject>-<operation>` optionally followed by a bracketed,
//! comma separated value list: `region.id-in[US,CA]`, `revenue-gt[100]`.
//! Values are percent-decoded; a literal `,`, `[` or `]` inside a value must be
//! escaped (`%2C`, `%5B`, `%5D`). Whitespace around a value is trimmed before
//! decoding, so significant edge spaces are written `%20`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use std::sync::LazyLock;

/// Pattern for the part of a clause before the value list.
static CLAUSE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<subject>[^\-\[\],\s]+)-(?P<operation>[A-Za-z]+)$").unwrap()
});

/// Characters escaped when rendering a value back into clause form.
const VALUE_ESCAPES: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b',')
    .add(b';')
    .add(b'[')
    .add(b']')
    .add(b' ')
    .add(b'"');

/// A structural syntax error inside one clause.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct SyntaxError(pub String);

impl SyntaxError {
    fn new(reason: &str) -> Self {
        SyntaxError(reason.to_string())
    }
}

/// A clause split into its parts, before any name resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseParts<'a> {
    pub subject: &'a str,
    pub operation: &'a str,
    /// `None` when the clause has no brackets, `Some(vec![])` for `[]`.
    pub values: Option<Vec<String>>,
}

/// Split one clause into subject, operation and decoded values.
pub fn split_clause(clause: &str) -> Result<ClauseParts<'_>, SyntaxError> {
    let clause = clause.trim();
    if clause.is_empty() {
        return Err(SyntaxError::new("empty clause"));
    }

    let (head, values) = match clause.find('[') {
        Some(open) => {
            let body = &clause[open + 1..];
            let close = body
                .find(']')
                .ok_or_else(|| SyntaxError::new("missing closing bracket"))?;
            let inner = &body[..close];
            if inner.contains('[') {
                return Err(SyntaxError::new("nested opening bracket in value list"));
            }
            if close + 1 != body.len() {
                return Err(SyntaxError::new("unexpected text after closing bracket"));
            }
            (&clause[..open], Some(split_values(inner)?))
        }
        None => (clause, None),
    };

    if head.contains(']') {
        return Err(SyntaxError::new("closing bracket without opening bracket"));
    }

    let captures = CLAUSE_HEAD.captures(head).ok_or_else(|| {
        SyntaxError(format!(
            "expected '<name>-<operation>' before the value list, found '{}'",
            head
        ))
    })?;

    let subject = captures.name("subject").map(|m| m.as_str()).unwrap_or_default();
    let operation = captures.name("operation").map(|m| m.as_str()).unwrap_or_default();

    Ok(ClauseParts {
        subject,
        operation,
        values,
    })
}

fn split_values(inner: &str) -> Result<Vec<String>, SyntaxError> {
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(str::trim)
        .map(|raw| {
            if raw.is_empty() {
                return Err(SyntaxError::new("empty value in list (dangling comma)"));
            }
            check_escapes(raw)?;
            percent_decode_str(raw)
                .decode_utf8()
                .map(|decoded| decoded.into_owned())
                .map_err(|_| SyntaxError(format!("value '{}' is not valid UTF-8 once decoded", raw)))
        })
        .collect()
}

/// Every `%` must start a two hex digit escape.
fn check_escapes(raw: &str) -> Result<(), SyntaxError> {
    let bytes = raw.as_bytes();
    for (i, _) in raw.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(SyntaxError(format!("bad percent escape in value '{}'", raw)));
        }
    }
    Ok(())
}

/// Render a value so that [`split_clause`] decodes it back unchanged.
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, VALUE_ESCAPES).to_string()
}

/// Split a query into clauses on `delimiter`, ignoring delimiters inside
/// brackets. Surrounding whitespace is trimmed; a blank query has no clauses.
pub fn split_top_level(query: &str, delimiter: char) -> Vec<&str> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut clauses = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in query.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == delimiter && depth == 0 => {
                clauses.push(query[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    clauses.push(query[start..].trim());
    clauses
}

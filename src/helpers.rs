//! Lexical predicates and extractors shared by every translator.
//!
//! Nothing in here knows about block context: these are stateless string
//! helpers for a single (already comment-stripped) line.
//! - Comment splitting
//! - Matching delimiters
//! - Quote-aware, nesting-aware splitting
//! - Assignment operator detection
//! - Literal / identifier predicates
//! - Statement terminator synthesis

//===========================================================================
// QUOTE TRACKING
// Go string, rune and raw (backtick) literals, plus C++ raw strings `R"(...)"`
// once they have been converted.
//===========================================================================

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct QuoteTracker {
    quote: Option<char>,
    escaped: bool,
    prev: char,
}

impl QuoteTracker {
    /// Feed one character. Returns true when `c` is code, i.e. outside every
    /// literal and not itself a quote delimiter.
    pub(crate) fn step(&mut self, c: char) -> bool {
        let is_code = match self.quote {
            Some('R') => {
                if c == '"' && self.prev == ')' {
                    self.quote = None;
                }
                false
            }
            Some(q) => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' && q != '`' {
                    self.escaped = true;
                } else if c == q {
                    self.quote = None;
                }
                false
            }
            None => {
                if c == '"' && self.prev == 'R' {
                    self.quote = Some('R');
                    false
                } else if c == '"' || c == '\'' || c == '`' {
                    self.quote = Some(c);
                    false
                } else {
                    true
                }
            }
        };
        self.prev = c;
        is_code
    }

    pub(crate) fn in_literal(&self) -> bool {
        self.quote.is_some()
    }
}

//===========================================================================
// LINE SHAPE
//===========================================================================

/// Split a line into code and trailing `//` comment, ignoring `//` inside literals.
pub fn strip_inline_comment(line: &str) -> (String, Option<String>) {
    let bytes = line.as_bytes();
    let mut quotes = QuoteTracker::default();

    for (i, c) in line.char_indices() {
        if quotes.step(c) && c == '/' && bytes.get(i + 1) == Some(&b'/') {
            let code = line[..i].trim_end().to_string();
            let comment = line[i..].trim().to_string();
            return (code, Some(comment));
        }
    }

    (line.trim_end().to_string(), None)
}

/// `s` with the contents of every literal blanked out, so that searching for
/// operators or keywords never matches inside a string.
pub fn mask_literals(s: &str) -> String {
    let mut quotes = QuoteTracker::default();
    s.chars()
        .map(|c| if quotes.step(c) { c } else { ' ' })
        .collect()
}

/// Leading whitespace of a line, used to re-indent translated output.
pub fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

pub fn last_char(s: &str) -> Option<char> {
    s.chars().last()
}

pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(is_ident_char),
        _ => false,
    }
}

/// The blank identifier.
pub fn is_discard(s: &str) -> bool {
    s.trim() == "_"
}

//===========================================================================
// EXTRACTION
//===========================================================================

/// Byte index of the delimiter closing the one at `open`, skipping literals.
pub fn find_matching(s: &str, open: usize) -> Option<usize> {
    let open_char = s[open..].chars().next()?;
    let close_char = match open_char {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => return None,
    };

    let mut quotes = QuoteTracker::default();
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        if !quotes.step(c) {
            continue;
        }
        if c == open_char {
            depth += 1;
        } else if c == close_char {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(open + i);
            }
        }
    }
    None
}

/// Split on `sep` where it appears outside literals and outside (), [] and {}.
/// Parts are trimmed. Blank input yields no parts.
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    if s.trim().is_empty() {
        return parts;
    }

    let mut quotes = QuoteTracker::default();
    let mut depth = 0i32;
    let mut current = String::new();

    for c in s.chars() {
        if quotes.step(c) {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
            if c == sep && depth == 0 {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
        }
        current.push(c);
    }
    parts.push(current.trim().to_string());
    parts
}

/// First byte index of `needle` outside literals and nesting.
pub fn find_top_level(s: &str, needle: char) -> Option<usize> {
    let mut quotes = QuoteTracker::default();
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        if !quotes.step(c) {
            continue;
        }
        if c == needle && depth == 0 {
            return Some(i);
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

//===========================================================================
// ASSIGNMENT DETECTION
//===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignKind {
    /// `:=`
    Define,
    /// plain `=`
    Assign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentParts<'a> {
    pub lhs: &'a str,
    pub rhs: &'a str,
    pub kind: AssignKind,
}

/// Locate a top-level `=` or `:=`.
///
/// Comparisons (`==`, `!=`, `<=`, `>=`) are skipped. Compound assignments
/// (`+=`, `<<=` ...) return `None`: they pass through as plain statements.
pub fn split_assignment(s: &str) -> Option<AssignmentParts<'_>> {
    let bytes = s.as_bytes();
    let mut quotes = QuoteTracker::default();
    let mut depth = 0i32;

    for (i, c) in s.char_indices() {
        if !quotes.step(c) {
            continue;
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '=' if depth == 0 => {
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                let next = bytes.get(i + 1).copied().unwrap_or(b' ');
                if next == b'=' || matches!(prev, b'=' | b'!' | b'<' | b'>') {
                    continue;
                }
                if matches!(prev, b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^') {
                    return None;
                }
                if prev == b':' {
                    return Some(AssignmentParts {
                        lhs: s[..i - 1].trim(),
                        rhs: s[i + 1..].trim(),
                        kind: AssignKind::Define,
                    });
                }
                return Some(AssignmentParts {
                    lhs: s[..i].trim(),
                    rhs: s[i + 1..].trim(),
                    kind: AssignKind::Assign,
                });
            }
            _ => {}
        }
    }
    None
}

//===========================================================================
// LITERAL PREDICATES
//===========================================================================

/// Numeric literal classifier: Go integer (decimal, hex, octal, binary,
/// with `_` separators) or floating-point literal.
pub fn is_num(s: &str) -> bool {
    let s = s.trim().replace('_', "");
    let digits = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s.as_str());

    match digits.chars().next() {
        Some(c) if c.is_ascii_digit() => {}
        Some('.') if digits.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) => {}
        _ => return false,
    }

    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).is_ok();
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return i64::from_str_radix(bin, 2).is_ok();
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).is_ok();
    }
    digits.parse::<i64>().is_ok() || digits.parse::<f64>().is_ok()
}

/// True when `s` is exactly one string literal (`"…"`, `` `…` `` or `R"(…)"`).
pub fn is_string_literal(s: &str) -> bool {
    let s = s.trim();
    if s.len() < 2 || !(s.starts_with('"') || s.starts_with('`') || s.starts_with("R\"(")) {
        return false;
    }

    let mut quotes = QuoteTracker::default();
    let mut opened = false;
    for (i, c) in s.char_indices() {
        quotes.step(c);
        if quotes.in_literal() {
            opened = true;
        } else if opened {
            return i == s.len() - 1;
        }
    }
    false
}

//===========================================================================
// IDENTIFIER-BOUNDARY REPLACEMENT
//===========================================================================

fn boundary_ok(before: Option<char>, after: Option<char>, pattern: &str) -> bool {
    let starts_ok = before.map_or(true, |c| !is_ident_char(c) && c != '.' && c != ':');
    let ends_ok = !pattern.ends_with(is_ident_char) || after.map_or(true, |c| !is_ident_char(c));
    starts_ok && ends_ok
}

/// Replace `from` with `to` wherever `from` stands as a whole identifier
/// (or call head, when `from` ends with `(`).
pub fn replace_identifier(s: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    let mut prev: Option<char> = None;

    while let Some(pos) = rest.find(from) {
        let before = rest[..pos].chars().last().or(prev);
        let after = rest[pos + from.len()..].chars().next();
        out.push_str(&rest[..pos]);
        if boundary_ok(before, after, from) {
            out.push_str(to);
        } else {
            out.push_str(from);
        }
        prev = from.chars().last();
        rest = &rest[pos + from.len()..];
    }
    out.push_str(rest);
    out
}

/// Whether `symbol` occurs in `s` as a whole identifier.
pub fn contains_identifier(s: &str, symbol: &str) -> bool {
    let mut offset = 0;
    while let Some(pos) = s[offset..].find(symbol) {
        let start = offset + pos;
        let before = s[..start].chars().last();
        let after = s[start + symbol.len()..].chars().next();
        if boundary_ok(before, after, symbol) {
            return true;
        }
        offset = start + symbol.len();
    }
    false
}

//===========================================================================
// TERMINATORS
//===========================================================================

/// Does the line continue on the next one (binary operator at the end)?
pub fn ends_with_continuation_operator(trimmed: &str) -> bool {
    if trimmed.ends_with("++") || trimmed.ends_with("--") {
        return false;
    }
    trimmed.ends_with("&&")
        || trimmed.ends_with("||")
        || trimmed.ends_with(|c: char| "+-*/%|&^=".contains(c))
}

/// Does the trailing `}` match a `{` on the same line? Then it ends a
/// brace initializer or a lambda body, not an enclosing block.
fn closes_inline_brace(trimmed: &str) -> bool {
    let mut depth = 0usize;
    let mut inline = false;
    for c in mask_literals(trimmed).chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                inline = depth > 0;
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }
    inline
}

/// Default rule for pass-through statements: append `;` unless the line
/// opens/closes a block, continues a list, is a label, or is already terminated.
/// A `}` that closes an initializer opened on the same line still gets one.
pub fn ensure_terminator(line: &str) -> String {
    let trimmed = line.trim_end();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    match last_char(trimmed) {
        Some('}') if closes_inline_brace(trimmed) => format!("{};", trimmed),
        Some('{' | '}' | ',' | ':' | ';' | '(' | '[') => trimmed.to_string(),
        _ if ends_with_continuation_operator(trimmed) => trimmed.to_string(),
        _ => format!("{};", trimmed),
    }
}

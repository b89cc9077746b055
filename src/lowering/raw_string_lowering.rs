//! Raw String Lowering
//!
//! Go backtick strings become C++ raw strings:
//! ```text
//! `C:\dir`      ->  R"(C:\dir)"
//! s := `line 1      auto s = R"(line 1
//! line 2`      ->  line 2)";
//! ```
//! A backtick left open at the end of a line starts a multi-line literal;
//! the lines up to the closing backtick are copied verbatim.

/// Result of converting the backticks on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStringResult {
    pub line: String,
    /// The line ends inside a raw string.
    pub opened: bool,
}

/// Convert every backtick literal that starts on this line. Backticks inside
/// `"..."` or `'...'` literals are left alone.
pub fn convert_raw_strings(line: &str) -> RawStringResult {
    if !line.contains('`') {
        return RawStringResult { line: line.to_string(), opened: false };
    }

    let mut out = String::with_capacity(line.len() + 8);
    let mut quote: Option<char> = None;
    let mut in_raw = false;
    let mut escaped = false;

    for c in line.chars() {
        if in_raw {
            if c == '`' {
                out.push_str(")\"");
                in_raw = false;
            } else {
                out.push(c);
            }
            continue;
        }
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                out.push(c);
            }
            None => match c {
                '`' => {
                    out.push_str("R\"(");
                    in_raw = true;
                }
                '"' | '\'' => {
                    quote = Some(c);
                    out.push(c);
                }
                _ => out.push(c),
            },
        }
    }

    RawStringResult { line: out, opened: in_raw }
}

/// Inside a multi-line raw string: `None` when the line does not close it,
/// otherwise the line with the closing backtick converted (and any backtick
/// literal after it).
pub fn close_raw_string(line: &str) -> Option<RawStringResult> {
    let pos = line.find('`')?;
    let rest = convert_raw_strings(&line[pos + 1..]);
    Some(RawStringResult {
        line: format!("{})\"{}", &line[..pos], rest.line),
        opened: rest.opened,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_raw_string() {
        let r = convert_raw_strings(r"p := `C:\dir`");
        assert_eq!(r.line, r#"p := R"(C:\dir)""#);
        assert!(!r.opened);
    }

    #[test]
    fn test_backtick_inside_quotes_is_kept() {
        let r = convert_raw_strings(r#"s := "a`b""#);
        assert_eq!(r.line, r#"s := "a`b""#);
        assert!(!r.opened);
    }

    #[test]
    fn test_multi_line_raw_string() {
        let r = convert_raw_strings("s := `first");
        assert_eq!(r.line, "s := R\"(first");
        assert!(r.opened);

        assert!(close_raw_string("middle line").is_none());

        let closed = close_raw_string("last`").unwrap();
        assert_eq!(closed.line, "last)\"");
        assert!(!closed.opened);
    }
}

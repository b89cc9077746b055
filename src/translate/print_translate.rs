//! Print Translation
//!
//! The `fmt.Print*` family and the `print`/`println` builtins become stream
//! insertions; `fmt.Printf`/`fmt.Fprintf` become `printf`/`fprintf`.
//!
//! ```text
//! fmt.Println("x =", x)     std::cout << "x =" << " ";
//!                           _format_output(std::cout, x);
//!                           std::cout << std::endl;
//! println("oops")           std::cerr << "oops" << std::endl;
//! fmt.Printf("%v\n", p)     printf("%s\n", _format_string(p).c_str());
//! ```
//!
//! String and numeric literals are streamed directly. Every other operand
//! goes through `_format_output`, whose full or minimal body is picked once
//! the whole program has been seen.

use crate::error::StructuralError;
use crate::helpers::{find_matching, is_num, is_string_literal, split_top_level};
use crate::lowering::TranslationState;
use crate::translate::{TranslateResult, Translated};

const COUT: &str = "std::cout";
const CERR: &str = "std::cerr";

/// Where a space goes between two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spacing {
    /// `Println`: always.
    Always,
    /// `Print`: only when neither operand is a string.
    BetweenNonStrings,
    /// builtin `print`: never.
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Direct(String),
    Formatted(String),
}

/// Process a print-family call
pub fn process_print(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let Some(open) = trimmed.find('(') else {
        return Ok(pass_through(trimmed, "print call without arguments", state));
    };
    if find_matching(trimmed, open) != Some(trimmed.len() - 1) {
        return Ok(pass_through(trimmed, "print call with trailing text", state));
    }
    let name = trimmed[..open].trim();
    let mut args = split_top_level(&trimmed[open + 1..trimmed.len() - 1], ',');

    match name {
        "fmt.Println" => Ok(stream(COUT, &args, Spacing::Always, true, state)),
        "fmt.Print" => Ok(stream(COUT, &args, Spacing::BetweenNonStrings, false, state)),
        "println" => Ok(stream(CERR, &args, Spacing::Always, true, state)),
        "print" => Ok(stream(CERR, &args, Spacing::Never, false, state)),
        "fmt.Fprintln" | "fmt.Fprint" => {
            let Some(sink) = args.first().and_then(|w| stream_sink(w)) else {
                return Ok(pass_through(trimmed, "writer", state));
            };
            args.remove(0);
            let (spacing, newline) = if name == "fmt.Fprintln" {
                (Spacing::Always, true)
            } else {
                (Spacing::BetweenNonStrings, false)
            };
            Ok(stream(sink, &args, spacing, newline, state))
        }
        "fmt.Printf" => formatted("printf(", &args, trimmed, state),
        "fmt.Fprintf" => {
            let Some(file) = args.first().and_then(|w| file_sink(w)) else {
                return Ok(pass_through(trimmed, "writer", state));
            };
            args.remove(0);
            formatted(&format!("fprintf({}, ", file), &args, trimmed, state)
        }
        _ => Ok(pass_through(trimmed, "print function", state)),
    }
}

fn pass_through(trimmed: &str, what: &str, state: &mut TranslationState) -> Translated {
    state.notice(format!("unsupported {} passed through: `{}`", what, trimmed));
    Translated::Statement(trimmed.to_string())
}

fn stream_sink(writer: &str) -> Option<&'static str> {
    match writer.trim() {
        "os.Stdout" => Some(COUT),
        "os.Stderr" => Some(CERR),
        _ => None,
    }
}

fn file_sink(writer: &str) -> Option<&'static str> {
    match writer.trim() {
        "os.Stdout" => Some("stdout"),
        "os.Stderr" => Some("stderr"),
        _ => None,
    }
}

fn is_direct(arg: &str) -> bool {
    is_string_literal(arg) || is_num(arg)
}

//===========================================================================
// STREAMED PRINTS
//===========================================================================

fn stream(sink: &str, args: &[String], spacing: Spacing, newline: bool, state: &mut TranslationState) -> Translated {
    let mut pieces = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            let prev = &args[i - 1];
            let space = match spacing {
                Spacing::Always => true,
                Spacing::BetweenNonStrings => !is_string_literal(prev) && !is_string_literal(arg),
                Spacing::Never => false,
            };
            if space {
                pieces.push(Piece::Direct("\" \"".to_string()));
            }
        }
        if is_direct(arg) {
            pieces.push(Piece::Direct(arg.clone()));
        } else {
            state.needs_pretty_print = true;
            pieces.push(Piece::Formatted(arg.clone()));
        }
    }
    if newline {
        pieces.push(Piece::Direct("std::endl".to_string()));
    }
    if pieces.is_empty() {
        return Translated::Dropped;
    }

    let mut statements = Vec::new();
    let mut run: Vec<String> = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Direct(text) => run.push(text),
            Piece::Formatted(expr) => {
                if !run.is_empty() {
                    statements.push(format!("{} << {};", sink, run.join(" << ")));
                    run.clear();
                }
                statements.push(format!("_format_output({}, {});", sink, expr));
            }
        }
    }
    if !run.is_empty() {
        statements.push(format!("{} << {};", sink, run.join(" << ")));
    }
    Translated::Line(statements.join("\n"))
}

//===========================================================================
// FORMATTED PRINTS
//===========================================================================

/// Verbs `printf` understands with the same meaning as Go.
const NATIVE_VERBS: &str = "dfFeEgGxXoc";

fn formatted(head: &str, args: &[String], trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let Some(format) = args.first() else {
        return Err(StructuralError::MalformedStatement { kind: "formatted print", text: trimmed.to_string() });
    };
    let mut values: Vec<String> = args[1..].to_vec();

    let format = if format.starts_with('"') && is_string_literal(format) {
        rewrite_verbs(format, &mut values, state)
    } else {
        state.notice(format!("non-literal format string passed through: `{}`", trimmed));
        format.clone()
    };

    let mut call_args = vec![format];
    call_args.extend(values);
    Ok(Translated::Statement(format!("{}{})", head, call_args.join(", "))))
}

/// Rewrite Go verbs in `format` to C `printf` verbs, wrapping the matching
/// arguments where the verb has no C counterpart.
fn rewrite_verbs(format: &str, values: &mut [String], state: &mut TranslationState) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut index = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut spec = String::new();
        while let Some(&f) = chars.peek() {
            if "+-# 0123456789.".contains(f) {
                spec.push(f);
                chars.next();
            } else {
                break;
            }
        }
        let Some(verb) = chars.next() else {
            out.push('%');
            out.push_str(&spec);
            break;
        };
        if verb == '%' {
            out.push_str("%%");
            continue;
        }

        let arg = values.get(index).cloned().unwrap_or_default();
        if NATIVE_VERBS.contains(verb) {
            out.push('%');
            out.push_str(&spec);
            out.push(verb);
        } else if verb == 'v' && is_num(&arg) {
            let integral = arg.parse::<i64>().is_ok() || arg.starts_with("0x");
            out.push('%');
            out.push_str(&spec);
            out.push(if integral { 'd' } else { 'g' });
        } else if matches!(verb, 'v' | 's') && is_string_literal(&arg) {
            out.push('%');
            out.push_str(&spec);
            out.push('s');
        } else {
            // widened: %v %s %t %q and anything printf lacks
            if verb == 'q' {
                out.push_str("\\\"%s\\\"");
            } else {
                out.push('%');
                out.push_str(&spec);
                out.push('s');
            }
            if let Some(slot) = values.get_mut(index) {
                *slot = format!("_format_string({}).c_str()", slot);
                state.needs_pretty_print = true;
            }
        }
        index += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(line: &str, state: &mut TranslationState) -> String {
        process_print(line, state).unwrap().render().unwrap_or_default()
    }

    #[test]
    fn test_println_literals() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(r#"fmt.Println("a", 1)"#, &mut state),
            r#"std::cout << "a" << " " << 1 << std::endl;"#
        );
        assert!(!state.needs_pretty_print);
        assert_eq!(render("fmt.Println()", &mut state), "std::cout << std::endl;");
        assert_eq!(render("fmt.Print()", &mut state), "");
    }

    #[test]
    fn test_println_variables_use_formatter() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(r#"fmt.Println("x =", x)"#, &mut state),
            "std::cout << \"x =\" << \" \";\n_format_output(std::cout, x);\nstd::cout << std::endl;"
        );
        assert!(state.needs_pretty_print);
    }

    #[test]
    fn test_builtins_go_to_stderr() {
        let mut state = TranslationState::new();
        assert_eq!(render(r#"println("oops")"#, &mut state), r#"std::cerr << "oops" << std::endl;"#);
        assert_eq!(render(r#"print("a", "b")"#, &mut state), r#"std::cerr << "a" << "b";"#);
    }

    #[test]
    fn test_print_spacing_rule() {
        let mut state = TranslationState::new();
        assert_eq!(render(r#"fmt.Print("a", "b")"#, &mut state), r#"std::cout << "a" << "b";"#);
        assert_eq!(render("fmt.Print(1, 2)", &mut state), r#"std::cout << 1 << " " << 2;"#);
    }

    #[test]
    fn test_fprint_writers() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(r#"fmt.Fprintln(os.Stderr, "bad")"#, &mut state),
            r#"std::cerr << "bad" << std::endl;"#
        );
        assert_eq!(
            render(r#"fmt.Fprintf(os.Stdout, "%d\n", 3)"#, &mut state),
            r#"fprintf(stdout, "%d\n", 3);"#
        );
        render(r#"fmt.Fprintln(w, "x")"#, &mut state);
        assert_eq!(state.notices.len(), 1);
    }

    #[test]
    fn test_printf_verb_widening() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(r#"fmt.Printf("%d items: %v\n", n, items)"#, &mut state),
            r#"printf("%d items: %s\n", n, _format_string(items).c_str());"#
        );
        assert_eq!(
            render(r#"fmt.Printf("%q and %5.2f%%\n", name, ratio)"#, &mut state),
            r#"printf("\"%s\" and %5.2f%%\n", _format_string(name).c_str(), ratio);"#
        );
        assert_eq!(
            render(r#"fmt.Printf("%v %v %v\n", 1, 2.5, "s")"#, &mut state),
            r#"printf("%d %g %s\n", 1, 2.5, "s");"#
        );
    }
}

//! Defer Translation
//!
//! A deferred call becomes a null-owning `std::shared_ptr<void>` whose
//! deleter runs the call, so it fires when the enclosing scope ends.
//! Destruction order is the reverse of declaration order, matching Go's
//! LIFO defers.
//!
//! ```text
//! defer fmt.Println("bye")      std::shared_ptr<void> _defer_0(nullptr, [&](void*) { std::cout << "bye" << std::endl; });
//! defer func() {                std::shared_ptr<void> _defer_1(nullptr, [&](void*) {
//!     cleanup()                     cleanup();
//! }()                           });
//! ```
//!
//! Arguments are evaluated when the scope ends rather than at the `defer`
//! statement, and a defer inside a loop body runs at the end of each
//! iteration.

use crate::helpers::{find_matching, split_top_level};
use crate::lowering::TranslationState;
use crate::modes::ClosureKind;
use crate::translate::{translate_simple, TranslateResult, Translated};

fn defer_prefix(state: &mut TranslationState) -> String {
    format!("std::shared_ptr<void> {}(nullptr, [&](void*) {{", state.names.next_defer())
}

/// Process a `defer ...` line
pub fn process_defer(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let call = trimmed.strip_prefix("defer").unwrap_or(trimmed).trim();

    let Some(literal) = call.strip_prefix("func()") else {
        if call.starts_with("func(") {
            state.notice(format!("deferred closure with parameters passed through: `{}`", trimmed));
            return Ok(Translated::Statement(trimmed.to_string()));
        }
        let body = translate_simple(call, state)?;
        return Ok(Translated::Line(format!("{} {} }});", defer_prefix(state), body)));
    };
    let literal = literal.trim_start();

    // multi-line closure: body follows, `}()` closes it
    if literal == "{" {
        let prefix = defer_prefix(state);
        state.closures.enter(ClosureKind::Defer, state.depth_before);
        return Ok(Translated::Line(prefix));
    }

    // single line: `func() { a(); b() }()`
    let body = literal
        .strip_prefix('{')
        .and_then(|_| find_matching(literal, 0))
        .filter(|&close| literal[close + 1..].trim() == "()")
        .map(|close| &literal[1..close]);
    match body {
        Some(body) => {
            let mut statements = Vec::new();
            for stmt in split_top_level(body, ';').iter().filter(|s| !s.is_empty()) {
                statements.push(translate_simple(stmt, state)?);
            }
            Ok(Translated::Line(format!("{} {} }});", defer_prefix(state), statements.join(" "))))
        }
        None => {
            state.notice(format!("malformed deferred closure passed through: `{}`", trimmed));
            Ok(Translated::Statement(trimmed.to_string()))
        }
    }
}

/// Process the `}` (or `}()`) that ends a multi-line closure
pub fn process_closure_end(trimmed: &str, state: &mut TranslationState) -> Translated {
    match state.closures.exit() {
        Some(ClosureKind::Defer) => Translated::Line("});".to_string()),
        Some(ClosureKind::Lambda) => Translated::Line("};".to_string()),
        None => Translated::Line(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(t: TranslateResult) -> String {
        t.unwrap().render().unwrap()
    }

    #[test]
    fn test_plain_call() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_defer("defer cleanup(x)", &mut state)),
            "std::shared_ptr<void> _defer_0(nullptr, [&](void*) { cleanup(x); });"
        );
    }

    #[test]
    fn test_deferred_print() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_defer(r#"defer fmt.Println("bye")"#, &mut state)),
            r#"std::shared_ptr<void> _defer_0(nullptr, [&](void*) { std::cout << "bye" << std::endl; });"#
        );
    }

    #[test]
    fn test_single_line_closure() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_defer("defer func() { a(); b() }()", &mut state)),
            "std::shared_ptr<void> _defer_0(nullptr, [&](void*) { a(); b(); });"
        );
    }

    #[test]
    fn test_multi_line_closure() {
        let mut state = TranslationState::new();
        state.depth_before = 1;
        assert_eq!(
            render(process_defer("defer func() {", &mut state)),
            "std::shared_ptr<void> _defer_0(nullptr, [&](void*) {"
        );
        assert!(state.closures.closes_at("}()", 1));
        assert_eq!(process_closure_end("}()", &mut state).render().unwrap(), "});");
        assert!(!state.closures.is_active());
    }

    #[test]
    fn test_each_defer_gets_its_own_name() {
        let mut state = TranslationState::new();
        let first = render(process_defer("defer a()", &mut state));
        let second = render(process_defer("defer b()", &mut state));
        assert!(first.contains("_defer_0("));
        assert!(second.contains("_defer_1("));
    }

    #[test]
    fn test_closure_with_arguments_is_passed_through() {
        let mut state = TranslationState::new();
        process_defer("defer func(n int) { fmt.Println(n) }(x)", &mut state).unwrap();
        assert_eq!(state.notices.len(), 1);
    }
}

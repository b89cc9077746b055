//! Control Flow Translation
//!
//! `if`, `} else if` and `return`.

use crate::error::StructuralError;
use crate::helpers::{find_top_level, split_top_level};
use crate::lowering::TranslationState;
use crate::translate::assignment_translate::{rewrite_value, translate_init};
use crate::translate::{TranslateResult, Translated};

/// `x > 1 {` / `v, ok := m[k]; ok {` -> the C++ condition (with C++17 init).
fn condition(head: &str, state: &mut TranslationState) -> Result<String, StructuralError> {
    let head = head.trim();
    let head = head.strip_suffix('{').unwrap_or(head).trim();
    match find_top_level(head, ';') {
        Some(pos) => {
            let init = translate_init(&head[..pos], state)?;
            Ok(format!("{}; {}", init, head[pos + 1..].trim()))
        }
        None => Ok(head.to_string()),
    }
}

/// Process an `if ... {` line
pub fn process_if(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let head = trimmed.strip_prefix("if").unwrap_or(trimmed);
    let cond = condition(head, state)?;
    Ok(Translated::Line(format!("if ({}) {{", cond)))
}

/// Process a `} else if ... {` line
pub fn process_else_if(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let head = trimmed.strip_prefix("} else if").unwrap_or(trimmed);
    let cond = condition(head, state)?;
    Ok(Translated::Line(format!("}} else if ({}) {{", cond)))
}

/// Process a `return` line
///
/// Inside `main` a bare return exits with status 0. Several values become a
/// tuple of the declared result types.
pub fn process_return(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let rest = trimmed.strip_prefix("return").unwrap_or(trimmed).trim();

    if state.closures.is_active() {
        return Ok(Translated::Statement(trimmed.to_string()));
    }

    let Some(func) = state.current_fn.clone() else {
        return Ok(Translated::Statement(trimmed.to_string()));
    };

    if func.is_main() && rest.is_empty() {
        return Ok(Translated::Statement("return 0".to_string()));
    }
    if rest.is_empty() {
        return Ok(Translated::Statement("return".to_string()));
    }

    let values = split_top_level(rest, ',');
    if values.len() > 1 && func.returns_tuple() {
        let values = values
            .iter()
            .map(|v| rewrite_value(v))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Translated::Statement(format!(
            "return std::tuple<{}>{{{}}}",
            func.tuple_types.join(", "),
            values.join(", ")
        )));
    }

    Ok(Translated::Statement(format!("return {}", rewrite_value(rest)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowering::FunctionContext;

    fn in_function(name: &str, results: &[&str]) -> TranslationState {
        let mut state = TranslationState::new();
        state.enter_function(FunctionContext {
            name: name.to_string(),
            tuple_types: results.iter().map(|r| r.to_string()).collect(),
            depth: 0,
        });
        state
    }

    fn render(t: TranslateResult) -> String {
        t.unwrap().render().unwrap()
    }

    #[test]
    fn test_if_forms() {
        let mut state = TranslationState::new();
        assert_eq!(render(process_if("if x > 2 {", &mut state)), "if (x > 2) {");
        assert_eq!(render(process_else_if("} else if x > 1 {", &mut state)), "} else if (x > 1) {");
    }

    #[test]
    fn test_if_with_init_statement() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_if("if n := len(xs); n > 0 {", &mut state)),
            "if (auto n = len(xs); n > 0) {"
        );
    }

    #[test]
    fn test_if_comma_ok_lookup() {
        let mut state = TranslationState::new();
        state.register_map("ages");
        assert_eq!(
            render(process_if(r#"if age, ok := ages["bob"]; ok {"#, &mut state)),
            r#"if (auto [age, ok] = _comma_ok(ages, "bob"); ok) {"#
        );
    }

    #[test]
    fn test_tuple_return() {
        let mut state = in_function("divmod", &["int", "int"]);
        assert_eq!(
            render(process_return("return a / b, a % b", &mut state)),
            "return std::tuple<int, int>{a / b, a % b};"
        );
    }

    #[test]
    fn test_main_and_void_returns() {
        let mut state = in_function("main", &[]);
        assert_eq!(render(process_return("return", &mut state)), "return 0;");
        let mut state = in_function("greet", &[]);
        assert_eq!(render(process_return("return", &mut state)), "return;");
    }

    #[test]
    fn test_return_inside_closure_is_plain() {
        let mut state = in_function("main", &[]);
        state.closures.enter(crate::modes::ClosureKind::Lambda, 1);
        assert_eq!(render(process_return("return x * 2", &mut state)), "return x * 2;");
    }

    #[test]
    fn test_return_heap_literal() {
        let mut state = in_function("newPoint", &["*Point"]);
        assert_eq!(
            render(process_return("return &Point{X: 1, Y: 2}", &mut state)),
            "return new Point{.X = 1, .Y = 2};"
        );
    }
}

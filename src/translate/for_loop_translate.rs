//! For-loop Translation
//!
//! All Go loop shapes map onto a C++ `for`/`while` header. Whether a range
//! loop walks a hash container or an indexable sequence is decided only by
//! the known-maps set; there is no type analysis.
//!
//! ```text
//! for {                       for (;;) {
//! for x < 10 {                while (x < 10) {
//! for i := 0; i < n; i++ {    for (auto i = 0; i < n; i++) {
//! for i := range xs {         for (int i = 0; i < len(xs); i++) {
//! for k, v := range m {       for (const auto& [k, v] : m) {
//! for _, v := range xs {      for (auto v : xs) {
//! ```

use crate::error::StructuralError;
use crate::helpers::{is_discard, is_num, mask_literals, split_assignment, split_top_level, AssignKind};
use crate::lowering::TranslationState;
use crate::translate::{TranslateResult, Translated};

/// Process a `for ... {` line
pub fn process_for_loop(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let expr = trimmed.strip_prefix("for").unwrap_or(trimmed);
    let expr = expr.trim().strip_suffix('{').unwrap_or(expr).trim();

    if expr.is_empty() || expr.replace(' ', "") == ";;" {
        return Ok(Translated::Line("for (;;) {".to_string()));
    }

    if let Some((vars, container)) = split_range(expr) {
        let vars: Vec<String> = split_top_level(vars, ',');
        return range_loop(&vars, container, state).map(Translated::Line);
    }

    let clauses = split_top_level(expr, ';');
    if clauses.len() == 3 {
        let init = match split_assignment(&clauses[0]) {
            Some(parts) if parts.kind == AssignKind::Define => format!("auto {} = {}", parts.lhs, parts.rhs),
            _ => clauses[0].clone(),
        };
        return Ok(Translated::Line(format!(
            "for ({}; {}; {}) {{",
            init, clauses[1], clauses[2]
        )));
    }
    if clauses.len() > 1 {
        return Err(StructuralError::MalformedStatement { kind: "for loop", text: trimmed.to_string() });
    }

    Ok(Translated::Line(format!("while ({}) {{", expr)))
}

/// `k, v := range m` -> (`k, v`, `m`). No variables gives an empty list.
fn split_range(expr: &str) -> Option<(&str, &str)> {
    if let Some(container) = expr.strip_prefix("range ") {
        return Some(("", container.trim()));
    }
    let masked = mask_literals(expr);
    let pos = masked.find(" range ")?;
    let head = expr[..pos].trim();
    let head = head
        .strip_suffix(":=")
        .or_else(|| head.strip_suffix('='))
        .unwrap_or(head)
        .trim();
    Some((head, expr[pos + " range ".len()..].trim()))
}

fn counting_loop(index: &str, container: &str) -> String {
    format!(
        "for (int {i} = 0; {i} < len({c}); {i}++) {{",
        i = index,
        c = container
    )
}

fn range_loop(vars: &[String], container: &str, state: &mut TranslationState) -> Result<String, StructuralError> {
    let is_map = state.is_known_map(container);

    // integer range: `for i := range 10`
    if is_num(container) {
        let index = match vars.first() {
            Some(v) if !is_discard(v) => v.clone(),
            _ => state.names.next_discard(),
        };
        return Ok(format!("for (int {i} = 0; {i} < {n}; {i}++) {{", i = index, n = container));
    }

    match vars {
        [] => {
            let d = state.names.next_discard();
            Ok(format!("for ([[maybe_unused]] const auto& {} : {}) {{", d, container))
        }
        [single] => {
            if is_map {
                let key = if is_discard(single) { state.names.next_discard() } else { single.clone() };
                let value = state.names.next_discard();
                Ok(format!("for (const auto& [{}, {}] : {}) {{", key, value, container))
            } else if is_discard(single) {
                let first = state.names.next_discard();
                let second = state.names.next_discard();
                Ok(format!("for (const auto& [{}, {}] : {}) {{", first, second, container))
            } else {
                Ok(counting_loop(single, container))
            }
        }
        [first, second] => {
            let (first_discard, second_discard) = (is_discard(first), is_discard(second));
            if is_map {
                match (first_discard, second_discard) {
                    (true, false) => {
                        let entry = state.names.next_entry();
                        Ok(format!(
                            "for (const auto& {e} : {c}) {{\nauto {v} = {e}.second;",
                            e = entry,
                            c = container,
                            v = second
                        ))
                    }
                    _ => {
                        let key = if first_discard { state.names.next_discard() } else { first.clone() };
                        let value = if second_discard { state.names.next_discard() } else { second.clone() };
                        Ok(format!("for (const auto& [{}, {}] : {}) {{", key, value, container))
                    }
                }
            } else {
                match (first_discard, second_discard) {
                    (true, false) => Ok(format!("for (auto {} : {}) {{", second, container)),
                    (true, true) => {
                        let d = state.names.next_discard();
                        Ok(format!("for ([[maybe_unused]] const auto& {} : {}) {{", d, container))
                    }
                    (false, true) => Ok(counting_loop(first, container)),
                    (false, false) => Ok(format!(
                        "{}\nauto {} = {}[{}];",
                        counting_loop(first, container),
                        second,
                        container,
                        first
                    )),
                }
            }
        }
        _ => Err(StructuralError::MalformedStatement {
            kind: "range loop",
            text: vars.join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(line: &str, state: &mut TranslationState) -> String {
        process_for_loop(line, state).unwrap().render().unwrap()
    }

    #[test]
    fn test_endless_and_condition_loops() {
        let mut state = TranslationState::new();
        assert_eq!(translate("for {", &mut state), "for (;;) {");
        assert_eq!(translate("for ;; {", &mut state), "for (;;) {");
        assert_eq!(translate("for x < 10 {", &mut state), "while (x < 10) {");
    }

    #[test]
    fn test_three_clause_loop() {
        let mut state = TranslationState::new();
        assert_eq!(
            translate("for i := 0; i < 10; i++ {", &mut state),
            "for (auto i = 0; i < 10; i++) {"
        );
        assert_eq!(translate("for ; i < 10; {", &mut state), "for (; i < 10; ) {");
    }

    #[test]
    fn test_sequence_ranges() {
        let mut state = TranslationState::new();
        assert_eq!(
            translate("for i := range xs {", &mut state),
            "for (int i = 0; i < len(xs); i++) {"
        );
        assert_eq!(translate("for _, v := range xs {", &mut state), "for (auto v : xs) {");
        assert_eq!(
            translate("for i, v := range xs {", &mut state),
            "for (int i = 0; i < len(xs); i++) {\nauto v = xs[i];"
        );
        assert_eq!(
            translate("for _ = range pairs {", &mut state),
            "for (const auto& [_d__0, _d__1] : pairs) {"
        );
    }

    #[test]
    fn test_map_ranges() {
        let mut state = TranslationState::new();
        state.register_map("m");
        assert_eq!(translate("for k := range m {", &mut state), "for (const auto& [k, _d__0] : m) {");
        assert_eq!(translate("for k, v := range m {", &mut state), "for (const auto& [k, v] : m) {");
        assert_eq!(
            translate("for _, v := range m {", &mut state),
            "for (const auto& _h__0 : m) {\nauto v = _h__0.second;"
        );
    }

    #[test]
    fn test_unregistered_map_is_treated_as_sequence() {
        let mut state = TranslationState::new();
        assert_eq!(
            translate("for k := range later {", &mut state),
            "for (int k = 0; k < len(later); k++) {"
        );
    }

    #[test]
    fn test_integer_range() {
        let mut state = TranslationState::new();
        assert_eq!(translate("for i := range 3 {", &mut state), "for (int i = 0; i < 3; i++) {");
    }
}

//! Assignment Translation
//!
//! Handles `=` and `:=` outside declaration blocks, including:
//! - multi-value destructuring (`a, b := f()`, `a, b = b, a`)
//! - discards, which need a real binding in C++
//! - container construction (`make`, map/slice/array literals)
//! - map literals spanning several lines
//! - `append` on slices
//!
//! Every map-typed target is recorded in the known-maps set as soon as its
//! line is translated, so later range loops over it destructure entries.

use crate::error::StructuralError;
use crate::helpers::{
    find_matching, find_top_level, is_discard, is_identifier, split_assignment, split_top_level,
    AssignKind,
};
use crate::lowering::TranslationState;
use crate::modes::BlockMode;
use crate::translate::function_def_translate::process_function_literal;
use crate::translate::{TranslateResult, Translated};
use crate::type_map::{is_map_type, is_slice_type, map_type, split_composite_literal, split_map_type};

//===========================================================================
// CONTAINER CONSTRUCTION
//===========================================================================

/// A value expression rewritten as `cpp_type` followed by `init`
/// (`{...}` or `(n)`), so it can appear either as a temporary or as the
/// initializer of a typed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construction {
    pub cpp_type: String,
    pub init: String,
    pub is_map: bool,
}

impl Construction {
    pub fn temporary(&self) -> String {
        format!("{}{}", self.cpp_type, self.init)
    }

    pub fn declaration(&self, name: &str) -> String {
        format!("{} {}{}", self.cpp_type, name, self.init)
    }
}

/// `make(...)` or a closed composite literal. `None` for any other expression.
pub fn construct(expr: &str) -> Result<Option<Construction>, StructuralError> {
    let expr = expr.trim();

    if let Some(args) = call_args(expr, "make") {
        let args = split_top_level(args, ',');
        let Some(go_type) = args.first() else {
            return Ok(None);
        };
        if is_map_type(go_type) {
            return Ok(Some(Construction { cpp_type: map_type(go_type), init: "{}".to_string(), is_map: true }));
        }
        if is_slice_type(go_type) {
            let init = match args.get(1) {
                Some(len) => format!("({})", len),
                None => "{}".to_string(),
            };
            return Ok(Some(Construction { cpp_type: map_type(go_type), init, is_map: false }));
        }
        return Ok(None);
    }

    let Some(lit) = split_composite_literal(expr).filter(|l| l.closed) else {
        return Ok(None);
    };
    let type_name = lit.type_name;

    if let Some((_, value_type)) = split_map_type(type_name) {
        let entries = map_entries(lit.elements, value_type)?;
        return Ok(Some(Construction {
            cpp_type: map_type(type_name),
            init: format!("{{{}}}", entries.join(", ")),
            is_map: true,
        }));
    }
    if let Some(elem) = type_name.strip_prefix("[...]") {
        let count = split_top_level(lit.elements, ',').iter().filter(|e| !e.is_empty()).count();
        return Ok(Some(Construction {
            cpp_type: format!("std::array<{}, {}>", map_type(elem), count),
            init: format!("{{{}}}", elements(lit.elements)),
            is_map: false,
        }));
    }
    if type_name.starts_with('[') || is_type_name(type_name) {
        return Ok(Some(Construction {
            cpp_type: map_type(type_name),
            init: format!("{{{}}}", elements(lit.elements)),
            is_map: false,
        }));
    }
    Ok(None)
}

/// `Point`, `geo.Point`
fn is_type_name(s: &str) -> bool {
    s.split('.').all(is_identifier)
}

/// Argument text of `name(args)` when the call spans the whole expression.
fn call_args<'a>(expr: &'a str, name: &str) -> Option<&'a str> {
    let rest = expr.strip_prefix(name)?;
    if !rest.starts_with('(') {
        return None;
    }
    let open = name.len();
    match find_matching(expr, open) {
        Some(close) if close == expr.len() - 1 => Some(&expr[open + 1..close]),
        _ => None,
    }
}

/// Rewrite one element of a composite literal: `X: 1` -> `.X = 1`, nested
/// braces recursively, `&T{}` -> `new T{}`.
fn element(e: &str) -> String {
    let e = e.trim();
    if let Some(pos) = find_top_level(e, ':') {
        let key = e[..pos].trim();
        if is_identifier(key) {
            return format!(".{} = {}", key, element(&e[pos + 1..]));
        }
    }
    if e.starts_with('{') && e.ends_with('}') && e.len() >= 2 {
        return format!("{{{}}}", elements(&e[1..e.len() - 1]));
    }
    if let Some(inner) = e.strip_prefix('&') {
        if let Ok(Some(c)) = construct(inner) {
            return format!("new {}", c.temporary());
        }
    }
    match construct(e) {
        Ok(Some(c)) => c.temporary(),
        _ => e.to_string(),
    }
}

/// Rewrite a comma-separated element list, keeping a trailing comma.
fn elements(list: &str) -> String {
    let trimmed = list.trim();
    let (body, trailing) = match trimmed.strip_suffix(',') {
        Some(body) => (body, ","),
        None => (trimmed, ""),
    };
    let parts: Vec<String> = split_top_level(body, ',').iter().map(|e| element(e)).collect();
    format!("{}{}", parts.join(", "), trailing)
}

/// `"a": 1, "b": 2` -> `{"a", 1}`, `{"b", 2}`. Brace values of a pointer
/// value type are heap-allocated.
pub fn map_entries(list: &str, value_type: &str) -> Result<Vec<String>, StructuralError> {
    let mut out = Vec::new();
    for entry in split_top_level(list, ',') {
        if entry.is_empty() {
            continue;
        }
        let Some(pos) = find_top_level(&entry, ':') else {
            return Err(StructuralError::MissingPairSeparator { entry });
        };
        let key = element(&entry[..pos]);
        let raw = entry[pos + 1..].trim();
        let value = match value_type.trim().strip_prefix('*') {
            Some(pointee) if raw.starts_with('{') && raw.ends_with('}') => {
                format!("new {}{}", map_type(pointee), element(raw))
            }
            _ => element(raw),
        };
        out.push(format!("{{{}, {}}}", key, value));
    }
    Ok(out)
}

/// Rewrite a value expression: heap literals, `make` and composite literals.
/// Anything else is returned unchanged.
pub fn rewrite_value(expr: &str) -> Result<String, StructuralError> {
    let expr = expr.trim();
    if let Some(inner) = expr.strip_prefix('&') {
        if let Some(c) = construct(inner)? {
            return Ok(format!("new {}", c.temporary()));
        }
    }
    match construct(expr)? {
        Some(c) => Ok(c.temporary()),
        None => Ok(expr.to_string()),
    }
}

//===========================================================================
// ASSIGNMENTS
//===========================================================================

/// `m[k]` -> (`m`, `k`)
fn split_index(expr: &str) -> Option<(&str, &str)> {
    let expr = expr.trim();
    if !expr.ends_with(']') {
        return None;
    }
    expr.char_indices()
        .filter(|&(i, c)| c == '[' && i > 0)
        .find(|&(i, _)| find_matching(expr, i) == Some(expr.len() - 1))
        .map(|(i, _)| (expr[..i].trim(), &expr[i + 1..expr.len() - 1]))
}

fn binding(name: &str, state: &mut TranslationState) -> String {
    if is_discard(name) {
        state.names.next_discard()
    } else {
        name.to_string()
    }
}

/// Process a line with a top-level `=` or `:=`
pub fn process_assignment(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let Some(parts) = split_assignment(trimmed) else {
        return Ok(Translated::Statement(trimmed.to_string()));
    };

    if parts.rhs.starts_with("func(") || parts.rhs.starts_with("func (") {
        return process_function_literal(parts.lhs, parts.kind, parts.rhs, state);
    }

    let names = split_top_level(parts.lhs, ',');
    if names.len() <= 1 {
        return single_assignment(parts.lhs, parts.rhs, parts.kind, state);
    }

    let values = split_top_level(parts.rhs, ',');
    if values.len() == 1 {
        return destructure(&names, &values[0], parts.kind, trimmed, state);
    }
    if values.len() != names.len() {
        return Err(StructuralError::DeclarationCountMismatch {
            names: names.len(),
            values: values.len(),
            text: trimmed.to_string(),
        });
    }

    let values = values
        .iter()
        .map(|v| rewrite_value(v))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.kind {
        AssignKind::Define => {
            let lines: Vec<String> = names
                .iter()
                .zip(&values)
                .map(|(n, v)| {
                    if is_discard(n) {
                        format!("static_cast<void>({});", v)
                    } else {
                        format!("auto {} = {};", n, v)
                    }
                })
                .collect();
            Ok(Translated::Line(lines.join("\n")))
        }
        // `a, b = b, a` must read every value before writing any target
        AssignKind::Assign => {
            let targets: Vec<&str> = names
                .iter()
                .map(|n| if is_discard(n) { "std::ignore" } else { n.as_str() })
                .collect();
            Ok(Translated::Statement(format!(
                "std::tie({}) = std::make_tuple({})",
                targets.join(", "),
                values.join(", ")
            )))
        }
    }
}

/// Several names bound from one multi-valued expression.
fn destructure(
    names: &[String],
    value: &str,
    kind: AssignKind,
    trimmed: &str,
    state: &mut TranslationState,
) -> TranslateResult {
    let mut value = value.to_string();

    if names.len() == 2 {
        if let Some((container, key)) = split_index(&value) {
            if state.is_known_map(container) {
                value = format!("_comma_ok({}, {})", container, key);
            }
        } else if value.contains(".(") {
            state.notice(format!("type assertions are not supported: `{}`", trimmed));
        }
    }

    match kind {
        AssignKind::Define => {
            let bindings: Vec<String> = names.iter().map(|n| binding(n, state)).collect();
            Ok(Translated::Statement(format!("auto [{}] = {}", bindings.join(", "), value)))
        }
        AssignKind::Assign => {
            let targets: Vec<&str> = names
                .iter()
                .map(|n| if is_discard(n) { "std::ignore" } else { n.as_str() })
                .collect();
            Ok(Translated::Statement(format!("std::tie({}) = {}", targets.join(", "), value)))
        }
    }
}

fn single_assignment(name: &str, rhs: &str, kind: AssignKind, state: &mut TranslationState) -> TranslateResult {
    if is_discard(name) {
        return Ok(Translated::Statement(format!("static_cast<void>({})", rewrite_value(rhs)?)));
    }

    if let Some(args) = call_args(rhs, "append") {
        return Ok(Translated::Line(append(name, args, kind)));
    }

    // a composite literal continued on the next lines
    if let Some(lit) = split_composite_literal(rhs).filter(|l| !l.closed) {
        let cpp_type = map_type(lit.type_name);
        state.has_aggregates |= !lit.type_name.starts_with('[');
        state.enter_block(BlockMode::CompositeLiteral, state.depth_before);
        let head = match kind {
            AssignKind::Define => format!("{} {}{{", cpp_type, name),
            AssignKind::Assign => format!("{} = {}{{", name, cpp_type),
        };
        return Ok(Translated::Line(format!("{}{}", head, elements(lit.elements))));
    }

    if let Some(inner) = rhs.strip_prefix('&') {
        if let Some(c) = construct(inner)? {
            return Ok(Translated::Statement(assign(name, &format!("new {}", c.temporary()), kind)));
        }
    }

    if let Some(c) = construct(rhs)? {
        if c.is_map {
            state.register_map(name);
        }
        return Ok(Translated::Statement(match kind {
            AssignKind::Define => c.declaration(name),
            AssignKind::Assign => format!("{} = {}", name, c.temporary()),
        }));
    }

    if kind == AssignKind::Define && state.is_known_map(rhs) {
        state.register_map(name);
    }
    Ok(Translated::Statement(assign(name, rhs, kind)))
}

fn assign(name: &str, value: &str, kind: AssignKind) -> String {
    match kind {
        AssignKind::Define => format!("auto {} = {}", name, value),
        AssignKind::Assign => format!("{} = {}", name, value),
    }
}

/// `xs = append(xs, a, b)` -> `xs.push_back(a); xs.push_back(b);`
fn append(name: &str, args: &str, kind: AssignKind) -> String {
    let args = split_top_level(args, ',');
    let mut out = Vec::new();
    let source = args.first().map(String::as_str).unwrap_or(name);

    if source != name || kind == AssignKind::Define {
        out.push(format!("{};", assign(name, source, kind)));
    }
    for value in args.iter().skip(1) {
        match value.strip_suffix("...") {
            Some(spread) => out.push(format!(
                "{n}.insert({n}.end(), std::begin({s}), std::end({s}));",
                n = name,
                s = spread
            )),
            None => out.push(format!("{}.push_back({});", name, element(value))),
        }
    }
    out.join(" ")
}

/// Rewrite an `if`/`switch` init clause; returned without its `;`.
pub fn translate_init(init: &str, state: &mut TranslationState) -> Result<String, StructuralError> {
    let init = init.trim();
    let rendered = match split_assignment(init) {
        Some(_) => process_assignment(init, state)?.render().unwrap_or_default(),
        None => init.to_string(),
    };
    Ok(rendered.trim_end_matches(';').to_string())
}

//===========================================================================
// MAP AND COMPOSITE LITERAL BODIES
//===========================================================================

/// Process `m := map[K]V{` whose entries follow on the next lines
pub fn process_map_literal_open(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let line = trimmed.strip_prefix("var ").unwrap_or(trimmed);
    let malformed = || StructuralError::MalformedStatement { kind: "map literal", text: trimmed.to_string() };

    let parts = split_assignment(line).ok_or_else(malformed)?;
    let name = parts.lhs.split_whitespace().next().ok_or_else(malformed)?;
    let lit = split_composite_literal(parts.rhs).ok_or_else(malformed)?;
    let (_, value_type) = split_map_type(lit.type_name).ok_or_else(malformed)?;

    let entries = map_entries(lit.elements, value_type)?;
    let trailing = if lit.elements.ends_with(',') { "," } else { "" };

    state.register_map(name);
    state.map_literal_value = Some(value_type.to_string());
    state.enter_block(BlockMode::MapLiteral, state.depth_before);

    let cpp_type = map_type(lit.type_name);
    let head = match parts.kind {
        AssignKind::Assign if !trimmed.starts_with("var ") => format!("{} = {}{{", name, cpp_type),
        _ => format!("{} {}{{", cpp_type, name),
    };
    Ok(Translated::Line(format!("{}{}{}", head, entries.join(", "), trailing)))
}

/// Process one line of entries inside a multi-line map literal
pub fn process_map_literal_entry(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let value_type = state.map_literal_value.clone().unwrap_or_default();
    let entries = map_entries(trimmed, &value_type)?;
    let trailing = if trimmed.ends_with(',') { "," } else { "" };
    Ok(Translated::Line(format!("{}{}", entries.join(", "), trailing)))
}

/// Process one line of elements inside a multi-line slice or struct literal
pub fn process_composite_entry(trimmed: &str) -> Translated {
    Translated::Line(elements(trimmed))
}

/// Process a statement with no assignment
pub fn process_expression(trimmed: &str) -> Translated {
    if let Some(args) = call_args(trimmed, "delete") {
        let args = split_top_level(args, ',');
        if let [map, key] = args.as_slice() {
            return Translated::Statement(format!("{}.erase({})", map, key));
        }
    }
    Translated::Statement(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(t: TranslateResult) -> String {
        t.unwrap().render().unwrap()
    }

    #[test]
    fn test_simple_assignments() {
        let mut state = TranslationState::new();
        assert_eq!(render(process_assignment("x := 5", &mut state)), "auto x = 5;");
        assert_eq!(render(process_assignment("x = x + 1", &mut state)), "x = x + 1;");
        assert_eq!(render(process_assignment("_ = x", &mut state)), "static_cast<void>(x);");
    }

    #[test]
    fn test_multi_value_destructuring() {
        let mut state = TranslationState::new();
        assert_eq!(render(process_assignment("q, r := divmod(7, 2)", &mut state)), "auto [q, r] = divmod(7, 2);");
        assert_eq!(
            render(process_assignment("_, r2 := divmod(9, 4)", &mut state)),
            "auto [_d__0, r2] = divmod(9, 4);"
        );
        assert_eq!(
            render(process_assignment("q, _ = divmod(9, 4)", &mut state)),
            "std::tie(q, std::ignore) = divmod(9, 4);"
        );
    }

    #[test]
    fn test_parallel_assignment() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_assignment("a, b = b, a", &mut state)),
            "std::tie(a, b) = std::make_tuple(b, a);"
        );
        assert_eq!(render(process_assignment("a, b := 1, 2", &mut state)), "auto a = 1;\nauto b = 2;");
    }

    #[test]
    fn test_count_mismatch_is_fatal() {
        let mut state = TranslationState::new();
        let err = process_assignment("a, b := 1, 2, 3", &mut state).unwrap_err();
        assert!(matches!(err, StructuralError::DeclarationCountMismatch { names: 2, values: 3, .. }));
    }

    #[test]
    fn test_comma_ok_lookup() {
        let mut state = TranslationState::new();
        state.register_map("m");
        assert_eq!(
            render(process_assignment(r#"v, ok := m["a"]"#, &mut state)),
            r#"auto [v, ok] = _comma_ok(m, "a");"#
        );
    }

    #[test]
    fn test_inline_map_literal_registers_map() {
        let mut state = TranslationState::new();
        let out = render(process_assignment(r#"m := map[string]string{"a": "x", "b": "y"}"#, &mut state));
        assert_eq!(out, r#"std::unordered_map<std::string, std::string> m{{"a", "x"}, {"b", "y"}};"#);
        assert!(state.is_known_map("m"));
    }

    #[test]
    fn test_map_entry_without_separator() {
        let mut state = TranslationState::new();
        let err = process_assignment(r#"m := map[string]int{"a" 1}"#, &mut state).unwrap_err();
        assert!(matches!(err, StructuralError::MissingPairSeparator { .. }));
    }

    #[test]
    fn test_make_and_copies_register_maps() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_assignment("counts := make(map[string]int)", &mut state)),
            "std::unordered_map<std::string, int> counts{};"
        );
        assert_eq!(render(process_assignment("other := counts", &mut state)), "auto other = counts;");
        assert!(state.is_known_map("other"));
        assert_eq!(
            render(process_assignment("buf := make([]int, 10)", &mut state)),
            "std::vector<int> buf(10);"
        );
    }

    #[test]
    fn test_slice_and_struct_literals() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_assignment("xs := []int{1, 2, 3}", &mut state)),
            "std::vector<int> xs{1, 2, 3};"
        );
        assert_eq!(
            render(process_assignment("arr := [...]string{\"a\", \"b\"}", &mut state)),
            "std::array<std::string, 2> arr{\"a\", \"b\"};"
        );
        assert_eq!(
            render(process_assignment("p := Person{Name: \"Bob\", Age: 3}", &mut state)),
            "Person p{.Name = \"Bob\", .Age = 3};"
        );
        assert_eq!(render(process_assignment("c := &Creature{1}", &mut state)), "auto c = new Creature{1};");
    }

    #[test]
    fn test_append() {
        let mut state = TranslationState::new();
        assert_eq!(
            render(process_assignment("xs = append(xs, 4, 5)", &mut state)),
            "xs.push_back(4); xs.push_back(5);"
        );
        assert_eq!(
            render(process_assignment("xs = append(xs, ys...)", &mut state)),
            "xs.insert(xs.end(), std::begin(ys), std::end(ys));"
        );
        assert_eq!(
            render(process_assignment("zs := append(xs, 1)", &mut state)),
            "auto zs = xs; zs.push_back(1);"
        );
    }

    #[test]
    fn test_multi_line_map_literal() {
        let mut state = TranslationState::new();
        let open = render(process_map_literal_open("m := map[int]*Creature{", &mut state));
        assert_eq!(open, "std::unordered_map<int, Creature*> m{");
        assert!(state.blocks.is_active());
        assert!(state.is_known_map("m"));

        let entry = render(process_map_literal_entry("1: {\"Wolf\", 3},", &mut state));
        assert_eq!(entry, "{1, new Creature{\"Wolf\", 3}},");
    }

    #[test]
    fn test_multi_line_composite_literal() {
        let mut state = TranslationState::new();
        assert_eq!(render(process_assignment("p := Point{", &mut state)), "Point p{");
        assert_eq!(process_composite_entry("X: 1,").render().unwrap(), ".X = 1,");
        assert_eq!(process_composite_entry("{1, 2},").render().unwrap(), "{1, 2},");
    }

    #[test]
    fn test_delete_builtin() {
        assert_eq!(process_expression("delete(m, \"a\")").render().unwrap(), "m.erase(\"a\");");
        assert_eq!(process_expression("x++").render().unwrap(), "x++;");
    }
}

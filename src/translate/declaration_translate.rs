//! Declaration Translation
//!
//! `var`, `const` and `type` lines, on their own or as entries of a
//! parenthesised group, plus the fields of an open struct body.
//!
//! ```text
//! var x int                  int x{};
//! var a, b = 1, "s"          auto a = 1;  auto b = "s";
//! const Pi float64 = 3.14    const double Pi = 3.14;
//! type Celsius float64       using Celsius = double;
//! type Point struct {        class Point { public:
//!     X, Y int                   int X{}; int Y{};
//! }                          <_str()> };
//! ```

use crate::error::StructuralError;
use crate::helpers::{
    is_discard, is_identifier, replace_identifier, split_assignment, split_top_level, AssignKind,
};
use crate::lowering::{ConstTemplate, TranslationState};
use crate::modes::BlockMode;
use crate::translate::assignment_translate::{construct, process_assignment, rewrite_value};
use crate::translate::function_def_translate::process_function_literal;
use crate::translate::struct_method::{class_opener, process_struct_close};
use crate::translate::{TranslateResult, Translated};
use crate::type_map::{is_map_type, map_type};

/// `a, b int` -> (["a", "b"], Some("int")); `x` -> (["x"], None)
fn split_names_and_type(decl: &str) -> (Vec<String>, Option<String>) {
    let mut names = split_top_level(decl, ',');
    let mut go_type = None;
    if let Some(last) = names.pop() {
        match last.split_once(char::is_whitespace) {
            Some((name, t)) => {
                names.push(name.to_string());
                go_type = Some(t.trim().to_string());
            }
            None => names.push(last),
        }
    }
    (names, go_type)
}

fn check_names(names: &[String], kind: &'static str, text: &str) -> Result<(), StructuralError> {
    if names.is_empty() || names.iter().any(|n| !is_identifier(n)) {
        return Err(StructuralError::UnrecognizedDeclaration { kind, text: text.to_string() });
    }
    Ok(())
}

//===========================================================================
// VAR
//===========================================================================

/// Process `var ...` or an entry of `var ( ... )`
pub fn process_var(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let body = trimmed.strip_prefix("var ").unwrap_or(trimmed).trim();
    let (decl, values) = match split_assignment(body) {
        Some(parts) => (parts.lhs, split_top_level(parts.rhs, ',')),
        None => (body, Vec::new()),
    };

    let (names, go_type) = split_names_and_type(decl);
    check_names(&names, "var", trimmed)?;
    let cpp_type = go_type.as_deref().map(map_type);

    if go_type.as_deref().is_some_and(is_map_type) {
        for name in names.iter().filter(|n| !is_discard(n)) {
            state.register_map(name);
        }
    }

    // zero values
    if values.is_empty() {
        let Some(cpp_type) = cpp_type else {
            return Err(StructuralError::UnrecognizedDeclaration { kind: "var", text: trimmed.to_string() });
        };
        let lines: Vec<String> = names.iter().map(|n| format!("{} {}{{}};", cpp_type, n)).collect();
        return Ok(Translated::Line(lines.join("\n")));
    }

    // `var a, b = f()`
    if values.len() == 1 && names.len() > 1 {
        return process_assignment(&format!("{} := {}", names.join(", "), values[0]), state);
    }
    if values.len() != names.len() {
        return Err(StructuralError::DeclarationCountMismatch {
            names: names.len(),
            values: values.len(),
            text: trimmed.to_string(),
        });
    }

    if let ([name], [value]) = (names.as_slice(), values.as_slice()) {
        if value.starts_with("func(") && cpp_type.is_none() {
            return process_function_literal(name, AssignKind::Define, value, state);
        }
    }

    let mut lines = Vec::new();
    for (name, value) in names.iter().zip(&values) {
        if is_discard(name) {
            lines.push(format!("static_cast<void>({});", rewrite_value(value)?));
            continue;
        }
        match &cpp_type {
            Some(t) => lines.push(format!("{} {} = {};", t, name, rewrite_value(value)?)),
            None => match construct(value)? {
                Some(c) => {
                    if c.is_map {
                        state.register_map(name);
                    }
                    lines.push(format!("{};", c.declaration(name)));
                }
                None => {
                    if state.is_known_map(value) {
                        state.register_map(name);
                    }
                    lines.push(format!("auto {} = {};", name, rewrite_value(value)?));
                }
            },
        }
    }
    Ok(Translated::Line(lines.join("\n")))
}

//===========================================================================
// CONST
//===========================================================================

/// Process `const ...` or an entry of `const ( ... )`
///
/// `iota` is the index of the entry within its group. A bare entry repeats
/// the last explicit expression list with the current index.
pub fn process_const(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    if state.blocks.current() != Some(BlockMode::Const) {
        state.const_group.reset();
    }
    let body = trimmed.strip_prefix("const ").unwrap_or(trimmed).trim();

    let (names, template) = match split_assignment(body) {
        Some(parts) => {
            let (names, go_type) = split_names_and_type(parts.lhs);
            let exprs = split_top_level(parts.rhs, ',');
            if exprs.len() != names.len() {
                return Err(StructuralError::DeclarationCountMismatch {
                    names: names.len(),
                    values: exprs.len(),
                    text: trimmed.to_string(),
                });
            }
            let template = ConstTemplate { cpp_type: go_type.as_deref().map(map_type), exprs };
            state.const_group.template = Some(template.clone());
            (names, template)
        }
        None => {
            let names = split_top_level(body, ',');
            let Some(template) = state.const_group.template.clone() else {
                return Err(StructuralError::UnrecognizedDeclaration { kind: "const", text: trimmed.to_string() });
            };
            if template.exprs.len() != names.len() {
                return Err(StructuralError::DeclarationCountMismatch {
                    names: names.len(),
                    values: template.exprs.len(),
                    text: trimmed.to_string(),
                });
            }
            (names, template)
        }
    };
    check_names(&names, "const", trimmed)?;

    let iota = state.const_group.index.to_string();
    state.const_group.index += 1;

    let lines: Vec<String> = names
        .iter()
        .zip(&template.exprs)
        .filter(|(name, _)| !is_discard(name))
        .map(|(name, expr)| {
            let value = replace_identifier(expr, "iota", &iota);
            match &template.cpp_type {
                Some(t) => format!("const {} {} = {};", t, name, value),
                None => format!("const auto {} = {};", name, value),
            }
        })
        .collect();

    if lines.is_empty() {
        Ok(Translated::Dropped)
    } else {
        Ok(Translated::Line(lines.join("\n")))
    }
}

//===========================================================================
// TYPE
//===========================================================================

/// Process `type ...` or an entry of `type ( ... )`
pub fn process_type(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let body = trimmed.strip_prefix("type ").unwrap_or(trimmed).trim();
    let unrecognized = || StructuralError::UnrecognizedDeclaration { kind: "type", text: trimmed.to_string() };

    let (name, rest) = body.split_once(char::is_whitespace).ok_or_else(unrecognized)?;
    if !is_identifier(name) {
        return Err(unrecognized());
    }
    let rest = rest.trim();

    if let Some(after) = rest.strip_prefix("struct") {
        let after = after.trim();
        state.enter_struct(name);
        if after == "{" {
            state.enter_block(BlockMode::Struct, state.depth_before);
            return Ok(Translated::Line(class_opener(name, &[])));
        }

        // one line: `type T struct{}` or `type T struct{ X int; Y int }`
        let inner = after.strip_prefix('{').and_then(|a| a.strip_suffix('}')).ok_or_else(unrecognized)?;
        let mut members = Vec::new();
        for field in inner.split(';').map(str::trim).filter(|f| !f.is_empty()) {
            if let Some(line) = process_struct_field(field, state)?.render() {
                members.push(format!("    {}", line));
            }
        }
        let bases = state.current_struct.as_ref().map(|c| c.bases.clone()).unwrap_or_default();
        let mut out = vec![class_opener(name, &bases)];
        out.extend(members);
        out.push(process_struct_close(state));
        return Ok(Translated::Line(out.join("\n")));
    }

    if rest.starts_with("interface") {
        state.notice(format!("interfaces are not supported, `{}` dropped", name));
        if rest.ends_with('{') {
            state.enter_block(BlockMode::Interface, state.depth_before);
        }
        return Ok(Translated::Dropped);
    }

    let target = rest.strip_prefix('=').unwrap_or(rest).trim();
    if target.is_empty() {
        return Err(unrecognized());
    }
    Ok(Translated::Statement(format!("using {} = {}", name, map_type(target))))
}

//===========================================================================
// STRUCT FIELDS
//===========================================================================

/// Drop a field tag: `` Name string `json:"name"` `` (the backtick literal
/// is already `R"(...)"` here).
fn strip_tag(field: &str) -> &str {
    let cut = match field.find('"') {
        Some(pos) if field[..pos].ends_with('R') => pos - 1,
        Some(pos) => pos,
        None => field.len(),
    };
    let cut = field.find('`').map_or(cut, |b| b.min(cut));
    field[..cut].trim()
}

/// Process one line inside a struct body
pub fn process_struct_field(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let field = strip_tag(trimmed);
    if field.is_empty() {
        return Ok(Translated::Dropped);
    }

    let (names, go_type) = split_names_and_type(field);

    let Some(go_type) = go_type else {
        // embedded type
        if field.starts_with('*') {
            state.notice(format!("embedded pointer `{}` is not supported, dropped", field));
            return Ok(Translated::Dropped);
        }
        let Some(ctx) = state.current_struct.as_mut() else {
            return Err(StructuralError::MalformedStatement { kind: "struct field", text: trimmed.to_string() });
        };
        ctx.bases.push(field.to_string());
        ctx.fields.push(format!("static_cast<const {}&>(*this)", field));
        return Ok(Translated::Dropped);
    };
    check_names(&names, "field", trimmed)?;

    let cpp_type = map_type(&go_type);
    if is_map_type(&go_type) {
        for name in &names {
            state.register_map(name);
        }
    }
    let Some(ctx) = state.current_struct.as_mut() else {
        return Err(StructuralError::MalformedStatement { kind: "struct field", text: trimmed.to_string() });
    };
    ctx.fields.extend(names.iter().cloned());

    let lines: Vec<String> = names.iter().map(|n| format!("{} {}{{}};", cpp_type, n)).collect();
    Ok(Translated::Line(lines.join("\n")))
}

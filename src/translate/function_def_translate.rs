//! Function Definition Translation
//!
//! ```text
//! func add(a, b int) int {          auto add(int a, int b) -> int {
//! func divmod(a, b int) (int, int) {  auto divmod(int a, int b) -> std::tuple<int, int> {
//! func main() {                     auto main() -> int {
//! f := func(x int) int {            auto f = [&](int x) -> int {
//! ```
//!
//! `main` always returns `int`; the engine appends `return 0;` before the
//! brace that closes its body. Every other function also gets a forward
//! declaration so source order does not matter.

use crate::helpers::{ensure_terminator, find_matching, find_top_level, AssignKind};
use crate::lowering::{FunctionContext, TranslationState};
use crate::modes::ClosureKind;
use crate::translate::{TranslateResult, Translated};
use crate::type_map::{
    is_map_type, map_type, parse_name_type_list, parse_result_types, return_type_for, NameAndType,
};

/// A parsed `func name(params) results` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<NameAndType>,
    /// Go result types in declared order.
    pub results: Vec<String>,
}

/// Parse a signature. Missing or unparseable segments count as absent.
pub fn parse_signature(trimmed: &str) -> FunctionSignature {
    let rest = trimmed.strip_prefix("func").unwrap_or(trimmed).trim_start();
    let Some(open) = rest.find('(') else {
        let name = rest.trim_end_matches('{').trim().to_string();
        return FunctionSignature { name, params: Vec::new(), results: Vec::new() };
    };

    let name = rest[..open].trim().to_string();
    let (params, results) = parse_params_and_results(&rest[open..]);
    FunctionSignature { name, params, results }
}

/// `(a int, b string) (int, error) {` -> parameters and result types.
fn parse_params_and_results(text: &str) -> (Vec<NameAndType>, Vec<String>) {
    match find_matching(text, 0) {
        Some(close) => {
            let rest = &text[close + 1..];
            let results = match find_top_level(rest, '{') {
                Some(body) => &rest[..body],
                None => rest,
            };
            (parse_name_type_list(&text[1..close]), parse_result_types(results))
        }
        None => (Vec::new(), Vec::new()),
    }
}

fn param_list(params: &[NameAndType]) -> String {
    params.iter().map(NameAndType::to_cpp).collect::<Vec<_>>().join(", ")
}

/// Process a `func name(...) ... {` line
pub fn process_function_def(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let sig = parse_signature(trimmed);

    for p in sig.params.iter().filter(|p| is_map_type(&p.go_type)) {
        state.register_map(&p.name);
    }

    let is_main = sig.name == "main";
    let return_type = if is_main { "int".to_string() } else { return_type_for(&sig.results) };
    let header = format!("auto {}({}) -> {}", sig.name, param_list(&sig.params), return_type);

    if !is_main {
        state.prototypes.push(format!("{};", header));
    }

    state.enter_function(FunctionContext {
        name: sig.name,
        tuple_types: sig.results.iter().map(|t| map_type(t)).collect(),
        depth: state.depth_before,
    });

    if trimmed.ends_with('{') {
        Ok(Translated::Line(format!("{} {{", header)))
    } else {
        Ok(Translated::Statement(header))
    }
}

/// `f := func(x int) int {` -> `auto f = [&](int x) -> int {`
///
/// Multi-line bodies push a lambda closure frame so the closing `}` becomes `};`.
pub fn process_function_literal(
    lhs: &str,
    kind: AssignKind,
    rhs: &str,
    state: &mut TranslationState,
) -> TranslateResult {
    let (params, results) = parse_params_and_results(rhs.trim_start_matches("func").trim_start());
    for p in params.iter().filter(|p| is_map_type(&p.go_type)) {
        state.register_map(&p.name);
    }

    // lambdas at namespace scope may not have a capture-default
    let capture = if state.current_fn.is_some() { "[&]" } else { "[]" };
    let target = match kind {
        AssignKind::Define => format!("auto {}", lhs),
        AssignKind::Assign => lhs.to_string(),
    };
    let head = format!(
        "{} = {}({}) -> {}",
        target,
        capture,
        param_list(&params),
        return_type_for(&results)
    );

    if rhs.ends_with('{') {
        state.closures.enter(ClosureKind::Lambda, state.depth_before);
        return Ok(Translated::Line(format!("{} {{", head)));
    }

    // single line: `func(x int) int { return x * 2 }`
    let body = match (rhs.find('{'), rhs.rfind('}')) {
        (Some(open), Some(close)) if open < close => rhs[open + 1..close].trim(),
        _ => "",
    };
    let stmts: Vec<String> = body
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ensure_terminator)
        .collect();
    Ok(Translated::Line(format!("{} {{ {} }};", head, stmts.join(" "))))
}

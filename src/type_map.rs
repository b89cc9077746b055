//! Go type spelling -> C++ type spelling.
//!
//! A fixed primitive table plus the structural spellings:
//! ```text
//! *T          -> T*
//! []T, ...T   -> std::vector<T>
//! [N]T        -> std::array<T, N>
//! map[K]V     -> std::unordered_map<K, V>
//! func(A) R   -> std::function<R(A)>
//! ```

use crate::helpers::{find_matching, find_top_level, is_identifier, split_top_level};

const PRIMITIVES: &[(&str, &str)] = &[
    ("string", "std::string"),
    ("float64", "double"),
    ("float32", "float"),
    ("int64", "std::int64_t"),
    ("int32", "std::int32_t"),
    ("int16", "std::int16_t"),
    ("int8", "std::int8_t"),
    ("uint64", "std::uint64_t"),
    ("uint32", "std::uint32_t"),
    ("uint16", "std::uint16_t"),
    ("uint8", "std::uint8_t"),
    ("byte", "std::uint8_t"),
    ("rune", "std::int32_t"),
    ("uint", "unsigned int"),
    ("uintptr", "std::uintptr_t"),
];

/// Map one Go type to its C++ spelling. Unknown names (user types, `int`,
/// `bool`) are returned unchanged.
pub fn map_type(go_type: &str) -> String {
    let t = go_type.trim();

    if let Some(inner) = t.strip_prefix('*') {
        return format!("{}*", map_type(inner));
    }
    if let Some(inner) = t.strip_prefix("[]").or_else(|| t.strip_prefix("...")) {
        return format!("std::vector<{}>", map_type(inner));
    }
    if let Some((key, value)) = split_map_type(t) {
        return format!("std::unordered_map<{}, {}>", map_type(key), map_type(value));
    }
    if let Some(params) = t.strip_prefix("func") {
        if params.starts_with('(') {
            if let Some(close) = find_matching(params, 0) {
                let args: Vec<String> = parse_name_type_list(&params[1..close])
                    .iter()
                    .map(|p| map_type(&p.go_type))
                    .collect();
                let results = parse_result_types(&params[close + 1..]);
                return format!("std::function<{}({})>", return_type_for(&results), args.join(", "));
            }
        }
    }
    if t.starts_with('[') {
        if let Some(close) = find_matching(t, 0) {
            let len = t[1..close].trim();
            return format!("std::array<{}, {}>", map_type(&t[close + 1..]), len);
        }
    }

    PRIMITIVES
        .iter()
        .find(|(go, _)| *go == t)
        .map(|(_, cpp)| cpp.to_string())
        .unwrap_or_else(|| t.to_string())
}

pub fn is_map_type(go_type: &str) -> bool {
    go_type.trim_start().starts_with("map[")
}

pub fn is_slice_type(go_type: &str) -> bool {
    go_type.trim_start().starts_with("[]")
}

/// `map[K]V` -> `(K, V)`.
pub fn split_map_type(go_type: &str) -> Option<(&str, &str)> {
    let t = go_type.trim();
    if !t.starts_with("map[") {
        return None;
    }
    let close = find_matching(t, 3)?;
    let value = t[close + 1..].trim();
    if value.is_empty() {
        return None;
    }
    Some((&t[4..close], value))
}

/// C++ return type for a list of Go result types.
pub fn return_type_for(results: &[String]) -> String {
    match results {
        [] => "void".to_string(),
        [single] => map_type(single),
        many => {
            let types: Vec<String> = many.iter().map(|t| map_type(t)).collect();
            format!("std::tuple<{}>", types.join(", "))
        }
    }
}

//===========================================================================
// NAME / TYPE LISTS
// Go writes `name type`, C++ wants `type name`. Consecutive names may share
// one trailing type: `a, b int, s string`.
//===========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAndType {
    /// Empty for unnamed parameters and results.
    pub name: String,
    pub go_type: String,
}

impl NameAndType {
    /// `std::string name`
    pub fn to_cpp(&self) -> String {
        let cpp = map_type(&self.go_type);
        if self.name.is_empty() {
            cpp
        } else {
            format!("{} {}", cpp, self.name)
        }
    }
}

/// Parse a parameter (or named result) list without its parentheses.
pub fn parse_name_type_list(list: &str) -> Vec<NameAndType> {
    let mut out = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for part in split_top_level(list, ',') {
        match part.split_once(char::is_whitespace) {
            Some((name, go_type)) if is_identifier(name) => {
                for p in pending.drain(..) {
                    out.push(NameAndType { name: p, go_type: go_type.trim().to_string() });
                }
                out.push(NameAndType { name: name.to_string(), go_type: go_type.trim().to_string() });
            }
            _ => pending.push(part),
        }
    }

    // only bare types: `func(int, string)`
    out.extend(pending.into_iter().map(|t| NameAndType { name: String::new(), go_type: t }));
    out
}

/// Result types from the text following a parameter list, e.g.
/// ` (int, error) {` or ` string {` or ` {`.
pub fn parse_result_types(rest: &str) -> Vec<String> {
    let rest = rest.trim();
    let rest = rest.strip_suffix('{').unwrap_or(rest).trim();
    if rest.is_empty() {
        return Vec::new();
    }
    if rest.starts_with('(') {
        if let Some(close) = find_matching(rest, 0) {
            return parse_name_type_list(&rest[1..close])
                .into_iter()
                .map(|r| r.go_type)
                .collect();
        }
    }
    vec![rest.to_string()]
}

/// A `Type{elements}` expression, possibly left open at the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeLiteral<'a> {
    pub type_name: &'a str,
    pub elements: &'a str,
    pub closed: bool,
}

/// Split `map[string]int{"a": 1}` into its type and its element text.
/// Returns `None` when anything follows the closing brace.
pub fn split_composite_literal(expr: &str) -> Option<CompositeLiteral<'_>> {
    let expr = expr.trim();
    let open = find_top_level(expr, '{')?;
    let type_name = expr[..open].trim();
    if type_name.is_empty() {
        return None;
    }

    match find_matching(expr, open) {
        Some(close) if close == expr.len() - 1 => Some(CompositeLiteral {
            type_name,
            elements: expr[open + 1..close].trim(),
            closed: true,
        }),
        Some(_) => None,
        None => Some(CompositeLiteral {
            type_name,
            elements: expr[open + 1..].trim(),
            closed: false,
        }),
    }
}

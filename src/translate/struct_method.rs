//! Struct stringification
//!
//! Every translated struct gets a `_str()` method printing its fields the
//! way Go's `%v` does: `{1.2 3.4 Bob}`. Fields go through `_format_output`,
//! so nested structs, containers and pointers print uniformly.

use crate::lowering::TranslationState;

/// `class T { public:`, or with embedded types as public bases.
pub fn class_opener(name: &str, bases: &[String]) -> String {
    if bases.is_empty() {
        return format!("class {} {{ public:", name);
    }
    let bases: Vec<String> = bases.iter().map(|b| format!("public {}", b)).collect();
    format!("class {} : {} {{ public:", name, bases.join(", "))
}

const INDENT: &str = "    ";

/// The `_str()` member for the given field expressions, in order. Indented
/// one level as a member; the caller adds the struct's own indent.
pub fn synthesize_str_method(fields: &[String]) -> String {
    let mut body = vec!["std::stringstream ss;".to_string(), "ss << \"{\";".to_string()];
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            body.push("ss << \" \";".to_string());
        }
        body.push(format!("_format_output(ss, {});", field));
    }
    body.push("ss << \"}\";".to_string());
    body.push("return ss.str();".to_string());

    let mut lines = vec![format!("{}std::string _str() const {{", INDENT)];
    lines.extend(body.iter().map(|l| format!("{}{}{}", INDENT, INDENT, l)));
    lines.push(format!("{}}}", INDENT));
    lines.join("\n")
}

/// Close the open struct body: its `_str()` followed by `};`.
pub fn process_struct_close(state: &mut TranslationState) -> String {
    match state.take_struct() {
        Some(ctx) => format!("{}\n}};", synthesize_str_method(&ctx.fields)),
        None => "};".to_string(),
    }
}

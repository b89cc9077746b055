//! Statement classification
//!
//! Every comment-stripped line gets exactly one [`StatementKind`]. The open
//! block (see [`crate::modes`]) is consulted first: inside `var ( ... )` a
//! line is a var entry whatever it looks like, inside a struct body it is a
//! field. Only outside every block does the line's own shape decide.

use crate::helpers::{contains_identifier, mask_literals, split_assignment};
use crate::lowering::TranslationState;
use crate::modes::BlockMode;
use crate::type_map::{is_map_type, split_composite_literal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Blank,
    Comment,
    /// Line inside a raw string or block comment.
    Verbatim,
    PackageClause,
    /// Single-line `import "fmt"`.
    ImportSpec,
    ImportEntry,
    BlockOpen(BlockMode),
    BlockClose(BlockMode),
    FunctionSignature,
    ForLoop,
    Switch,
    Case,
    Default,
    Fallthrough,
    Return,
    Print,
    Defer,
    /// `}` ending a multi-line deferred closure or function literal.
    ClosureEnd,
    If,
    ElseIf,
    VarDeclaration,
    ConstDeclaration,
    TypeDeclaration,
    StructField,
    /// Method list of an unsupported interface declaration.
    InterfaceMember,
    MapLiteralOpen,
    MapLiteralEntry,
    CompositeLiteralEntry,
    Assignment,
    /// Recognized construct with no C++ lowering; passed through with a notice.
    Unsupported(&'static str),
    /// Anything else: passed through with the terminator rule.
    Expression,
}

/// Classify one trimmed, comment-stripped line. The brace depth in `state`
/// already includes this line.
pub fn classify(trimmed: &str, state: &TranslationState) -> StatementKind {
    if trimmed.is_empty() {
        return StatementKind::Blank;
    }

    if let Some(mode) = state.blocks.current() {
        if mode.is_verbatim() {
            return StatementKind::Verbatim;
        }
        if trimmed.starts_with("//") {
            return StatementKind::Comment;
        }
        if state.blocks.closes(trimmed, state.brace_depth) {
            return StatementKind::BlockClose(mode);
        }
        return match mode {
            BlockMode::Import => StatementKind::ImportEntry,
            BlockMode::Var => StatementKind::VarDeclaration,
            BlockMode::Const => StatementKind::ConstDeclaration,
            BlockMode::Type => StatementKind::TypeDeclaration,
            BlockMode::Struct => StatementKind::StructField,
            BlockMode::Interface => StatementKind::InterfaceMember,
            BlockMode::MapLiteral => StatementKind::MapLiteralEntry,
            BlockMode::CompositeLiteral => StatementKind::CompositeLiteralEntry,
            BlockMode::RawString | BlockMode::BlockComment => StatementKind::Verbatim,
        };
    }

    if trimmed.starts_with("//") {
        return StatementKind::Comment;
    }
    if state.closures.closes_at(trimmed, state.brace_depth) {
        return StatementKind::ClosureEnd;
    }
    classify_code(trimmed)
}

/// Shape-based classification outside every block. Also used for the
/// statements inside a single-line deferred closure.
pub fn classify_code(trimmed: &str) -> StatementKind {
    let first_word = trimmed
        .split(|c: char| c.is_whitespace() || c == '(' || c == '{')
        .next()
        .unwrap_or("");

    if let Some(mode) = BlockMode::group_opener(trimmed) {
        return StatementKind::BlockOpen(mode);
    }

    match first_word {
        "package" => return StatementKind::PackageClause,
        "import" => return StatementKind::ImportSpec,
        "func" if trimmed.starts_with("func (") => {
            return StatementKind::Unsupported("methods with receivers");
        }
        "func" => return StatementKind::FunctionSignature,
        "for" => return StatementKind::ForLoop,
        "switch" => return StatementKind::Switch,
        "case" => return StatementKind::Case,
        "default:" => return StatementKind::Default,
        "fallthrough" => return StatementKind::Fallthrough,
        "return" => return StatementKind::Return,
        "defer" => return StatementKind::Defer,
        "if" => return StatementKind::If,
        "var" => return classify_var(trimmed),
        "const" => return StatementKind::ConstDeclaration,
        "type" => return StatementKind::TypeDeclaration,
        "go" => return StatementKind::Unsupported("goroutines"),
        "select" => return StatementKind::Unsupported("select statements"),
        "break" | "continue" if trimmed.split_whitespace().count() > 1 => {
            return StatementKind::Unsupported("labeled break/continue");
        }
        _ => {}
    }

    if trimmed.starts_with("} else if ") {
        return StatementKind::ElseIf;
    }
    if is_print_call(trimmed) {
        return StatementKind::Print;
    }

    let code = mask_literals(trimmed);
    if code.contains("<-") || contains_identifier(&code, "chan") {
        return StatementKind::Unsupported("channel operations");
    }

    if let Some(parts) = split_assignment(trimmed) {
        if opens_map_literal(parts.rhs) {
            return StatementKind::MapLiteralOpen;
        }
        return StatementKind::Assignment;
    }

    StatementKind::Expression
}

fn classify_var(trimmed: &str) -> StatementKind {
    match split_assignment(trimmed) {
        Some(parts) if opens_map_literal(parts.rhs) => StatementKind::MapLiteralOpen,
        _ => StatementKind::VarDeclaration,
    }
}

/// `map[K]V{` with the closing brace on a later line.
fn opens_map_literal(rhs: &str) -> bool {
    split_composite_literal(rhs).is_some_and(|lit| !lit.closed && is_map_type(lit.type_name))
}

fn is_print_call(trimmed: &str) -> bool {
    ["fmt.Print", "fmt.Fprint", "print(", "println("]
        .iter()
        .any(|p| trimmed.starts_with(p))
}

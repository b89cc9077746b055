//! Translation Module
//!
//! One translator per Go statement kind. Each takes the trimmed,
//! comment-stripped line plus the translation state and returns the C++
//! text for that line.

// Definitions
pub mod function_def_translate;
pub mod declaration_translate;
pub mod struct_method;

// Control flow
pub mod control_flow_translate;
pub mod for_loop_translate;
pub mod switch_translate;
pub mod defer_translate;

// Statements and expressions
pub mod assignment_translate;
pub mod print_translate;

use crate::error::StructuralError;
use crate::helpers::ensure_terminator;
use crate::lowering::TranslationState;
use crate::modes::BlockMode;
use crate::statement::{classify_code, StatementKind};

/// What a translator produced for one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translated {
    /// Finished C++ (possibly several lines), emitted as is.
    Line(String),
    /// A single statement that still goes through the terminator rule.
    Statement(String),
    /// The source line has no C++ counterpart.
    Dropped,
}

impl Translated {
    /// Rendered text, terminator applied. `None` when dropped.
    pub fn render(self) -> Option<String> {
        match self {
            Translated::Line(s) => Some(s),
            Translated::Statement(s) => Some(ensure_terminator(&s)),
            Translated::Dropped => None,
        }
    }
}

pub type TranslateResult = Result<Translated, StructuralError>;

/// Dispatch one classified line to its translator.
pub fn translate_line(kind: StatementKind, trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    match kind {
        StatementKind::Blank => Ok(Translated::Line(String::new())),
        StatementKind::Comment | StatementKind::Verbatim => Ok(Translated::Line(trimmed.to_string())),
        StatementKind::PackageClause
        | StatementKind::ImportSpec
        | StatementKind::ImportEntry
        | StatementKind::InterfaceMember => Ok(Translated::Dropped),
        StatementKind::BlockOpen(mode) => {
            state.enter_block(mode, state.depth_before);
            Ok(Translated::Dropped)
        }
        StatementKind::BlockClose(mode) => close_block(mode, trimmed, state),

        StatementKind::FunctionSignature => function_def_translate::process_function_def(trimmed, state),
        StatementKind::ForLoop => for_loop_translate::process_for_loop(trimmed, state),
        StatementKind::Switch => switch_translate::process_switch(trimmed, state),
        StatementKind::Case => switch_translate::process_case(trimmed, state),
        StatementKind::Default => Ok(switch_translate::process_default(state)),
        StatementKind::Fallthrough => Ok(switch_translate::process_fallthrough(state)),
        StatementKind::Return => control_flow_translate::process_return(trimmed, state),
        StatementKind::Print => print_translate::process_print(trimmed, state),
        StatementKind::Defer => defer_translate::process_defer(trimmed, state),
        StatementKind::ClosureEnd => Ok(defer_translate::process_closure_end(trimmed, state)),
        StatementKind::If => control_flow_translate::process_if(trimmed, state),
        StatementKind::ElseIf => control_flow_translate::process_else_if(trimmed, state),

        StatementKind::VarDeclaration => declaration_translate::process_var(trimmed, state),
        StatementKind::ConstDeclaration => declaration_translate::process_const(trimmed, state),
        StatementKind::TypeDeclaration => declaration_translate::process_type(trimmed, state),
        StatementKind::StructField => declaration_translate::process_struct_field(trimmed, state),

        StatementKind::MapLiteralOpen => assignment_translate::process_map_literal_open(trimmed, state),
        StatementKind::MapLiteralEntry => assignment_translate::process_map_literal_entry(trimmed, state),
        StatementKind::CompositeLiteralEntry => Ok(assignment_translate::process_composite_entry(trimmed)),
        StatementKind::Assignment => assignment_translate::process_assignment(trimmed, state),

        StatementKind::Unsupported(what) => {
            state.notice(format!("{} are not supported, passed through: `{}`", what, trimmed));
            Ok(Translated::Statement(trimmed.to_string()))
        }
        StatementKind::Expression => Ok(assignment_translate::process_expression(trimmed)),
    }
}

fn close_block(mode: BlockMode, trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    state.exit_block();
    match mode {
        BlockMode::Struct => Ok(Translated::Line(struct_method::process_struct_close(state))),
        BlockMode::MapLiteral => {
            state.map_literal_value = None;
            Ok(Translated::Line(format!("{};", trimmed)))
        }
        BlockMode::CompositeLiteral => Ok(Translated::Line(format!("{};", trimmed))),
        _ => Ok(Translated::Dropped),
    }
}

/// Translate one statement outside the line machinery, e.g. a statement
/// inside a single-line deferred closure. Returns terminated C++.
pub fn translate_simple(stmt: &str, state: &mut TranslationState) -> Result<String, StructuralError> {
    let stmt = stmt.trim();
    let kind = classify_code(stmt);
    let translated = match kind {
        StatementKind::Print
        | StatementKind::Assignment
        | StatementKind::Expression
        | StatementKind::Unsupported(_) => translate_line(kind, stmt, state)?,
        // returns inside a closure leave the closure, not the function
        StatementKind::Return => Translated::Statement(stmt.to_string()),
        _ => {
            state.notice(format!("statement not supported inside a closure: `{}`", stmt));
            Translated::Statement(stmt.to_string())
        }
    };
    Ok(translated.render().unwrap_or_default())
}

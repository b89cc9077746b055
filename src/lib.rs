//! go2cpp: line-oriented Go to C++17 translator
//!
//! The input is read line by line. Each line is classified against the
//! open block context, handed to one construct translator and re-indented.
//! Once the whole file has been seen, function prototypes are placed and
//! the whole-program passes (string literal suffixes, symbol substitutions,
//! helper shims, includes) run over the buffer.

// Core modules
pub mod error;
pub mod helpers;
pub mod modes;
pub mod naming;
pub mod type_map;
pub mod statement;

// Modularized translator components
pub mod lowering;
pub mod translate;
pub mod postprocess;
pub mod postprocess_output;

// External tools
pub mod driver;

mod tests;

pub use error::{DriverError, Notice, StructuralError, TranslateError};
pub use lowering::TranslationState;
pub use statement::{classify, StatementKind};

use tracing::{debug, trace};

use helpers::{leading_whitespace, strip_inline_comment};
use lowering::{close_raw_string, convert_raw_strings, update_brace_depth};
use modes::BlockMode;
use postprocess_output::{apply_postprocessing, ProgramFlags};
use translate::struct_method::class_opener;
use translate::translate_line;

/// Result of one translation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// The complete C++ program.
    pub cpp: String,
    /// Lines passed through best-effort, in source order.
    pub notices: Vec<Notice>,
}

/// A multi-line raw string being joined into one logical line
struct PendingRawString {
    text: String,
    line_number: usize,
    indent: String,
}

/// Translate Go source into a C++17 program.
pub fn go2cpp(source: &str) -> Result<String, TranslateError> {
    translate(source).map(|t| t.cpp)
}

/// Translate Go source, keeping the notices for lines that were passed
/// through best-effort.
pub fn translate(source: &str) -> Result<Translation, TranslateError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut state = TranslationState::new();
    let mut output: Vec<String> = Vec::new();
    let mut pending_raw: Option<PendingRawString> = None;

    for (i, line) in source.lines().enumerate() {
        let line_number = i + 1;

        //======================================================================
        // Multi-line raw string: join until the closing backtick, then
        // translate the whole statement as one line.
        //======================================================================
        if let Some(raw) = pending_raw.as_mut() {
            raw.text.push('\n');
            match close_raw_string(line) {
                None => {
                    raw.text.push_str(line);
                    continue;
                }
                Some(closed) => {
                    raw.text.push_str(&closed.line);
                    if closed.opened {
                        continue;
                    }
                }
            }
            if let Some(raw) = pending_raw.take() {
                state.exit_block();
                state.line_number = raw.line_number;
                process_line(&raw.indent, &raw.text, true, &mut state, &mut output)?;
            }
            continue;
        }

        state.line_number = line_number;

        if state.blocks.current() == Some(BlockMode::BlockComment) {
            output.push(line.to_string());
            if line.contains("*/") {
                state.exit_block();
            }
            continue;
        }

        let indent = leading_whitespace(line);
        let trimmed = line.trim();

        if trimmed.starts_with("/*") && !trimmed.contains("*/") {
            state.enter_block(BlockMode::BlockComment, state.brace_depth);
            output.push(line.to_string());
            continue;
        }
        if trimmed.starts_with("//") || (trimmed.starts_with("/*") && trimmed.ends_with("*/")) {
            output.push(line.trim_end().to_string());
            continue;
        }

        let converted = convert_raw_strings(trimmed);
        if converted.opened {
            state.enter_block(BlockMode::RawString, state.brace_depth);
            pending_raw = Some(PendingRawString {
                text: converted.line,
                line_number,
                indent: indent.to_string(),
            });
            continue;
        }

        process_line(indent, &converted.line, false, &mut state, &mut output)?;
    }

    if let Some(raw) = pending_raw.take() {
        state.exit_block();
        state.line_number = raw.line_number;
        state.notice("raw string not closed before end of input");
        process_line(&raw.indent, &raw.text, true, &mut state, &mut output)?;
    }
    while let Some(mode) = state.exit_block() {
        state.notice(format!("{:?} block not closed before end of input", mode));
    }

    //==========================================================================
    // Prototypes go right before the first function definition.
    //==========================================================================
    if !state.prototypes.is_empty() {
        let at = state.first_function_line.unwrap_or(output.len()).min(output.len());
        let mut block = std::mem::take(&mut state.prototypes);
        block.push(String::new());
        output.splice(at..at, block);
    }

    debug!(lines = output.len(), notices = state.notices.len(), "translation finished");
    let flags = ProgramFlags {
        needs_pretty_print: state.needs_pretty_print,
        has_aggregates: state.has_aggregates,
    };
    Ok(Translation { cpp: apply_postprocessing(output, flags), notices: state.notices })
}

/// Translate one logical line and append the result to `output`.
fn process_line(
    indent: &str,
    text: &str,
    spans_lines: bool,
    state: &mut TranslationState,
    output: &mut Vec<String>,
) -> Result<(), TranslateError> {
    let (code, comment) = strip_inline_comment(text);
    let code = code.trim();
    let code = code.strip_suffix(';').unwrap_or(code).trim_end();

    if code.is_empty() {
        output.push(comment.map(|c| format!("{}{}", indent, c)).unwrap_or_default());
        return Ok(());
    }

    state.depth_before = state.brace_depth;
    update_brace_depth(&mut state.brace_depth, code);

    let kind = classify(code, state);
    trace!(line = state.line_number, ?kind, depth = state.brace_depth, "classified");

    // the struct opener is rewritten once embedded types are known
    let closing_struct = match kind {
        StatementKind::BlockClose(BlockMode::Struct) => state
            .current_struct
            .as_ref()
            .map(|s| (s.name.clone(), s.bases.clone(), s.opener_index)),
        _ => None,
    };
    if kind == StatementKind::FunctionSignature && state.first_function_line.is_none() {
        state.first_function_line = Some(output.len());
    }

    let translated = translate_line(kind, code, state).map_err(|source| TranslateError::Structural {
        line: state.line_number,
        source,
    })?;
    let mut rendered = translated.render();

    if kind == StatementKind::Expression && code.starts_with('}') {
        rendered = close_brace(code, rendered, state);
    }

    if let Some(ctx) = state.current_struct.as_mut().filter(|s| s.opener_index.is_none()) {
        ctx.opener_index = Some(output.len());
    }
    if let Some((name, bases, Some(index))) = closing_struct {
        if !bases.is_empty() {
            if let Some(opener) = output.get_mut(index) {
                *opener = format!("{}{}", leading_whitespace(opener), class_opener(&name, &bases));
            }
        }
    }

    match (rendered, comment) {
        (Some(text), comment) => {
            let mut lines: Vec<String> = if spans_lines {
                vec![format!("{}{}", indent, text)]
            } else {
                text.lines().map(|l| format!("{}{}", indent, l)).collect()
            };
            if let (Some(comment), Some(last)) = (comment, lines.last_mut()) {
                last.push(' ');
                last.push_str(&comment);
            }
            output.extend(lines);
        }
        (None, Some(comment)) => output.push(format!("{}{}", indent, comment)),
        (None, None) => {}
    }
    Ok(())
}

/// A plain `}` may end a switch or a function body.
fn close_brace(code: &str, rendered: Option<String>, state: &mut TranslationState) -> Option<String> {
    if let Some(frame) = state.switches.exit_at(state.brace_depth) {
        // no case ever opened an `if`, so there is nothing to close
        if frame.first_case {
            return None;
        }
    }
    if state.should_exit_function(code) {
        if let Some(f) = state.exit_function() {
            if f.is_main() {
                return rendered.map(|r| format!("return 0;\n{}", r));
            }
        }
    }
    rendered
}

//! Switch Translation
//!
//! A Go `switch` becomes an `if`/`else if` chain over a discriminant bound
//! once before the chain:
//!
//! ```text
//! switch n {              auto _s__0 = n;
//! case 1, 2:              if (_s__0 == 1 || _s__0 == 2) {
//!     fallthrough             goto _l__0;
//! case 3:                 } else if (_s__0 == 3) {
//!                         _l__0:;
//! default:                } else {
//! }                       }
//! ```
//!
//! The `switch` line itself opens no C++ block, so the brace that closes it
//! closes the last branch instead. A switch with no cases at all drops that
//! brace (the engine checks `first_case` on exit).

use crate::error::StructuralError;
use crate::helpers::{find_top_level, split_top_level};
use crate::lowering::TranslationState;
use crate::translate::assignment_translate::translate_init;
use crate::translate::{TranslateResult, Translated};

/// Process a `switch [init;] [tag] {` line
pub fn process_switch(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let head = trimmed.strip_prefix("switch").unwrap_or(trimmed).trim();
    let head = head.strip_suffix('{').unwrap_or(head).trim();

    let (init, tag) = match find_top_level(head, ';') {
        Some(pos) => (Some(head[..pos].trim()), head[pos + 1..].trim()),
        None => (None, head),
    };

    let mut out = Vec::new();
    if let Some(init) = init.filter(|i| !i.is_empty()) {
        out.push(format!("{};", translate_init(init, state)?));
    }

    if tag.contains(".(type)") {
        state.notice(format!("type switches are not supported: `{}`", trimmed));
    }

    if tag.is_empty() {
        state.switches.enter(None, state.depth_before);
    } else {
        let discriminant = state.names.next_switch();
        out.push(format!("auto {} = {};", discriminant, tag));
        state.switches.enter(Some(discriminant), state.depth_before);
    }

    if out.is_empty() {
        Ok(Translated::Dropped)
    } else {
        Ok(Translated::Line(out.join("\n")))
    }
}

/// Process a `case a, b:` line
pub fn process_case(trimmed: &str, state: &mut TranslationState) -> TranslateResult {
    let values = trimmed.strip_prefix("case").unwrap_or(trimmed).trim();
    let values = values.strip_suffix(':').unwrap_or(values).trim();
    let values = split_top_level(values, ',');

    let Some(frame) = state.switches.current_mut() else {
        return Err(StructuralError::MalformedStatement {
            kind: "case outside switch",
            text: trimmed.to_string(),
        });
    };
    if values.is_empty() {
        return Err(StructuralError::MalformedStatement { kind: "case", text: trimmed.to_string() });
    }

    let condition = match &frame.discriminant {
        Some(d) => values
            .iter()
            .map(|v| format!("{} == {}", d, v))
            .collect::<Vec<_>>()
            .join(" || "),
        None if values.len() == 1 => values[0].clone(),
        None => values
            .iter()
            .map(|v| format!("({})", v))
            .collect::<Vec<_>>()
            .join(" || "),
    };

    let header = if frame.first_case {
        frame.first_case = false;
        format!("if ({}) {{", condition)
    } else {
        format!("}} else if ({}) {{", condition)
    };

    Ok(Translated::Line(with_pending_label(header, state)))
}

/// Process `default:`
pub fn process_default(state: &mut TranslationState) -> Translated {
    let header = match state.switches.current_mut() {
        Some(frame) if frame.first_case => {
            frame.first_case = false;
            state.notice("`default:` before any case always runs");
            "if (true) {".to_string()
        }
        Some(_) => "} else {".to_string(),
        None => {
            state.notice("`default:` outside a switch");
            return Translated::Line("default:".to_string());
        }
    };
    Translated::Line(with_pending_label(header, state))
}

/// Process `fallthrough`: jump into the next case's body.
pub fn process_fallthrough(state: &mut TranslationState) -> Translated {
    let label = state.names.next_label();
    let jump = format!("goto {};", label);
    state.pending_label = Some(label);
    Translated::Line(jump)
}

/// The label lands right after the header so the jump skips the condition.
fn with_pending_label(header: String, state: &mut TranslationState) -> String {
    match state.pending_label.take() {
        Some(label) => format!("{}\n{}:;", header, label),
        None => header,
    }
}

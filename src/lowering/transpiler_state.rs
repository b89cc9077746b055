//! Translation State Management
//!
//! Contains the `TranslationState` struct which holds all mutable state of
//! one translation run. A fresh state is created per run and dropped at the
//! end; nothing is shared between runs.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::Notice;
use crate::modes::{BlockMode, BlockStack, ClosureStack, SwitchStack};
use crate::naming::NameGenerator;

/// The function whose body is currently open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionContext {
    pub name: String,
    /// Element types when the function returns several values.
    pub tuple_types: Vec<String>,
    /// Brace depth before the signature line.
    pub depth: usize,
}

impl FunctionContext {
    pub fn is_main(&self) -> bool {
        self.name == "main"
    }

    pub fn returns_tuple(&self) -> bool {
        self.tuple_types.len() > 1
    }
}

/// The struct body currently open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructContext {
    pub name: String,
    /// Expressions streamed by the synthesized `_str()`, in field order.
    pub fields: Vec<String>,
    /// Embedded types, emitted as public bases.
    pub bases: Vec<String>,
    /// Index of the `class T { public:` line in the output.
    pub opener_index: Option<usize>,
}

/// The last explicit entry of a `const` group, repeated by bare entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstTemplate {
    pub cpp_type: Option<String>,
    /// One expression per name, `iota` unexpanded.
    pub exprs: Vec<String>,
}

/// `iota` state: the index of the next entry in the current const group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstGroup {
    pub index: usize,
    pub template: Option<ConstTemplate>,
}

impl ConstGroup {
    pub fn reset(&mut self) {
        self.index = 0;
        self.template = None;
    }
}

/// Main state container for the translator
#[derive(Debug, Default)]
pub struct TranslationState {
    /// 1-based number of the line being translated.
    pub line_number: usize,
    pub brace_depth: usize,
    /// Brace depth before the current line was counted.
    pub depth_before: usize,

    // Mode stacks
    pub blocks: BlockStack,
    pub switches: SwitchStack,
    pub closures: ClosureStack,

    pub names: NameGenerator,
    pub current_fn: Option<FunctionContext>,
    /// Label a `fallthrough` jumps to; emitted after the next case header.
    pub pending_label: Option<String>,
    pub const_group: ConstGroup,
    pub known_maps: HashSet<String>,
    pub current_struct: Option<StructContext>,
    /// Go value type of the map literal being filled line by line.
    pub map_literal_value: Option<String>,

    // Whole-program flags
    pub needs_pretty_print: bool,
    pub has_aggregates: bool,

    /// Forward declarations of every non-`main` function.
    pub prototypes: Vec<String>,
    /// Output index of the first function definition.
    pub first_function_line: Option<usize>,
    pub notices: Vec<Notice>,
}

impl TranslationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier as a hash container. Never reverted.
    pub fn register_map(&mut self, name: &str) {
        let name = name.trim();
        if self.known_maps.insert(name.to_string()) {
            debug!(line = self.line_number, map = name, "registered map");
        }
    }

    /// Is `expr` (`m`, `s.m`, `(m)`) a registered map? Field accesses match on
    /// their last segment.
    pub fn is_known_map(&self, expr: &str) -> bool {
        let expr = expr.trim().trim_start_matches('(').trim_end_matches(')').trim();
        let expr = expr.trim_start_matches('*');
        if self.known_maps.contains(expr) {
            return true;
        }
        expr.rsplit('.')
            .next()
            .is_some_and(|last| self.known_maps.contains(last))
    }

    /// Best-effort pass-through: record it and carry on.
    pub fn notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(line = self.line_number, "{}", message);
        self.notices.push(Notice { line: self.line_number, message });
    }

    pub fn enter_block(&mut self, mode: BlockMode, depth: usize) {
        debug!(line = self.line_number, ?mode, depth, "enter block");
        if mode == BlockMode::Const {
            self.const_group.reset();
        }
        self.blocks.enter(mode, depth);
    }

    pub fn exit_block(&mut self) -> Option<BlockMode> {
        let mode = self.blocks.exit();
        debug!(line = self.line_number, ?mode, "exit block");
        mode
    }

    pub fn enter_function(&mut self, ctx: FunctionContext) {
        debug!(line = self.line_number, function = %ctx.name, "enter function");
        self.current_fn = Some(ctx);
    }

    /// A `}` at the function's own depth ends its body.
    pub fn should_exit_function(&self, trimmed: &str) -> bool {
        trimmed.starts_with('}')
            && self
                .current_fn
                .as_ref()
                .is_some_and(|f| f.depth == self.brace_depth)
    }

    pub fn exit_function(&mut self) -> Option<FunctionContext> {
        self.current_fn.take()
    }

    pub fn enter_struct(&mut self, name: &str) {
        self.has_aggregates = true;
        self.current_struct = Some(StructContext { name: name.to_string(), ..Default::default() });
    }

    /// Collected fields are consumed exactly once, when the body closes.
    pub fn take_struct(&mut self) -> Option<StructContext> {
        self.current_struct.take()
    }
}

//! Block-context tracking for the Go -> C++ translator
//!
//! The same text means different things depending on which multi-line
//! construct is open (`Name string` is a struct field inside a struct body
//! and a type alias inside `type ( ... )`). Each construct is a [`BlockMode`]
//! on a [`BlockStack`], consulted before a line is classified.
//!
//! Also here: the switch frame stack and the closure frame stack, which
//! pair a closing `}` with the construct that opened it.

//===========================================================================
// BLOCK MODES
//===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    /// `import ( ... )`
    Import,
    /// `var ( ... )`
    Var,
    /// `const ( ... )`
    Const,
    /// `type ( ... )`
    Type,
    /// `type T struct { ... }`
    Struct,
    /// `type T interface { ... }`, skipped
    Interface,
    /// `m := map[K]V{ ... }` spread over several lines
    MapLiteral,
    /// `xs := []T{ ... }` or `v := T{ ... }` spread over several lines
    CompositeLiteral,
    /// backtick string spanning lines
    RawString,
    /// `/* ... */` spanning lines
    BlockComment,
}

impl BlockMode {
    /// Parenthesised declaration groups close on a line starting with `)`.
    pub fn is_group(self) -> bool {
        matches!(self, BlockMode::Import | BlockMode::Var | BlockMode::Const | BlockMode::Type)
    }

    /// Lines inside these modes are copied through untouched.
    pub fn is_verbatim(self) -> bool {
        matches!(self, BlockMode::RawString | BlockMode::BlockComment)
    }

    /// `import (`, `var (`, `const (`, `type (` -> the group they open.
    pub fn group_opener(trimmed: &str) -> Option<BlockMode> {
        let keyword = trimmed.strip_suffix('(')?.trim_end();
        match keyword {
            "import" => Some(BlockMode::Import),
            "var" => Some(BlockMode::Var),
            "const" => Some(BlockMode::Const),
            "type" => Some(BlockMode::Type),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEntry {
    pub mode: BlockMode,
    /// Brace depth before the opening line.
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BlockStack {
    stack: Vec<BlockEntry>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, mode: BlockMode, depth: usize) {
        self.stack.push(BlockEntry { mode, depth });
    }

    pub fn exit(&mut self) -> Option<BlockMode> {
        self.stack.pop().map(|e| e.mode)
    }

    pub fn current(&self) -> Option<BlockMode> {
        self.stack.last().map(|e| e.mode)
    }

    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Does `trimmed` close the innermost block? `depth` is the brace depth
    /// after the line has been counted.
    pub fn closes(&self, trimmed: &str, depth: usize) -> bool {
        let Some(entry) = self.stack.last() else {
            return false;
        };
        match entry.mode {
            m if m.is_group() => trimmed.starts_with(')'),
            BlockMode::Struct
            | BlockMode::Interface
            | BlockMode::MapLiteral
            | BlockMode::CompositeLiteral => {
                trimmed.starts_with('}') && depth <= entry.depth
            }
            BlockMode::RawString => trimmed.contains('`'),
            BlockMode::BlockComment => trimmed.contains("*/"),
            _ => false,
        }
    }
}

//===========================================================================
// SWITCH FRAMES
// A Go switch becomes a chain of `if`/`else if`. Each open switch keeps its
// own discriminant and first-case flag so nested switches do not interfere.
//===========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchFrame {
    /// `None` for a tagless `switch {`.
    pub discriminant: Option<String>,
    pub first_case: bool,
    /// Brace depth before the `switch` line; the `}` returning here closes it.
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SwitchStack {
    stack: Vec<SwitchFrame>,
}

impl SwitchStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, discriminant: Option<String>, depth: usize) {
        self.stack.push(SwitchFrame { discriminant, first_case: true, depth });
    }

    pub fn current(&self) -> Option<&SwitchFrame> {
        self.stack.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut SwitchFrame> {
        self.stack.last_mut()
    }

    /// Pop the innermost switch when a `}` brings the depth back to its entry.
    pub fn exit_at(&mut self, depth: usize) -> Option<SwitchFrame> {
        if self.stack.last().is_some_and(|f| f.depth == depth) {
            self.stack.pop()
        } else {
            None
        }
    }
}

//===========================================================================
// CLOSURE FRAMES
// Multi-line `defer func() {` and `f := func(...) {` bodies: their closing
// line needs C++ syntax that differs from a plain `}`.
//===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureKind {
    Defer,
    Lambda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureFrame {
    pub kind: ClosureKind,
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ClosureStack {
    stack: Vec<ClosureFrame>,
}

impl ClosureStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, kind: ClosureKind, depth: usize) {
        self.stack.push(ClosureFrame { kind, depth });
    }

    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Whether a line starting with `}` at `depth` ends the innermost closure.
    pub fn closes_at(&self, trimmed: &str, depth: usize) -> bool {
        trimmed.starts_with('}') && self.stack.last().is_some_and(|f| f.depth == depth)
    }

    pub fn exit(&mut self) -> Option<ClosureKind> {
        self.stack.pop().map(|f| f.kind)
    }
}

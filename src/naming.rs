//! Synthetic identifier generation.
//!
//! Every counter lives in the per-run [`NameGenerator`] owned by the
//! translation state, so two runs never share numbering and output is
//! reproducible. Each accessor returns the current name and advances.

/// Prefixes are chosen so they cannot collide with exported Go names and are
/// unlikely to collide with unexported ones.
pub const SWITCH_PREFIX: &str = "_s__";
pub const LABEL_PREFIX: &str = "_l__";
pub const DEFER_PREFIX: &str = "_defer_";
pub const DISCARD_PREFIX: &str = "_d__";
pub const ENTRY_PREFIX: &str = "_h__";

#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    switch_counter: usize,
    label_counter: usize,
    defer_counter: usize,
    discard_counter: usize,
    entry_counter: usize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discriminant variable for a switch statement.
    pub fn next_switch(&mut self) -> String {
        Self::advance(&mut self.switch_counter, SWITCH_PREFIX)
    }

    /// Jump target for a `fallthrough`.
    pub fn next_label(&mut self) -> String {
        Self::advance(&mut self.label_counter, LABEL_PREFIX)
    }

    /// Scope-exit binding for a `defer`.
    pub fn next_defer(&mut self) -> String {
        Self::advance(&mut self.defer_counter, DEFER_PREFIX)
    }

    /// Stand-in for the blank identifier where C++ needs a real binding.
    pub fn next_discard(&mut self) -> String {
        Self::advance(&mut self.discard_counter, DISCARD_PREFIX)
    }

    /// Loop variable holding a whole map entry.
    pub fn next_entry(&mut self) -> String {
        Self::advance(&mut self.entry_counter, ENTRY_PREFIX)
    }

    fn advance(counter: &mut usize, prefix: &str) -> String {
        let name = format!("{}{}", prefix, counter);
        *counter += 1;
        name
    }
}

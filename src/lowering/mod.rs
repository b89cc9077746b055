//! Lowering Module
//!
//! Per-line bookkeeping that runs before any construct translator:
//! the translation state, brace depth and raw string handling.

// State management
pub mod transpiler_state;

// Depth tracking
pub mod depth_tracking_lowering;

// Multi-line literals
pub mod raw_string_lowering;

// Re-exports for convenience
pub use transpiler_state::{
    ConstGroup, ConstTemplate, FunctionContext, StructContext, TranslationState,
};
pub use depth_tracking_lowering::{count_braces_outside_strings, update_brace_depth};
pub use raw_string_lowering::{close_raw_string, convert_raw_strings, RawStringResult};

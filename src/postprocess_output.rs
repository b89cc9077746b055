//! Output post-processing pipeline
//!
//! The whole-program passes run once every line has been translated and
//! function prototypes have been placed.

use tracing::debug;

use crate::postprocess::{add_includes, add_shims, annotate_string_literals, replace_symbols, uses_containers};

/// Flags collected while translating that shape the final output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramFlags {
    /// A print handed a non-literal to `_format_output`. Together with
    /// container use it selects the full pretty-printer.
    pub needs_pretty_print: bool,
    /// A struct type or struct literal was emitted; `_str()` bodies always
    /// need the full pretty-printer.
    pub has_aggregates: bool,
}

/// Apply all post-processing transformations to the output lines
pub fn apply_postprocessing(output_lines: Vec<String>, flags: ProgramFlags) -> String {
    let body = output_lines.join("\n");

    //==========================================================================
    // String literals that must be `std::string` values get an `s` suffix.
    //==========================================================================
    let (body, uses_literals) = annotate_string_literals(&body);

    //==========================================================================
    // Go symbols still present in expressions: `nil`, `len(`, conversions,
    // `strings.*` helpers renamed to their shim names.
    //==========================================================================
    let body = replace_symbols(&body);

    let body = if uses_literals {
        format!("using namespace std::string_literals;\n\n{}", body)
    } else {
        body
    };

    //==========================================================================
    // Helper shims. The pretty-printer gets its container and aggregate
    // overloads only when the program can hand it one.
    //==========================================================================
    let full_formatter = flags.has_aggregates || (flags.needs_pretty_print && uses_containers(&body));
    debug!(full_formatter, "injecting helper shims");
    let body = add_shims(&body, full_formatter);

    //==========================================================================
    // Includes last, computed from everything above.
    //==========================================================================
    let mut program = add_includes(&body);
    if !program.ends_with('\n') {
        program.push('\n');
    }
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pipeline_orders_includes_shims_then_body() {
        let out = apply_postprocessing(
            lines(&["auto main() -> int {", "_format_output(std::cout, x);", "return 0;", "}"]),
            ProgramFlags { needs_pretty_print: true, has_aggregates: false },
        );
        let include = out.find("#include <iostream>").unwrap();
        let shim = out.find("void _format_output").unwrap();
        let main = out.find("auto main()").unwrap();
        assert!(include < shim && shim < main);
        assert!(out.contains("#include <type_traits>"));
        assert!(!out.contains("_has_str"));
    }

    #[test]
    fn test_literal_suffix_adds_using_directive() {
        let out = apply_postprocessing(lines(&["const auto greeting = \"hi\";"]), ProgramFlags::default());
        assert!(out.contains("using namespace std::string_literals;"));
        assert!(out.contains("\"hi\"s;"));
        assert!(out.starts_with("#include <string>\n"));
    }

    #[test]
    fn test_containers_select_full_formatter() {
        let out = apply_postprocessing(
            lines(&["std::vector<int> xs{1, 2};", "_format_output(std::cout, xs);"]),
            ProgramFlags { needs_pretty_print: true, has_aggregates: false },
        );
        assert!(out.contains("_is_sequence"));
        assert!(out.contains("#include <algorithm>"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_containers_without_pretty_printed_values_keep_minimal_formatter() {
        let out = apply_postprocessing(
            lines(&["std::vector<int> xs{1, 2};", "_format_output(std::cout, xs[0]);"]),
            ProgramFlags { needs_pretty_print: false, has_aggregates: false },
        );
        assert!(out.contains("void _format_output"));
        assert!(!out.contains("_is_sequence"));
    }

    #[test]
    fn test_aggregates_select_full_formatter() {
        let out = apply_postprocessing(
            lines(&["_format_output(ss, X);"]),
            ProgramFlags { needs_pretty_print: false, has_aggregates: true },
        );
        assert!(out.contains("_has_str"));
    }
}

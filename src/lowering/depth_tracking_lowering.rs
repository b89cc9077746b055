//! Depth Tracking Lowering
//!
//! Brace depth is the only structural signal the translator has: it finds
//! the `}` that ends a function body, a struct body, a switch or a closure.
//! Braces inside string, rune and raw literals must not be counted.

use crate::helpers::QuoteTracker;

/// Count opening and closing braces outside of literals.
///
/// # Returns
/// A tuple of (opening_count, closing_count)
pub fn count_braces_outside_strings(s: &str) -> (usize, usize) {
    let mut opens = 0;
    let mut closes = 0;
    let mut quotes = QuoteTracker::default();

    for c in s.chars() {
        if !quotes.step(c) {
            continue;
        }
        match c {
            '{' => opens += 1,
            '}' => closes += 1,
            _ => {}
        }
    }

    (opens, closes)
}

/// Apply one line's braces to `depth`. Clamped at zero for unbalanced input.
pub fn update_brace_depth(depth: &mut usize, line: &str) {
    let (opens, closes) = count_braces_outside_strings(line);
    *depth = (*depth + opens).saturating_sub(closes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braces_in_strings_are_ignored() {
        assert_eq!(count_braces_outside_strings(r#"fmt.Println("{}")"#), (0, 0));
        assert_eq!(count_braces_outside_strings("if x {"), (1, 0));
        assert_eq!(count_braces_outside_strings("} else {"), (1, 1));
        assert_eq!(count_braces_outside_strings("r := '{'"), (0, 0));
        assert_eq!(count_braces_outside_strings("s := R\"({)\" + f{}"), (1, 1));
    }

    #[test]
    fn test_update_brace_depth_clamps() {
        let mut depth = 0;
        update_brace_depth(&mut depth, "func main() {");
        assert_eq!(depth, 1);
        update_brace_depth(&mut depth, "}");
        update_brace_depth(&mut depth, "}");
        assert_eq!(depth, 0);
    }
}

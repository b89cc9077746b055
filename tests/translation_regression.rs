use std::process::Command;

use go2cpp::driver::{compile, CompilerConfig};
use go2cpp::{go2cpp, translate, DriverError};

/// Compile the translation with the system compiler, run it and return
/// stdout. `None` when no C++ compiler is installed.
fn run(src: &str) -> Option<String> {
    let cpp = go2cpp(src).expect("translation failed");
    let dir = tempfile::tempdir().expect("tempdir");
    let exe = dir.path().join("prog");
    match compile(&cpp, &exe, &CompilerConfig::default()) {
        Ok(()) => {}
        Err(DriverError::ToolUnavailable { tool, .. }) => {
            eprintln!("{} not installed, skipping", tool);
            return None;
        }
        Err(e) => panic!("{}\n--- translated ---\n{}", e, cpp),
    }
    let output = Command::new(&exe).output().expect("running the compiled program");
    assert!(output.status.success());
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn assert_runs(src: &str, expected: &str) {
    if let Some(stdout) = run(src) {
        assert_eq!(stdout, expected);
    }
}

/// Hash-container iteration order differs from Go's; compare lines as a set.
fn assert_runs_unordered(src: &str, expected: &str) {
    fn sorted(text: &str) -> Vec<&str> {
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort_unstable();
        lines
    }
    if let Some(stdout) = run(src) {
        assert_eq!(sorted(&stdout), sorted(expected));
    }
}

#[test]
fn hello_translates_to_single_include() {
    let out = go2cpp(include_str!("fixtures/hello.go")).unwrap();
    assert!(out.starts_with("#include <iostream>\n\n"));
    assert_eq!(out.matches("#include").count(), 1);
    assert!(out.contains("std::cout << \"Hello, World!\" << std::endl;"));
}

#[test]
fn const_group_counts_with_iota() {
    let out = go2cpp(include_str!("fixtures/const.go")).unwrap();
    assert!(out.contains("const auto Sunday = 0;"));
    assert!(out.contains("const auto Tuesday = 2;"));
    assert!(out.contains("const auto Greeting = \"hi\"s;"));
    assert!(out.contains("using namespace std::string_literals;"));
}

#[test]
fn defer_becomes_scope_guard() {
    let out = go2cpp(include_str!("fixtures/defer.go")).unwrap();
    assert!(out.contains("std::shared_ptr<void> _defer_0(nullptr, [&](void*) {"));
}

#[test]
fn fallthrough_jumps_to_next_case_body() {
    let out = go2cpp(include_str!("fixtures/switch_fallthrough.go")).unwrap();
    let jump = out.find("goto _l__0;").unwrap();
    let label = out.find("_l__0:;").unwrap();
    assert!(jump < label);
}

#[test]
fn multi_return_uses_tuple_and_prototype() {
    let out = go2cpp(include_str!("fixtures/multi_return.go")).unwrap();
    assert!(out.contains("auto divmod(int a, int b) -> std::tuple<int, int>;"));
    assert!(out.contains("// divmod returns the quotient and remainder."));
    assert!(out.contains("auto [q, r] = divmod(7, 2);"));
}

#[test]
fn map_literal_and_comma_ok() {
    let t = translate(include_str!("fixtures/map_literal.go")).unwrap();
    assert!(t.notices.is_empty());
    assert!(t.cpp.contains("if (auto [age, ok] = _comma_ok(ages, \"carol\"); ok) {"));
    assert!(t.cpp.contains("-> std::pair<typename M::mapped_type, bool>"));
    assert!(t.cpp.contains("#include <utility>"));
}

#[test]
fn struct_printing_goes_through_str() {
    let out = go2cpp(include_str!("fixtures/struct.go")).unwrap();
    assert!(out.contains("auto q = new Point{.X = 3, .Y = 4};"));
    assert!(out.contains("printf(\"%s and %d\\n\", _format_string(p).c_str(), p.X);"));
    assert!(out.contains("std::string _format_string(const T& x)"));
}

#[test]
fn range_over_slice_by_value() {
    let out = go2cpp(include_str!("fixtures/for_range.go")).unwrap();
    assert!(out.contains("xs.push_back(40);"));
    assert!(out.contains("for (auto v : xs) {"));
    assert!(out.contains("total += v;"));
    assert!(out.contains("for (auto i = 0; i < 3; i++) {"));
}

#[test]
fn positional_struct_literal_is_terminated() {
    let out = go2cpp(include_str!("fixtures/struct_fields.go")).unwrap();
    assert!(out.contains("Person p{1.2, 3.4, \"Bob\"};"));
    assert!(out.contains("double Height{};"));
}

#[test]
fn inline_map_literal_is_terminated() {
    let out = go2cpp(include_str!("fixtures/map_pairs.go")).unwrap();
    assert!(out.contains("std::unordered_map<std::string, std::string> m{{\"a\", \"x\"}, {\"b\", \"y\"}};"));
    assert!(out.contains("for (const auto& [k, v] : m) {"));
}

#[test]
fn discarded_first_result_gets_a_binding() {
    let out = go2cpp(include_str!("fixtures/discard_return.go")).unwrap();
    assert!(out.contains("return std::tuple<int, std::string>{1, \"b\"};"));
    assert!(out.contains("auto [_d__0, s] = two();"));
    assert!(out.contains("auto [n, _d__1] = two();"));
}

#[test]
fn range_index_is_signed() {
    let out = go2cpp(include_str!("fixtures/signed_index.go")).unwrap();
    assert!(out.contains("for (int i = 0; i < _len(xs); i++) {"));
    assert!(out.contains("template <typename T> int _len(const T& x)"));
    assert!(!out.contains("std::size(xs)"));
}

//===========================================================================
// Round trips through the system compiler
//===========================================================================

#[test]
fn run_hello() {
    assert_runs(include_str!("fixtures/hello.go"), include_str!("fixtures/hello.stdout"));
}

#[test]
fn run_const() {
    assert_runs(include_str!("fixtures/const.go"), include_str!("fixtures/const.stdout"));
}

#[test]
fn run_defer() {
    assert_runs(include_str!("fixtures/defer.go"), include_str!("fixtures/defer.stdout"));
}

#[test]
fn run_switch_fallthrough() {
    assert_runs(
        include_str!("fixtures/switch_fallthrough.go"),
        include_str!("fixtures/switch_fallthrough.stdout"),
    );
}

#[test]
fn run_fallthrough_from_first_case_and_unmatched_default() {
    assert_runs(
        include_str!("fixtures/fallthrough_first.go"),
        include_str!("fixtures/fallthrough_first.stdout"),
    );
}

#[test]
fn run_multi_return() {
    assert_runs(include_str!("fixtures/multi_return.go"), include_str!("fixtures/multi_return.stdout"));
}

#[test]
fn run_discarded_first_result() {
    assert_runs(include_str!("fixtures/discard_return.go"), include_str!("fixtures/discard_return.stdout"));
}

#[test]
fn run_map_literal() {
    assert_runs(include_str!("fixtures/map_literal.go"), include_str!("fixtures/map_literal.stdout"));
}

#[test]
fn run_map_pairs_in_any_order() {
    assert_runs_unordered(include_str!("fixtures/map_pairs.go"), include_str!("fixtures/map_pairs.stdout"));
}

#[test]
fn run_struct() {
    assert_runs(include_str!("fixtures/struct.go"), include_str!("fixtures/struct.stdout"));
}

#[test]
fn run_struct_fields() {
    assert_runs(include_str!("fixtures/struct_fields.go"), include_str!("fixtures/struct_fields.stdout"));
}

#[test]
fn run_for_range() {
    assert_runs(include_str!("fixtures/for_range.go"), include_str!("fixtures/for_range.stdout"));
}

#[test]
fn run_signed_index() {
    assert_runs(include_str!("fixtures/signed_index.go"), include_str!("fixtures/signed_index.stdout"));
}

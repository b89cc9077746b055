//! Test suite for the translation engine
//!
//! Whole-file translations covering:
//! - Prototypes, `main` return and includes
//! - Structs with synthesized `_str()` and embedded bases
//! - Switch chains with fallthrough
//! - Map literals spread over lines and ranging over maps
//! - Raw strings, block comments and trailing comments
//! - Notices and fatal structural errors

#[cfg(test)]
mod tests {
    use crate::error::StructuralError;
    use crate::{go2cpp, translate, TranslateError};

    fn cpp(src: &str) -> String {
        go2cpp(src).unwrap()
    }

    #[test]
    fn test_hello_world() {
        let src = "package main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Println(\"Hello, World!\")\n}\n";
        assert_eq!(
            cpp(src),
            "#include <iostream>\n\nauto main() -> int {\n    std::cout << \"Hello, World!\" << std::endl;\nreturn 0;\n}\n"
        );
    }

    #[test]
    fn test_clean_translation_has_no_notices() {
        let t = translate("package main\n\nfunc main() {\n}\n").unwrap();
        assert!(t.notices.is_empty());
        assert!(t.cpp.contains("auto main() -> int {"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let out = cpp("\u{feff}package main\n\nfunc main() {\n}\n");
        assert!(!out.contains('\u{feff}'));
        assert!(out.starts_with("auto main() -> int {"));
    }

    #[test]
    fn test_prototypes_precede_first_function() {
        let src = r#"package main

import "fmt"

func main() {
    q, r := divmod(7, 2)
    fmt.Println(q, r)
}

func divmod(a int, b int) (int, int) {
    return a / b, a % b
}
"#;
        let out = cpp(src);
        let prototype = out.find("auto divmod(int a, int b) -> std::tuple<int, int>;").unwrap();
        let main = out.find("auto main() -> int {").unwrap();
        let definition = out.find("auto divmod(int a, int b) -> std::tuple<int, int> {").unwrap();
        assert!(prototype < main && main < definition);
        assert!(out.contains("auto [q, r] = divmod(7, 2);"));
        assert!(out.contains("return std::tuple<int, int>{a / b, a % b};"));
        assert!(out.contains("#include <tuple>"));
    }

    #[test]
    fn test_struct_gets_str_method() {
        let src = r#"package main

import "fmt"

type Point struct {
    X int
    Y int
}

func main() {
    p := Point{X: 1, Y: 2}
    fmt.Println(p)
}
"#;
        let out = cpp(src);
        assert!(out.contains("class Point { public:"));
        assert!(out.contains("int X{};"));
        assert!(out.contains("std::string _str() const {"));
        assert!(out.contains("_format_output(ss, Y);"));
        assert!(out.contains("Point p{.X = 1, .Y = 2};"));
        assert!(out.contains("_format_output(std::cout, p);"));
        // aggregates select the full pretty-printer
        assert!(out.contains("_has_str"));
        assert!(out.contains("#include <sstream>"));
    }

    #[test]
    fn test_str_method_is_indented_inside_class() {
        let out = cpp("type P struct {\n    A float64\n    Name string\n}\n");
        assert!(out.contains("    double A{};\n    std::string Name{};\n    std::string _str() const {\n        std::stringstream ss;"));
        assert!(out.contains("\n        return ss.str();\n    }\n};"));
    }

    #[test]
    fn test_brace_initialized_statements_are_terminated() {
        let src = r#"type P struct {
    A float64
    B float64
    Name string
}

func two() (int, string) {
    return 1, "b"
}

func main() {
    p := P{1.2, 3.4, "Bob"}
    m := map[string]string{"a": "x", "b": "y"}
    q := &P{A: 1}
    _, s := two()
    fmt.Println(p, m, q, s)
}
"#;
        let out = cpp(src);
        assert!(out.contains("    P p{1.2, 3.4, \"Bob\"};\n"));
        assert!(out.contains("m{{\"a\", \"x\"}, {\"b\", \"y\"}};\n"));
        assert!(out.contains("auto q = new P{.A = 1};\n"));
        assert!(out.contains("return std::tuple<int, std::string>{1, \"b\"};\n"));
        assert!(out.contains("auto [_d__0, s] = two();"));
    }

    #[test]
    fn test_range_index_and_len_are_signed() {
        let src = "func main() {\n    xs := []int{5}\n    for i := range xs {\n        d := i - 1\n        _ = d\n    }\n}\n";
        let out = cpp(src);
        assert!(out.contains("    for (int i = 0; i < _len(xs); i++) {"));
        assert!(out.contains("        auto d = i - 1;"));
        assert!(out.contains("return static_cast<int>(std::size(x));"));
    }

    #[test]
    fn test_embedded_struct_becomes_base() {
        let src = r#"type Animal struct {
    Name string
}

type Dog struct {
    Animal
    Breed string
}
"#;
        let out = cpp(src);
        assert!(out.contains("class Animal { public:"));
        assert!(out.contains("class Dog : public Animal { public:"));
        assert!(out.contains("_format_output(ss, static_cast<const Animal&>(*this));"));
    }

    #[test]
    fn test_switch_with_fallthrough() {
        let src = r#"package main

import "fmt"

func main() {
    x := 2
    switch x {
    case 1:
        fmt.Println("one")
    case 2, 3:
        fmt.Println("two or three")
        fallthrough
    default:
        fmt.Println("other")
    }
}
"#;
        let out = cpp(src);
        assert!(out.contains("auto _s__0 = x;"));
        assert!(out.contains("if (_s__0 == 1) {"));
        assert!(out.contains("} else if (_s__0 == 2 || _s__0 == 3) {"));
        assert!(out.contains("goto _l__0;"));
        assert!(out.contains("_l__0:;"));
        assert!(out.contains("} else {"));
        assert!(out.contains("return 0;\n}"));
    }

    #[test]
    fn test_const_group_iota() {
        let out = cpp("const (\n    A = iota\n    B\n    C\n)\n");
        assert!(out.contains("const auto A = 0;"));
        assert!(out.contains("const auto B = 1;"));
        assert!(out.contains("const auto C = 2;"));
        assert!(!out.contains(')'));
    }

    #[test]
    fn test_multi_line_map_literal_and_range() {
        let src = r#"func main() {
    ages := map[string]int{
        "alice": 31,
        "bob": 25,
    }
    for name, age := range ages {
        fmt.Println(name, age)
    }
}
"#;
        let out = cpp(src);
        assert!(out.contains("std::unordered_map<std::string, int> ages{"));
        assert!(out.contains("{\"alice\", 31},"));
        assert!(out.contains("    };"));
        assert!(out.contains("for (const auto& [name, age] : ages) {"));
        assert!(out.contains("_format_output(std::cout, name);"));
        assert!(out.contains("#include <unordered_map>"));
        assert!(out.contains("_is_map"));
    }

    #[test]
    fn test_defer_runs_at_scope_exit() {
        let src = "func main() {\n    defer fmt.Println(\"world\")\n    fmt.Println(\"hello\")\n}\n";
        let out = cpp(src);
        assert!(out.contains(
            "std::shared_ptr<void> _defer_0(nullptr, [&](void*) { std::cout << \"world\" << std::endl; });"
        ));
        assert!(out.contains("#include <memory>"));
    }

    #[test]
    fn test_function_literal_closes_with_semicolon() {
        let src = "func main() {\n    twice := func(x int) int {\n        return x * 2\n    }\n    fmt.Println(twice(3))\n}\n";
        let out = cpp(src);
        assert!(out.contains("auto twice = [&](int x) -> int {"));
        assert!(out.contains("return x * 2;"));
        assert!(out.contains("    };"));
        assert!(out.contains("return 0;\n}"));
    }

    #[test]
    fn test_trailing_comment_is_kept() {
        let out = cpp("func main() {\n    x := 1 // count\n    _ = x\n}\n");
        assert!(out.contains("    auto x = 1; // count"));
    }

    #[test]
    fn test_block_comment_is_verbatim() {
        let src = "/*\n header { not code\n*/\nfunc main() {\n}\n";
        let out = cpp(src);
        assert!(out.contains(" header { not code"));
        assert!(out.contains("return 0;\n}"));
    }

    #[test]
    fn test_multi_line_raw_string() {
        let src = "func main() {\n    s := `line one\nline two`\n    fmt.Println(s)\n}\n";
        let out = cpp(src);
        assert!(out.contains("auto s = R\"(line one\nline two)\""));
        assert!(out.contains("_format_output(std::cout, s);"));
    }

    #[test]
    fn test_whole_program_substitutions() {
        let src = "func main() {\n    xs := []int{1, 2}\n    n := len(xs)\n    s := \"a\" + \"b\"\n    var p *int = nil\n    _ = p\n    _ = n\n    _ = s\n}\n";
        let out = cpp(src);
        assert!(out.contains("std::vector<int> xs{1, 2};"));
        assert!(out.contains("auto n = _len(xs);"));
        assert!(out.contains("template <typename T> int _len(const T& x)"));
        assert!(out.contains("auto s = \"a\"s + \"b\";"));
        assert!(out.contains("using namespace std::string_literals;"));
        assert!(out.contains("= nullptr;"));
        assert!(out.contains("#include <iterator>"));
        assert!(out.contains("#include <vector>"));
    }

    #[test]
    fn test_unsupported_construct_is_noticed() {
        let t = translate("func main() {\n    go worker()\n}\n").unwrap();
        assert_eq!(t.notices.len(), 1);
        assert_eq!(t.notices[0].line, 2);
        assert!(t.cpp.contains("go worker();"));
    }

    #[test]
    fn test_unclosed_block_is_noticed() {
        let t = translate("type T struct {\n    X int\n").unwrap();
        assert!(t.notices.iter().any(|n| n.message.contains("not closed")));
    }

    #[test]
    fn test_count_mismatch_aborts_with_line() {
        let err = translate("func main() {\n    a, b := 1, 2, 3\n}\n").unwrap_err();
        assert_eq!(err.line(), 2);
        let TranslateError::Structural { source, .. } = err;
        assert!(matches!(source, StructuralError::DeclarationCountMismatch { names: 2, values: 3, .. }));
    }
}

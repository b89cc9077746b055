//! Whole-program post-processing passes
//!
//! Contains the passes run once the whole buffer has been translated:
//! - String literal suffixing (`"a" + b` -> `"a"s + b`)
//! - Blanket symbol substitutions (`nil`, `len(`, numeric conversions ...)
//! - Helper shim injection, only for helpers the program references
//! - Include computation from the symbols the program uses
//!
//! Every pass works on code only. String literals, character literals and
//! comments are split off first and copied through untouched.

use std::collections::BTreeSet;

use crate::helpers::{contains_identifier, is_ident_char, is_identifier, replace_identifier};

//===========================================================================
// SEGMENTS
//===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    /// `"..."`, `'...'` or `R"(...)"`
    Literal,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

/// End (exclusive) of the quoted literal starting at `start`. An unclosed
/// literal ends at the newline.
fn quoted_end(src: &str, start: usize) -> usize {
    let bytes = src.as_bytes();
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Split C++ text into code, literal and comment segments.
pub fn segments(src: &str) -> Vec<Segment<'_>> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !src.is_char_boundary(i) {
            i += 1;
            continue;
        }
        let rest = &src[i..];
        let (kind, end) = if rest.starts_with("//") {
            (SegmentKind::Comment, rest.find('\n').map_or(src.len(), |p| i + p))
        } else if rest.starts_with("/*") {
            (SegmentKind::Comment, rest[2..].find("*/").map_or(src.len(), |p| i + 2 + p + 2))
        } else if rest.starts_with("R\"(") && !src[..i].chars().last().is_some_and(is_ident_char) {
            (SegmentKind::Literal, rest[3..].find(")\"").map_or(src.len(), |p| i + 3 + p + 2))
        } else if bytes[i] == b'"' || bytes[i] == b'\'' {
            (SegmentKind::Literal, quoted_end(src, i))
        } else {
            i += 1;
            continue;
        };

        if start < i {
            out.push(Segment { kind: SegmentKind::Code, text: &src[start..i] });
        }
        out.push(Segment { kind, text: &src[i..end] });
        i = end;
        start = end;
    }
    if start < src.len() {
        out.push(Segment { kind: SegmentKind::Code, text: &src[start..] });
    }
    out
}

/// Apply `f` to every code segment.
fn map_code(src: &str, f: impl Fn(&str) -> String) -> String {
    segments(src)
        .into_iter()
        .map(|seg| match seg.kind {
            SegmentKind::Code => f(seg.text),
            _ => seg.text.to_string(),
        })
        .collect()
}

/// Code segments only, literals and comments blanked.
pub fn code_text(src: &str) -> String {
    segments(src)
        .into_iter()
        .map(|seg| match seg.kind {
            SegmentKind::Code => seg.text,
            _ => " ",
        })
        .collect()
}

//===========================================================================
// STRING LITERALS
//===========================================================================

/// `auto name =` / `const auto name =` at the end of `code`.
fn is_auto_initializer(code: &str) -> bool {
    let last = code.rsplit('\n').next().unwrap_or(code).trim();
    let Some(decl) = last.strip_suffix('=') else {
        return false;
    };
    let decl = decl.trim_end();
    let decl = decl.strip_prefix("const ").unwrap_or(decl);
    decl.strip_prefix("auto ").is_some_and(|name| is_identifier(name.trim()))
}

/// Suffix with `s` the string literals that must be `std::string` values:
/// left operands of `+` and whole initializers of `auto` declarations.
/// Returns the new text and whether any literal was suffixed.
pub fn annotate_string_literals(src: &str) -> (String, bool) {
    let segs = segments(src);
    let mut out = String::with_capacity(src.len());
    let mut used = false;

    for (i, seg) in segs.iter().enumerate() {
        out.push_str(seg.text);
        if seg.kind != SegmentKind::Literal || seg.text.starts_with('\'') || !seg.text.ends_with('"') {
            continue;
        }

        let next = segs
            .get(i + 1)
            .filter(|s| s.kind == SegmentKind::Code)
            .map_or("", |s| s.text.trim_start());
        let concatenated = next.starts_with('+') && !next.starts_with("++") && !next.starts_with("+=");
        let initializer = next.starts_with(';')
            && i > 0
            && segs[i - 1].kind == SegmentKind::Code
            && is_auto_initializer(segs[i - 1].text);

        if concatenated || initializer {
            out.push('s');
            used = true;
        }
    }
    (out, used)
}

//===========================================================================
// SYMBOL SUBSTITUTIONS
//===========================================================================

/// Go spellings left in translated code and their C++ replacements.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("string", "std::string"),
    ("nil", "nullptr"),
    ("len(", "_len("),
    ("strconv.Itoa(", "std::to_string("),
    ("math.Sqrt(", "std::sqrt("),
    ("math.Pow(", "std::pow("),
    ("math.Abs(", "std::abs("),
    ("math.Floor(", "std::floor("),
    ("math.Ceil(", "std::ceil("),
    ("os.Exit(", "std::exit("),
    ("float64(", "double("),
    ("float32(", "float("),
    ("int64(", "std::int64_t("),
    ("int32(", "std::int32_t("),
    ("int16(", "std::int16_t("),
    ("int8(", "std::int8_t("),
    ("uint64(", "std::uint64_t("),
    ("uint32(", "std::uint32_t("),
    ("uint16(", "std::uint16_t("),
    ("uint8(", "std::uint8_t("),
    ("uint(", "unsigned("),
    ("byte(", "std::uint8_t("),
    ("rune(", "std::int32_t("),
    ("strings.Contains(", "stringsContains("),
    ("strings.HasPrefix(", "stringsHasPrefix("),
    ("strings.HasSuffix(", "stringsHasSuffix("),
    ("strings.TrimSpace(", "stringsTrimSpace("),
    ("strings.ToUpper(", "stringsToUpper("),
    ("strings.ToLower(", "stringsToLower("),
    ("strings.Repeat(", "stringsRepeat("),
    ("strings.Index(", "stringsIndex("),
    ("strings.Join(", "stringsJoin("),
    ("strings.Split(", "stringsSplit("),
];

/// Replace Go symbols at identifier boundaries, in code only.
pub fn replace_symbols(src: &str) -> String {
    map_code(src, |code| {
        SUBSTITUTIONS
            .iter()
            .fold(code.to_string(), |acc, (from, to)| replace_identifier(&acc, from, to))
    })
}

//===========================================================================
// SHIMS
//===========================================================================

struct Shim {
    name: &'static str,
    deps: &'static [&'static str],
    body: &'static str,
}

const FORMAT_OUTPUT_MINIMAL: &str = r#"template <typename T> void _format_output(std::ostream& out, const T& x) {
    if constexpr (std::is_same_v<T, bool>) {
        out << std::boolalpha << x << std::noboolalpha;
    } else if constexpr (std::is_integral_v<T> && sizeof(T) == 1) {
        out << static_cast<int>(x);
    } else {
        out << x;
    }
}"#;

const FORMAT_OUTPUT_FULL: &str = r#"template <typename T, typename = void> struct _has_str : std::false_type {};
template <typename T> struct _has_str<T, std::void_t<decltype(std::declval<const T&>()._str())>> : std::true_type {};
template <typename T> struct _is_sequence : std::false_type {};
template <typename T, typename A> struct _is_sequence<std::vector<T, A>> : std::true_type {};
template <typename T, std::size_t N> struct _is_sequence<std::array<T, N>> : std::true_type {};
template <typename T> struct _is_map : std::false_type {};
template <typename K, typename V, typename H, typename E, typename A> struct _is_map<std::unordered_map<K, V, H, E, A>> : std::true_type {};
template <typename T> void _format_output(std::ostream& out, const T& x) {
    if constexpr (std::is_same_v<T, bool>) {
        out << std::boolalpha << x << std::noboolalpha;
    } else if constexpr (std::is_integral_v<T> && sizeof(T) == 1) {
        out << static_cast<int>(x);
    } else if constexpr (std::is_same_v<T, const char*>) {
        out << x;
    } else if constexpr (std::is_pointer_v<T>) {
        if (x == nullptr) {
            out << "<nil>";
        } else if constexpr (_has_str<std::remove_pointer_t<T>>::value) {
            out << "&" << x->_str();
        } else {
            out << static_cast<const void*>(x);
        }
    } else if constexpr (_has_str<T>::value) {
        out << x._str();
    } else if constexpr (_is_sequence<T>::value) {
        out << "[";
        bool first = true;
        for (const auto& e : x) {
            if (!first) {
                out << " ";
            }
            first = false;
            _format_output(out, e);
        }
        out << "]";
    } else if constexpr (_is_map<T>::value) {
        std::vector<typename T::key_type> keys;
        for (const auto& kv : x) {
            keys.push_back(kv.first);
        }
        std::sort(keys.begin(), keys.end());
        out << "map[";
        for (std::size_t i = 0; i < keys.size(); i++) {
            if (i > 0) {
                out << " ";
            }
            _format_output(out, keys[i]);
            out << ":";
            _format_output(out, x.at(keys[i]));
        }
        out << "]";
    } else {
        out << x;
    }
}"#;

/// Table order is emission order; dependencies come first.
const SHIMS: &[Shim] = &[
    Shim { name: "_format_output", deps: &[], body: "" },
    Shim {
        name: "_format_string",
        deps: &["_format_output"],
        body: r#"template <typename T> std::string _format_string(const T& x) {
    std::stringstream ss;
    _format_output(ss, x);
    return ss.str();
}"#,
    },
    Shim {
        name: "_len",
        deps: &[],
        body: r#"template <typename T> int _len(const T& x) {
    if constexpr (std::is_array_v<T> && std::is_same_v<std::remove_cv_t<std::remove_extent_t<T>>, char>) {
        return static_cast<int>(std::size(x)) - 1;
    } else {
        return static_cast<int>(std::size(x));
    }
}"#,
    },
    Shim {
        name: "_comma_ok",
        deps: &[],
        body: r#"template <typename M, typename K> auto _comma_ok(const M& m, const K& k) -> std::pair<typename M::mapped_type, bool> {
    auto it = m.find(k);
    if (it == m.end()) {
        return {typename M::mapped_type{}, false};
    }
    return {it->second, true};
}"#,
    },
    Shim {
        name: "stringsContains",
        deps: &[],
        body: "inline auto stringsContains(std::string const& s, std::string const& sub) -> bool { return s.find(sub) != std::string::npos; }",
    },
    Shim {
        name: "stringsHasPrefix",
        deps: &[],
        body: "inline auto stringsHasPrefix(std::string const& s, std::string const& prefix) -> bool { return s.rfind(prefix, 0) == 0; }",
    },
    Shim {
        name: "stringsHasSuffix",
        deps: &[],
        body: "inline auto stringsHasSuffix(std::string const& s, std::string const& suffix) -> bool { return s.size() >= suffix.size() && s.compare(s.size() - suffix.size(), suffix.size(), suffix) == 0; }",
    },
    Shim {
        name: "stringsTrimSpace",
        deps: &[],
        body: r#"inline auto stringsTrimSpace(std::string const& s) -> std::string {
    const char* ws = " \t\n\v\f\r";
    auto first = s.find_first_not_of(ws);
    if (first == std::string::npos) {
        return "";
    }
    return s.substr(first, s.find_last_not_of(ws) - first + 1);
}"#,
    },
    Shim {
        name: "stringsToUpper",
        deps: &[],
        body: "inline auto stringsToUpper(std::string s) -> std::string { for (auto& c : s) { c = static_cast<char>(std::toupper(static_cast<unsigned char>(c))); } return s; }",
    },
    Shim {
        name: "stringsToLower",
        deps: &[],
        body: "inline auto stringsToLower(std::string s) -> std::string { for (auto& c : s) { c = static_cast<char>(std::tolower(static_cast<unsigned char>(c))); } return s; }",
    },
    Shim {
        name: "stringsRepeat",
        deps: &[],
        body: "inline auto stringsRepeat(std::string const& s, int n) -> std::string { std::string out; for (int i = 0; i < n; i++) { out += s; } return out; }",
    },
    Shim {
        name: "stringsIndex",
        deps: &[],
        body: "inline auto stringsIndex(std::string const& s, std::string const& sub) -> int { auto p = s.find(sub); return p == std::string::npos ? -1 : static_cast<int>(p); }",
    },
    Shim {
        name: "stringsJoin",
        deps: &[],
        body: r#"inline auto stringsJoin(std::vector<std::string> const& parts, std::string const& sep) -> std::string {
    std::string out;
    for (std::size_t i = 0; i < parts.size(); i++) {
        if (i > 0) {
            out += sep;
        }
        out += parts[i];
    }
    return out;
}"#,
    },
    Shim {
        name: "stringsSplit",
        deps: &[],
        body: r#"inline auto stringsSplit(std::string const& s, std::string const& sep) -> std::vector<std::string> {
    std::vector<std::string> out;
    std::size_t start = 0;
    std::size_t pos;
    while (!sep.empty() && (pos = s.find(sep, start)) != std::string::npos) {
        out.push_back(s.substr(start, pos - start));
        start = pos + sep.size();
    }
    out.push_back(s.substr(start));
    return out;
}"#,
    },
];

/// Does the program need the full pretty-printer (aggregates or containers)?
pub fn uses_containers(src: &str) -> bool {
    let code = code_text(src);
    ["std::vector", "std::unordered_map", "std::array"]
        .iter()
        .any(|sym| contains_identifier(&code, sym))
}

/// Prepend the helper shims the program references, dependencies included.
pub fn add_shims(src: &str, full_formatter: bool) -> String {
    let code = code_text(src);
    let mut wanted: BTreeSet<&str> = BTreeSet::new();
    for shim in SHIMS.iter().filter(|s| contains_identifier(&code, s.name)) {
        wanted.insert(shim.name);
        wanted.extend(shim.deps.iter().copied());
    }
    if wanted.is_empty() {
        return src.to_string();
    }

    let bodies: Vec<&str> = SHIMS
        .iter()
        .filter(|s| wanted.contains(s.name))
        .map(|s| match s.name {
            "_format_output" if full_formatter => FORMAT_OUTPUT_FULL,
            "_format_output" => FORMAT_OUTPUT_MINIMAL,
            _ => s.body,
        })
        .collect();
    format!("{}\n\n{}", bodies.join("\n\n"), src)
}

//===========================================================================
// INCLUDES
//===========================================================================

/// Symbols and the header that declares them.
const HEADERS: &[(&str, &str)] = &[
    ("std::tuple", "tuple"),
    ("std::tie", "tuple"),
    ("std::make_tuple", "tuple"),
    ("std::ignore", "tuple"),
    ("std::cout", "iostream"),
    ("std::cerr", "iostream"),
    ("std::endl", "iostream"),
    ("std::ostream", "iostream"),
    ("std::boolalpha", "iostream"),
    ("std::string", "string"),
    ("std::to_string", "string"),
    ("std::string_literals", "string"),
    ("std::size", "iterator"),
    ("std::begin", "iterator"),
    ("std::end", "iterator"),
    ("std::unordered_map", "unordered_map"),
    ("std::vector", "vector"),
    ("std::array", "array"),
    ("std::size_t", "cstddef"),
    ("std::int8_t", "cstdint"),
    ("std::int16_t", "cstdint"),
    ("std::int32_t", "cstdint"),
    ("std::int64_t", "cstdint"),
    ("std::uint8_t", "cstdint"),
    ("std::uint16_t", "cstdint"),
    ("std::uint32_t", "cstdint"),
    ("std::uint64_t", "cstdint"),
    ("std::uintptr_t", "cstdint"),
    ("printf", "cstdio"),
    ("fprintf", "cstdio"),
    ("stdout", "cstdio"),
    ("stderr", "cstdio"),
    ("std::stringstream", "sstream"),
    ("std::shared_ptr", "memory"),
    ("std::sqrt", "cmath"),
    ("std::pow", "cmath"),
    ("std::abs", "cmath"),
    ("std::floor", "cmath"),
    ("std::ceil", "cmath"),
    ("std::exit", "cstdlib"),
    ("std::function", "functional"),
    ("std::is_same_v", "type_traits"),
    ("std::is_integral_v", "type_traits"),
    ("std::is_pointer_v", "type_traits"),
    ("std::remove_pointer_t", "type_traits"),
    ("std::void_t", "type_traits"),
    ("std::is_array_v", "type_traits"),
    ("std::remove_cv_t", "type_traits"),
    ("std::remove_extent_t", "type_traits"),
    ("std::false_type", "type_traits"),
    ("std::true_type", "type_traits"),
    ("std::sort", "algorithm"),
    ("std::declval", "utility"),
    ("std::pair", "utility"),
    ("std::toupper", "cctype"),
    ("std::tolower", "cctype"),
];

/// Headers required by the symbols used in `src`, sorted.
pub fn required_headers(src: &str) -> BTreeSet<&'static str> {
    let code = code_text(src);
    HEADERS
        .iter()
        .filter(|(symbol, _)| contains_identifier(&code, symbol))
        .map(|&(_, header)| header)
        .collect()
}

/// Replace any leading `#include` lines with exactly the required set.
/// Running it twice gives the same text.
pub fn add_includes(src: &str) -> String {
    let body = src
        .lines()
        .skip_while(|l| l.trim().is_empty() || l.trim_start().starts_with("#include"))
        .collect::<Vec<_>>()
        .join("\n");

    let headers = required_headers(&body);
    if headers.is_empty() {
        return body;
    }
    let includes: Vec<String> = headers.iter().map(|h| format!("#include <{}>", h)).collect();
    format!("{}\n\n{}", includes.join("\n"), body)
}
